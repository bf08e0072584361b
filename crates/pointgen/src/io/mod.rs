//! Mesh loading.

pub mod stl;
