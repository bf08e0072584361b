//! 3D geometry for closed triangle meshes.
//!
//! Purpose
//! - `Mesh`: indexed triangle soup (vertices + faces), read-only for all
//!   predicates and samplers.
//! - `Aabb3`: per-axis bounds, recomputed on demand and never cached.
//! - Ray-parity containment (`is_point_inside_mesh`) built on the
//!   Möller–Trumbore ray/triangle test.
//!
//! Limits
//! - No validity checks: open or self-intersecting meshes give meaningless
//!   inside/outside answers. Every query scans all faces.

mod containment;
mod error;
mod types;

pub use containment::{
    count_ray_crossings, is_point_inside_mesh, is_point_inside_mesh_cfg, ray_triangle_intersect,
    RAY_DIR,
};
pub use error::MeshError;
pub use types::{Aabb3, GeomCfg, Mesh, Point3};

#[cfg(test)]
mod tests;
