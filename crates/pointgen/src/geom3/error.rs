//! Errors at the mesh boundary (file loading, flat-array marshalling).
//!
//! The predicates and samplers never return these; they assume a
//! well-formed mesh.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Binary STL ended before the announced number of triangles.
    #[error("truncated STL: expected {expected} bytes, got {got}")]
    Truncated { expected: usize, got: usize },
    /// ASCII STL line that could not be parsed.
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
    /// Binary STL triangle with a NaN or infinite corner.
    #[error("face {face} has a non-finite coordinate")]
    NonFinite { face: usize },
    /// Flat buffer whose length is not a multiple of three.
    #[error("{what} buffer has length {len}, expected a multiple of 3")]
    FlatShape { what: &'static str, len: usize },
    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },
}
