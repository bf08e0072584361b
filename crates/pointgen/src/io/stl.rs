//! STL reader (ASCII and binary) producing an indexed `Mesh`.
//!
//! STL stores every triangle with its own three corners. Corners are welded
//! into shared vertices by rounding each coordinate to a `WELD_PRECISION`
//! grid and keying on the integer triple. Coordinates beyond the grid's
//! `i64` range weld only on exact equality. NaN and infinite corners are
//! rejected.
//!
//! Format detection
//! - ASCII: starts with `solid` (any case) and the 80-byte header has no
//!   NUL byte, unless the size matches a binary file exactly.
//! - Binary: 80-byte header, `u32` LE triangle count, 50-byte records
//!   (normal, 3 corners as `f32` LE, `u16` attribute).

use std::collections::HashMap;
use std::path::Path;

use crate::geom3::{Mesh, MeshError, Point3};

/// Grid used to merge duplicate corners.
pub const WELD_PRECISION: f64 = 1e-6;

const HEADER_LEN: usize = 80;
const RECORD_LEN: usize = 50;

/// Read an STL file from disk.
pub fn read_stl<P: AsRef<Path>>(path: P) -> Result<Mesh, MeshError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| MeshError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mesh = parse_stl(&bytes)?;
    tracing::debug!(
        path = %path.display(),
        vertices = mesh.vertices.len(),
        faces = mesh.faces.len(),
        "loaded STL"
    );
    Ok(mesh)
}

/// Parse STL bytes, detecting ASCII vs binary.
pub fn parse_stl(bytes: &[u8]) -> Result<Mesh, MeshError> {
    if is_ascii(bytes) {
        parse_ascii(&String::from_utf8_lossy(bytes))
    } else {
        parse_binary(bytes)
    }
}

fn is_ascii(bytes: &[u8]) -> bool {
    if bytes.len() < 5 || !bytes[..5].eq_ignore_ascii_case(b"solid") {
        return false;
    }
    if bytes[..bytes.len().min(HEADER_LEN)].contains(&0) {
        return false;
    }
    // Some exporters write "solid" into binary headers too.
    binary_len(bytes) != Some(bytes.len())
}

/// Exact byte length implied by a binary header, if one is present.
fn binary_len(bytes: &[u8]) -> Option<usize> {
    let count = bytes.get(HEADER_LEN..HEADER_LEN + 4)?;
    let count = u32::from_le_bytes([count[0], count[1], count[2], count[3]]) as usize;
    Some(HEADER_LEN + 4 + count * RECORD_LEN)
}

/// Weld key: grid cell, or exact bits once the grid index would overflow `i64`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum WeldKey {
    Grid([i64; 3]),
    Exact([u64; 3]),
}

impl WeldKey {
    fn of(p: &Point3) -> Self {
        let q = [p.x, p.y, p.z].map(|c| (c / WELD_PRECISION).round());
        if q.iter().all(|c| c.abs() < i64::MAX as f64) {
            WeldKey::Grid(q.map(|c| c as i64))
        } else {
            WeldKey::Exact([p.x, p.y, p.z].map(f64::to_bits))
        }
    }
}

#[derive(Default)]
struct Welder {
    index: HashMap<WeldKey, usize>,
    vertices: Vec<Point3>,
}

impl Welder {
    /// Callers reject non-finite corners first.
    fn vertex(&mut self, p: Point3) -> usize {
        let vertices = &mut self.vertices;
        *self.index.entry(WeldKey::of(&p)).or_insert_with(|| {
            vertices.push(p);
            vertices.len() - 1
        })
    }

    fn face(&mut self, corners: [Point3; 3]) -> [usize; 3] {
        corners.map(|p| self.vertex(p))
    }
}

fn parse_binary(bytes: &[u8]) -> Result<Mesh, MeshError> {
    let expected = binary_len(bytes).ok_or(MeshError::Truncated {
        expected: HEADER_LEN + 4,
        got: bytes.len(),
    })?;
    if bytes.len() < expected {
        return Err(MeshError::Truncated {
            expected,
            got: bytes.len(),
        });
    }
    let records = &bytes[HEADER_LEN + 4..expected];
    let mut welder = Welder::default();
    let mut faces = Vec::with_capacity(records.len() / RECORD_LEN);
    for (face, rec) in records.chunks_exact(RECORD_LEN).enumerate() {
        // Skip the stored normal (12 bytes); corners follow.
        let corner = |k: usize| {
            let off = 12 + 12 * k;
            Point3::new(
                read_f32(rec, off) as f64,
                read_f32(rec, off + 4) as f64,
                read_f32(rec, off + 8) as f64,
            )
        };
        let tri = [corner(0), corner(1), corner(2)];
        if !tri.iter().all(|p| p.iter().all(|c| c.is_finite())) {
            return Err(MeshError::NonFinite { face });
        }
        faces.push(welder.face(tri));
    }
    Ok(Mesh::new(welder.vertices, faces))
}

#[inline]
fn read_f32(rec: &[u8], off: usize) -> f32 {
    f32::from_le_bytes([rec[off], rec[off + 1], rec[off + 2], rec[off + 3]])
}

fn parse_ascii(text: &str) -> Result<Mesh, MeshError> {
    let mut welder = Welder::default();
    let mut faces = Vec::new();
    let mut corners: Vec<Point3> = Vec::with_capacity(3);
    let mut in_facet = false;

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let mut tokens = raw.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };
        match keyword.to_ascii_lowercase().as_str() {
            "facet" => {
                in_facet = true;
                corners.clear();
            }
            "vertex" if in_facet => {
                let mut coord = [0.0f64; 3];
                for c in coord.iter_mut() {
                    let tok = tokens.next().ok_or_else(|| MeshError::Parse {
                        line: line_no,
                        reason: "vertex needs three coordinates".into(),
                    })?;
                    *c = tok.parse().map_err(|e| MeshError::Parse {
                        line: line_no,
                        reason: format!("bad coordinate {tok:?}: {e}"),
                    })?;
                    if !c.is_finite() {
                        return Err(MeshError::Parse {
                            line: line_no,
                            reason: format!("non-finite coordinate {tok:?}"),
                        });
                    }
                }
                corners.push(Point3::from(coord));
            }
            "endfacet" if in_facet => {
                in_facet = false;
                let tri: [Point3; 3] = corners.as_slice().try_into().map_err(|_| {
                    MeshError::Parse {
                        line: line_no,
                        reason: format!("facet has {} vertices, expected 3", corners.len()),
                    }
                })?;
                faces.push(welder.face(tri));
            }
            _ => {}
        }
    }
    Ok(Mesh::new(welder.vertices, faces))
}
