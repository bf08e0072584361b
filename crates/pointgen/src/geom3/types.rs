//! Basic 3D types and tolerances.
//!
//! - `GeomCfg`: epsilons and hit merging for the ray/triangle test.
//! - `Mesh`: vertex list plus triangular faces indexing into it.
//! - `Aabb3`: axis-aligned bounding box, derived from vertices.

use nalgebra::Vector3;

use super::error::MeshError;

/// A point (or direction) in R³.
pub type Point3 = Vector3<f64>;

/// Geometry configuration (tolerances).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeomCfg {
    /// `|e1 · (d × e2)|` below this means the ray is parallel to the face.
    pub eps_parallel: f64,
    /// Minimum ray parameter for a crossing to count (excludes the origin).
    pub eps_t: f64,
    /// Collapse hits sharing the same `t` (shared edges/vertices) into one crossing.
    pub merge_coincident: bool,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            eps_parallel: 1e-8,
            eps_t: 1e-8,
            merge_coincident: true,
        }
    }
}

impl GeomCfg {
    /// Same epsilon for both checks.
    #[inline]
    pub fn uniform(eps: f64) -> Self {
        Self {
            eps_parallel: eps,
            eps_t: eps,
            ..Self::default()
        }
    }
}

/// Indexed triangle mesh. Faces are `[i0, i1, i2]` into `vertices`.
///
/// Invariant (not enforced): every index is `< vertices.len()`. Accessors
/// panic otherwise; call `check_indices` at trust boundaries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Point3>,
    pub faces: Vec<[usize; 3]>,
}

impl Mesh {
    #[inline]
    pub fn new(vertices: Vec<Point3>, faces: Vec<[usize; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Build from row-major flat buffers (`xyz xyz ...`, `ijk ijk ...`).
    pub fn from_flat(vertices: &[f64], faces: &[usize]) -> Result<Self, MeshError> {
        if vertices.len() % 3 != 0 {
            return Err(MeshError::FlatShape {
                what: "vertex",
                len: vertices.len(),
            });
        }
        if faces.len() % 3 != 0 {
            return Err(MeshError::FlatShape {
                what: "face",
                len: faces.len(),
            });
        }
        let vertices = vertices
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        let faces = faces.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();
        Ok(Self { vertices, faces })
    }

    /// Axis-aligned unit cube `[0,1]³`: 8 vertices, 12 outward-wound triangles.
    pub fn unit_cube() -> Self {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        let faces = vec![
            [0, 2, 1],
            [0, 3, 2], // bottom
            [4, 5, 6],
            [4, 6, 7], // top
            [0, 4, 7],
            [0, 7, 3], // left
            [1, 2, 6],
            [1, 6, 5], // right
            [0, 1, 5],
            [0, 5, 4], // front
            [3, 7, 6],
            [3, 6, 2], // back
        ];
        Self { vertices, faces }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Corner positions of face `i`.
    #[inline]
    pub fn triangle(&self, i: usize) -> [Point3; 3] {
        let [a, b, c] = self.faces[i];
        [self.vertices[a], self.vertices[b], self.vertices[c]]
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Point3; 3]> + '_ {
        (0..self.faces.len()).map(move |i| self.triangle(i))
    }

    /// Bounds over all vertices (`None` for an empty vertex list).
    pub fn bounds(&self) -> Option<Aabb3> {
        Aabb3::from_points(&self.vertices)
    }

    /// Report the first face index that points past the vertex list.
    pub fn check_indices(&self) -> Result<(), MeshError> {
        let n = self.vertices.len();
        for (face, idx) in self.faces.iter().enumerate() {
            if let Some(&index) = idx.iter().find(|&&i| i >= n) {
                return Err(MeshError::IndexOutOfRange {
                    face,
                    index,
                    vertex_count: n,
                });
            }
        }
        Ok(())
    }
}

/// Closed axis-aligned box `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb3 {
    pub min: Point3,
    pub max: Point3,
}

impl Aabb3 {
    pub fn from_points(points: &[Point3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut min = *first;
        let mut max = *first;
        for p in rest {
            min = min.inf(p);
            max = max.sup(p);
        }
        Some(Self { min, max })
    }

    #[inline]
    pub fn contains(&self, p: &Point3) -> bool {
        (0..3).all(|k| p[k] >= self.min[k] && p[k] <= self.max[k])
    }

    #[inline]
    pub fn extent(&self) -> Point3 {
        self.max - self.min
    }

    #[inline]
    pub fn volume(&self) -> f64 {
        let e = self.extent();
        e.x * e.y * e.z
    }
}
