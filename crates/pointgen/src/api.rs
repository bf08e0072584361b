//! Curated entry points (UNSTABLE).
//!
//! Important
//! - Mirrors the three operations exposed to host processes: triangle
//!   sampling, point-in-mesh classification and interior sampling.
//! - Hosts that marshal flat arrays should go through `Mesh::from_flat`
//!   and `Mesh::check_indices` before calling in; the core does not
//!   validate meshes.

pub use crate::geom3::{is_point_inside_mesh, Mesh, Point3};
pub use crate::sample::{generate_interior_points, point_in_triangle, ProgressSink, RngSeed};

/// Rejection-sample `target` interior points from flat vertex/face buffers.
///
/// Pre: `vertices.len() % 3 == 0`, `faces.len() % 3 == 0`.
/// Post: at most `target` points, in acceptance order. Index errors are
/// reported instead of indexing out of bounds.
pub fn interior_points_from_flat(
    vertices: &[f64],
    faces: &[usize],
    target: usize,
    seed: RngSeed,
    progress: Option<&mut dyn ProgressSink>,
) -> Result<Vec<Point3>, crate::MeshError> {
    let mesh = Mesh::from_flat(vertices, faces)?;
    mesh.check_indices()?;
    let mut rng = seed.into_rng();
    let sampler = crate::sample::InteriorSampler::new(&mesh);
    let sample = match progress {
        Some(sink) => sampler.run_with_progress(target, &mut rng, sink),
        None => sampler.run(target, &mut rng),
    };
    Ok(sample.points)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUBE_V: [f64; 24] = [
        0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0,
    ];
    const CUBE_F: [usize; 36] = [
        0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7, 0, 4, 7, 0, 7, 3, //
        1, 5, 6, 1, 6, 2, 0, 1, 5, 0, 5, 4, 3, 2, 6, 3, 6, 7,
    ];

    #[test]
    fn flat_buffers_sample_the_cube() {
        let mut calls = Vec::new();
        let mut sink = |c: usize, t: usize| calls.push((c, t));
        let pts =
            interior_points_from_flat(&CUBE_V, &CUBE_F, 20, RngSeed::Fixed(5), Some(&mut sink))
                .unwrap();
        assert_eq!(pts.len(), 20);
        assert_eq!(calls, vec![(10, 20), (20, 20)]);
    }

    #[test]
    fn flat_buffers_reject_bad_indices() {
        let mut faces = CUBE_F;
        faces[4] = 8;
        let err = interior_points_from_flat(&CUBE_V, &faces, 5, RngSeed::Fixed(1), None);
        assert!(matches!(
            err,
            Err(crate::MeshError::IndexOutOfRange { face: 1, index: 8, .. })
        ));
    }
}
