use super::*;
use nalgebra::vector;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Prism over the square (0,0),(1,-1),(2,0),(1,1) rotated 45°, z in [0,1].
/// Outward-wound; vertical ridges at (0,0), (1,±1), (2,0).
fn diamond_prism() -> Mesh {
    let base = [(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (1.0, -1.0)];
    let mut vertices: Vec<Point3> = base.iter().map(|&(x, y)| vector![x, y, 0.0]).collect();
    vertices.extend(base.iter().map(|&(x, y)| vector![x, y, 1.0]));
    let faces = vec![
        [0, 1, 2],
        [0, 2, 3],
        [4, 6, 5],
        [4, 7, 6],
        [0, 3, 7],
        [0, 7, 4],
        [3, 2, 6],
        [3, 6, 7],
        [2, 1, 5],
        [2, 5, 6],
        [1, 0, 4],
        [1, 4, 5],
    ];
    Mesh::new(vertices, faces)
}

fn tetra() -> Mesh {
    Mesh::new(
        vec![
            vector![0.0, 0.0, 0.0],
            vector![1.0, 0.0, 0.0],
            vector![0.0, 1.0, 0.0],
            vector![0.0, 0.0, 1.0],
        ],
        vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
    )
}

#[test]
fn unit_cube_inside_outside() {
    let cube = Mesh::unit_cube();
    assert!(is_point_inside_mesh(&vector![0.5, 0.5, 0.5], &cube));
    assert!(is_point_inside_mesh(&vector![0.25, 0.8, 0.1], &cube));
    assert!(!is_point_inside_mesh(&vector![10.0, 10.0, 10.0], &cube));
    assert!(!is_point_inside_mesh(&vector![0.5, 0.5, 1.5], &cube));
    assert!(!is_point_inside_mesh(&vector![-0.5, 0.3, 0.6], &cube));
    assert!(!is_point_inside_mesh(&vector![2.0, 0.5, 0.5], &cube));
}

/// `n` unit cubes along x at offsets 0, 2, 4, ...
fn cube_row(n: usize) -> Mesh {
    let unit = Mesh::unit_cube();
    let mut vertices = Vec::new();
    let mut faces = Vec::new();
    for k in 0..n {
        let base = vertices.len();
        let shift = vector![2.0 * k as f64, 0.0, 0.0];
        vertices.extend(unit.vertices.iter().map(|v| v + shift));
        faces.extend(unit.faces.iter().map(|f| f.map(|i| i + base)));
    }
    Mesh::new(vertices, faces)
}

#[test]
fn mixed_winding_cube_from_flat_buffers() {
    // Right face wound (1,5,6),(1,6,2): same split diagonal as `unit_cube`,
    // opposite winding on several other faces.
    let vertices = [
        0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0,
    ];
    let faces = [
        0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7, 0, 4, 7, 0, 7, 3, //
        1, 5, 6, 1, 6, 2, 0, 1, 5, 0, 5, 4, 3, 2, 6, 3, 6, 7,
    ];
    let cube = Mesh::from_flat(&vertices, &faces).unwrap();
    let centre = vector![0.5, 0.5, 0.5];
    assert!(is_point_inside_mesh(&centre, &cube));
    let literal = GeomCfg {
        merge_coincident: false,
        ..GeomCfg::default()
    };
    assert_eq!(count_ray_crossings(&centre, &RAY_DIR, &cube, &literal), 2);
    assert!(!is_point_inside_mesh(&vector![2.0, 0.5, 0.5], &cube));
    assert!(!is_point_inside_mesh(&vector![-0.5, 0.3, 0.6], &cube));
    assert!(!is_point_inside_mesh(&vector![10.0, 10.0, 10.0], &cube));
}

#[test]
fn many_hits_on_one_ray() {
    // Every x-face is crossed through its diagonal: two hits per face.
    let row = cube_row(5);
    let literal = GeomCfg {
        merge_coincident: false,
        ..GeomCfg::default()
    };
    let start = vector![-1.0, 0.5, 0.5];
    let hits = count_ray_crossings(&start, &RAY_DIR, &row, &literal);
    assert_eq!(hits, 20);
    assert!(hits > super::containment::INLINE_HITS);
    assert_eq!(count_ray_crossings(&start, &RAY_DIR, &row, &GeomCfg::default()), 10);

    assert!(is_point_inside_mesh(&vector![4.5, 0.5, 0.5], &row));
    assert!(!is_point_inside_mesh(&vector![5.5, 0.5, 0.5], &row));
    assert!(is_point_inside_mesh(&vector![0.5, 0.5, 0.5], &row));
}

#[test]
fn shared_edge_counts_once_when_merging() {
    // The +x ray from the centre passes through the diagonal of the x=1 face.
    let cube = Mesh::unit_cube();
    let p = vector![0.5, 0.5, 0.5];
    let literal = GeomCfg {
        merge_coincident: false,
        ..GeomCfg::default()
    };
    assert_eq!(count_ray_crossings(&p, &RAY_DIR, &cube, &literal), 2);
    assert_eq!(count_ray_crossings(&p, &RAY_DIR, &cube, &GeomCfg::default()), 1);
}

#[test]
fn ridge_pass_through_and_graze() {
    let prism = diamond_prism();
    // Exits through the ridge at (2,0,z): two exit-facing hits, one crossing.
    let inside = vector![1.0, 0.0, 0.5];
    assert!(is_point_inside_mesh(&inside, &prism));
    // Touches the ridge at (1,1,z) from outside: facings differ, the pair cancels.
    let graze = vector![-1.0, 1.0, 0.5];
    assert_eq!(
        count_ray_crossings(&graze, &RAY_DIR, &prism, &GeomCfg::default()),
        2
    );
    assert!(!is_point_inside_mesh(&graze, &prism));
}

#[test]
fn ray_triangle_cases() {
    let cfg = GeomCfg::default();
    let v0 = vector![1.0, 0.0, 0.0];
    let v1 = vector![1.0, 1.0, 0.0];
    let v2 = vector![1.0, 0.0, 1.0];
    let d = RAY_DIR;
    // Hit at x=1 from the origin side.
    let t = ray_triangle_intersect(&vector![0.0, 0.2, 0.2], &d, &v0, &v1, &v2, &cfg)
        .expect("hit");
    assert!((t - 1.0).abs() < 1e-12);
    // Triangle behind the origin.
    assert!(ray_triangle_intersect(&vector![2.0, 0.2, 0.2], &d, &v0, &v1, &v2, &cfg).is_none());
    // Outside the triangle (u + v > 1).
    assert!(ray_triangle_intersect(&vector![0.0, 0.8, 0.8], &d, &v0, &v1, &v2, &cfg).is_none());
    // Ray parallel to the plane z = 0.
    let flat = [
        vector![0.0, 0.0, 0.0],
        vector![1.0, 0.0, 0.0],
        vector![0.0, 1.0, 0.0],
    ];
    assert!(ray_triangle_intersect(
        &vector![-1.0, 0.1, 0.0],
        &d,
        &flat[0],
        &flat[1],
        &flat[2],
        &cfg
    )
    .is_none());
    // Origin on the plane: t = 0 is not a forward crossing.
    assert!(ray_triangle_intersect(&vector![1.0, 0.2, 0.2], &d, &v0, &v1, &v2, &cfg).is_none());
}

#[test]
fn tetra_matches_analytic_membership() {
    let mesh = tetra();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..2000 {
        let p = vector![
            rng.gen_range(-0.2..1.2),
            rng.gen_range(-0.2..1.2),
            rng.gen_range(-0.2..1.2)
        ];
        let analytic = p.x > 0.0 && p.y > 0.0 && p.z > 0.0 && p.x + p.y + p.z < 1.0;
        assert_eq!(is_point_inside_mesh(&p, &mesh), analytic, "p = {p:?}");
    }
}

#[test]
fn points_outside_bounds_are_outside() {
    let mesh = diamond_prism();
    let b = mesh.bounds().unwrap();
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..500 {
        let p = vector![
            rng.gen_range(-5.0..5.0),
            rng.gen_range(-5.0..5.0),
            rng.gen_range(-5.0..5.0)
        ];
        if !b.contains(&p) {
            assert!(!is_point_inside_mesh(&p, &mesh));
        }
    }
}

#[test]
fn empty_mesh_contains_nothing() {
    let mesh = Mesh::default();
    assert!(mesh.is_empty());
    assert!(mesh.bounds().is_none());
    assert!(!is_point_inside_mesh(&vector![0.0, 0.0, 0.0], &mesh));
}

#[test]
fn bounds_of_prism() {
    let b = diamond_prism().bounds().unwrap();
    assert_eq!(b.min, vector![0.0, -1.0, 0.0]);
    assert_eq!(b.max, vector![2.0, 1.0, 1.0]);
    assert!((b.volume() - 4.0).abs() < 1e-12);
    assert!(b.contains(&vector![1.0, 0.0, 0.5]));
    assert!(!b.contains(&vector![1.0, 0.0, 1.5]));
}

#[test]
fn flat_buffers_and_index_checks() {
    let mesh = Mesh::from_flat(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], &[0, 1, 2]).unwrap();
    assert_eq!(mesh.vertices.len(), 3);
    assert_eq!(mesh.faces, vec![[0, 1, 2]]);
    assert!(mesh.check_indices().is_ok());

    assert!(matches!(
        Mesh::from_flat(&[0.0, 1.0], &[]),
        Err(MeshError::FlatShape { what: "vertex", len: 2 })
    ));
    assert!(matches!(
        Mesh::from_flat(&[], &[0, 1]),
        Err(MeshError::FlatShape { what: "face", len: 2 })
    ));

    let bad = Mesh::new(mesh.vertices.clone(), vec![[0, 1, 2], [2, 3, 0]]);
    let err = bad.check_indices().unwrap_err();
    assert!(matches!(
        err,
        MeshError::IndexOutOfRange {
            face: 1,
            index: 3,
            vertex_count: 3
        }
    ));
    assert!(err.to_string().contains("vertex 3"));
}
