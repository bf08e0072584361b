//! Point-in-mesh classification by ray parity.
//!
//! Model
//! - Cast one ray from the query point along `RAY_DIR`, intersect it with
//!   every face (Möller–Trumbore), count forward crossings; odd means inside.
//! - A ray through a shared edge or vertex hits several faces at the same
//!   `t`. With `GeomCfg::merge_coincident` those hits collapse into one
//!   crossing when they all face the same way (the ray passes through the
//!   surface), and stay separate when facings differ (the ray grazes a
//!   ridge and the pair cancels).

use smallvec::SmallVec;

use super::types::{GeomCfg, Mesh, Point3};

/// Canonical ray direction for containment queries.
pub const RAY_DIR: Point3 = Point3::new(1.0, 0.0, 0.0);

/// Hits held inline before `count_ray_crossings` allocates.
pub(crate) const INLINE_HITS: usize = 16;

/// Ray/triangle intersection (Möller–Trumbore). Returns the ray parameter
/// `t > eps_t` of the hit, or `None` when the ray is parallel to the
/// triangle plane, misses it, or hits behind the origin.
#[inline]
pub fn ray_triangle_intersect(
    origin: &Point3,
    dir: &Point3,
    v0: &Point3,
    v1: &Point3,
    v2: &Point3,
    cfg: &GeomCfg,
) -> Option<f64> {
    hit(origin, dir, v0, v1, v2, cfg).map(|(t, _)| t)
}

/// Returns `(t, det)`; the sign of `det` tells which side the ray enters from.
fn hit(
    origin: &Point3,
    dir: &Point3,
    v0: &Point3,
    v1: &Point3,
    v2: &Point3,
    cfg: &GeomCfg,
) -> Option<(f64, f64)> {
    let e1 = v1 - v0;
    let e2 = v2 - v0;
    let h = dir.cross(&e2);
    let a = e1.dot(&h);
    if a.abs() < cfg.eps_parallel {
        return None;
    }
    let f = 1.0 / a;
    let s = origin - v0;
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(&e1);
    let v = f * dir.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = f * e2.dot(&q);
    (t > cfg.eps_t).then_some((t, a))
}

/// Number of surface crossings along the ray `point + t·dir`, `t > eps_t`.
pub fn count_ray_crossings(point: &Point3, dir: &Point3, mesh: &Mesh, cfg: &GeomCfg) -> usize {
    let hits = mesh
        .triangles()
        .filter_map(|[v0, v1, v2]| hit(point, dir, &v0, &v1, &v2, cfg));
    if !cfg.merge_coincident {
        return hits.count();
    }
    // Inline up to `INLINE_HITS`; longer hit lists spill to the heap.
    let mut hits: SmallVec<[(f64, f64); INLINE_HITS]> = hits.collect();
    hits.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));
    let mut crossings = 0;
    let mut i = 0;
    while i < hits.len() {
        let t0 = hits[i].0;
        let tol = cfg.eps_t * t0.abs().max(1.0);
        let mut j = i + 1;
        while j < hits.len() && hits[j].0 - t0 <= tol {
            j += 1;
        }
        let group = &hits[i..j];
        let same_facing = group
            .iter()
            .all(|&(_, det)| det.signum() == group[0].1.signum());
        crossings += if same_facing { 1 } else { group.len() };
        i = j;
    }
    crossings
}

/// `true` iff `point` lies inside the closed mesh (default tolerances).
#[inline]
pub fn is_point_inside_mesh(point: &Point3, mesh: &Mesh) -> bool {
    is_point_inside_mesh_cfg(point, mesh, &GeomCfg::default())
}

pub fn is_point_inside_mesh_cfg(point: &Point3, mesh: &Mesh, cfg: &GeomCfg) -> bool {
    count_ray_crossings(point, &RAY_DIR, mesh, cfg) % 2 == 1
}
