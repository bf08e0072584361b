//! Uniform points on a filled triangle.
//!
//! Draw `(r1, r2)` in the unit square and reflect the half with
//! `r1 + r2 > 1` back into the simplex, so no draw is rejected.

use rand::Rng;

use crate::geom3::Point3;

/// Barycentric weights `(r1, r2, r3)`, each in `[0, 1]`, summing to 1.
#[inline]
pub fn barycentric_weights<R: Rng + ?Sized>(rng: &mut R) -> (f64, f64, f64) {
    let mut r1: f64 = rng.gen();
    let mut r2: f64 = rng.gen();
    if r1 + r2 > 1.0 {
        r1 = 1.0 - r1;
        r2 = 1.0 - r2;
    }
    (r1, r2, 1.0 - r1 - r2)
}

/// Uniform random point inside the triangle `(p1, p2, p3)`.
pub fn point_in_triangle<R: Rng + ?Sized>(
    rng: &mut R,
    p1: &Point3,
    p2: &Point3,
    p3: &Point3,
) -> Point3 {
    let (r1, r2, r3) = barycentric_weights(rng);
    p1 * r1 + p2 * r2 + p3 * r3
}
