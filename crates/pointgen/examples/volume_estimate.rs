//! Monte Carlo volume of the unit cube and an STL file via interior sampling.
//!
//! Usage:
//!   cargo run -p pointgen --example volume_estimate
//!   cargo run -p pointgen --example volume_estimate -- path/to/mesh.stl 5000
//!
//! Prints accepted/attempted counts, status and the volume estimate
//! (bounding-box volume × acceptance rate).

use pointgen::io::stl::read_stl;
use pointgen::sample::{InteriorSampler, RngSeed};
use pointgen::Mesh;

fn main() {
    let mut args = std::env::args().skip(1);
    let mesh = match args.next() {
        Some(path) => match read_stl(&path) {
            Ok(m) => m,
            Err(err) => {
                eprintln!("{err}");
                std::process::exit(1);
            }
        },
        None => Mesh::unit_cube(),
    };
    let n: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(2000);
    let mut rng = RngSeed::Fixed(1).into_rng();
    let s = InteriorSampler::new(&mesh).run(n, &mut rng);
    println!(
        "faces={} accepted={}/{} attempts={} status={:?} volume≈{:.4}",
        mesh.faces.len(),
        s.points.len(),
        s.requested,
        s.attempts,
        s.status,
        s.volume_estimate().unwrap_or(0.0)
    );
}
