//! Point sampling inside closed triangle meshes.
//!
//! Layout
//! - `geom3`: 3D types (`Point3`, `Mesh`, `Aabb3`) and the ray-parity
//!   containment predicate.
//! - `sample`: random sources, the barycentric triangle sampler and the
//!   bounding-box rejection sampler for interior points.
//! - `io`: mesh loading (STL, ASCII and binary).
//!
//! API Policy
//! - Random state is always passed in by the caller (`&mut impl Rng`).
//!   Use `RngSeed::Fixed` when reproducibility matters.

pub mod api;
pub mod geom3;
pub mod io;
pub mod sample;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use geom3::{Aabb3, GeomCfg, Mesh, MeshError, Point3};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::geom3::{
        count_ray_crossings, is_point_inside_mesh, is_point_inside_mesh_cfg,
        ray_triangle_intersect, Aabb3, GeomCfg, Mesh, MeshError, Point3, RAY_DIR,
    };
    pub use crate::io::stl::{parse_stl, read_stl};
    pub use crate::sample::{
        generate_interior_points, point_in_triangle, CancelToken, ChannelSink, InteriorSample,
        InteriorSampler, Progress, ProgressSink, RngSeed, SampleStatus, SamplerCfg,
    };
}
