//! Random point generation.
//!
//! - `source`: seeding contract (`RngSeed`); every sampler takes the
//!   generator as an argument, there is no hidden global state.
//! - `triangle`: uniform point on a filled triangle (barycentric fold).
//! - `interior`: bounding-box rejection sampler for points inside a mesh,
//!   with progress reporting, attempt budget and cancellation.

mod interior;
mod source;
mod triangle;

pub use interior::{
    generate_interior_points, CancelToken, ChannelSink, InteriorSample, InteriorSampler,
    Progress, ProgressSink, SampleStatus, SamplerCfg,
};
pub use source::RngSeed;
pub use triangle::{barycentric_weights, point_in_triangle};
