//! Seeding contract for all samplers.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Where a sampler's `StdRng` comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RngSeed {
    /// Fresh OS entropy; draws differ between runs.
    #[default]
    Entropy,
    /// Reproducible stream: the same seed yields the same draws.
    Fixed(u64),
}

impl RngSeed {
    pub fn into_rng(self) -> StdRng {
        match self {
            RngSeed::Entropy => StdRng::from_entropy(),
            RngSeed::Fixed(seed) => StdRng::seed_from_u64(seed),
        }
    }
}

impl From<Option<u64>> for RngSeed {
    fn from(seed: Option<u64>) -> Self {
        seed.map_or(RngSeed::Entropy, RngSeed::Fixed)
    }
}
