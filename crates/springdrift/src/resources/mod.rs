use bevy::prelude::*;
use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};

mod active;

pub use active::{ActiveSimulation, ChainRun, NBodyRun, Report, SimulationRun};

/// Generator behind every random initial state
#[derive(Resource, Deref, DerefMut, Debug, Clone, PartialEq)]
pub struct SharedRng(pub ChaCha8Rng);

impl SharedRng {
    pub fn from_seed(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::default(),
        }
    }
}

impl Default for SharedRng {
    fn default() -> Self {
        Self(ChaCha8Rng::from_rng(&mut rand::rng()))
    }
}

/// Most recent diagnostics, refreshed every report interval
#[derive(Resource, Deref, DerefMut, Debug, Clone, Copy, Default, PartialEq)]
pub struct LatestReport(pub Option<Report>);
