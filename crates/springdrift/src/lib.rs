//! springdrift library
//!
//! Data-parallel point-mass integration for damped spring chains and N-body
//! gravity, exposed as a library so the binary, benches and integration
//! tests share one implementation.

pub mod cli;
pub mod config;
pub mod events;
pub mod physics;
pub mod plugins;
pub mod prelude;
pub mod resources;

// Test utilities are public for integration tests and benches
pub mod test_utils;

// Re-export commonly used items
pub use config::SimulationConfig;
pub use events::*;
pub use physics::{
    forces::ForceLaw,
    integrators,
    math::{Real, Vector},
    particles::{Body, ChainParticle},
};
pub use plugins::simulation::SimulationPlugin;
