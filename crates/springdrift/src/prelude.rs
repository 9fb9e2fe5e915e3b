//! springdrift prelude module
//!
//! Re-exports the types most modules and integration tests reach for.

// External crate re-exports
pub use bevy::prelude::*;
pub use rand::Rng;

// Internal re-exports - Config
pub use crate::config::{Precision, SimulationConfig, SystemKind};

// Internal re-exports - Events
pub use crate::events::SimulationCommand;

// Internal re-exports - Resources
pub use crate::resources::{ActiveSimulation, LatestReport, SharedRng};

// Internal re-exports - Physics
pub use crate::physics::integrators::{ChainRegistry, Integrator, NBodyRegistry};
pub use crate::physics::math::Real;
pub use crate::physics::simulation::{ChainSimulation, NBodySimulation, SimulationError};
