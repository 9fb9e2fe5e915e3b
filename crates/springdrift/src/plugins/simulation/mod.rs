//! Simulation plugin
//!
//! Owns the configuration, the shared generator and the active simulation,
//! and advances the simulation by one physical step per app update.

use crate::prelude::*;

mod systems;

pub use systems::{
    exit_after_step_budget, handle_simulation_commands, report_progress, setup_simulation,
    step_simulation,
};

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Commands,
    Step,
    Report,
}

/// Whether stepping is suspended
#[derive(Resource, Deref, DerefMut, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Paused(pub bool);

pub struct SimulationPlugin {
    config: Option<SimulationConfig>,
}

impl SimulationPlugin {
    pub fn new() -> Self {
        Self { config: None }
    }

    pub fn with_config(config: SimulationConfig) -> Self {
        Self {
            config: Some(config),
        }
    }
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = self
            .config
            .clone()
            .unwrap_or_else(SimulationConfig::load_from_user_config);

        match toml::to_string_pretty(&config) {
            Ok(toml_string) => {
                debug!("=== Current Configuration (TOML) ===\n{}", toml_string);
                debug!("=== End Configuration ===");
            }
            Err(e) => {
                error!("Failed to serialize configuration to TOML: {}", e);
            }
        }

        app.insert_resource(SharedRng::from_optional_seed(config.run.seed));
        app.insert_resource(config);
        app.init_resource::<Paused>();
        app.init_resource::<LatestReport>();

        app.add_event::<SimulationCommand>();

        app.configure_sets(
            Update,
            (
                SimulationSet::Commands,
                SimulationSet::Step,
                SimulationSet::Report,
            )
                .chain(),
        );

        app.add_systems(Startup, setup_simulation);
        app.add_systems(
            Update,
            (
                handle_simulation_commands.in_set(SimulationSet::Commands),
                step_simulation
                    .in_set(SimulationSet::Step)
                    .run_if(|paused: Res<Paused>| !**paused),
                (report_progress, exit_after_step_budget)
                    .chain()
                    .in_set(SimulationSet::Report),
            ),
        );
    }
}
