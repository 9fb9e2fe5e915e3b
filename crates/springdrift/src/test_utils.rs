//! Fixtures shared by unit tests, integration tests and benches

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::config::SimulationConfig;
use crate::physics::forces::ForceLaw;
use crate::physics::params::{ChainParams, NBodyParams};
use crate::physics::particles::{Body, ChainParticle};
use crate::physics::scenario;
use crate::plugins::simulation::SimulationPlugin;

/// Headless app running the simulation plugin with `config`
pub fn create_test_app(config: SimulationConfig) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, SimulationPlugin::with_config(config)));
    app
}

/// Small configuration that builds and steps quickly
pub fn quick_config() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.chain.particle_count = 8;
    config.nbody.particle_count = 24;
    config.run.steps = 12;
    config.run.report_interval = 5;
    config.run.seed = Some(2024);
    config
}

/// Five particles along x with the middle one displaced and both ends fixed
///
/// With `l = 0.5` the spring from particle 1 to 2 is stretched by 0.1 and the
/// spring from 2 to 3 is compressed by 0.1.
pub fn displaced_chain() -> (Vec<ChainParticle<f64>>, ChainParams<f64>) {
    let xs = [0.0, 0.5, 1.1, 1.5, 2.0];
    let last = xs.len() - 1;
    let particles = xs
        .iter()
        .enumerate()
        .map(|(i, &x)| ChainParticle::new(DVec3::new(x, 0.0, 0.0), i != 0 && i != last))
        .collect();

    let params = ChainParams::new(5, 2.0, 1.0 / 60.0, 250.0, 30.0, 1.0, ChainParams::<f64>::scaled_gravity(5));
    (particles, params)
}

/// Undamped, weightless chain with a gentle axial standing wave
pub fn oscillating_chain() -> (Vec<ChainParticle<f64>>, ChainParams<f64>) {
    let count = 8;
    let last = count - 1;
    let particles = (0..count)
        .map(|i| {
            let phase = std::f64::consts::PI * i as f64 / last as f64;
            let x = 0.5 * i as f64 + 0.05 * libm::sin(phase);
            ChainParticle::new(DVec3::new(x, 0.0, 0.0), i != 0 && i != last)
        })
        .collect();

    let params = ChainParams::new(count, 3.5, 1.0 / 60.0, 50.0, 0.0, 1.0, DVec3::ZERO);
    (particles, params)
}

/// Default rope hanging between its anchors
pub fn hanging_chain(count: usize) -> (Vec<ChainParticle<f64>>, ChainParams<f64>) {
    let particles = scenario::straight_chain::<f64>(count, DVec3::new(-0.9, 0.0, 0.0), DVec3::new(0.9, 0.0, 0.0));
    let params = ChainParams::new(
        count,
        1.8,
        1.0 / 60.0,
        250.0,
        30.0,
        1.0,
        ChainParams::<f64>::scaled_gravity(count),
    );
    (particles, params)
}

/// Equal-mass circular orbit with unit separation; returns its period too.
pub fn circular_orbit(law: ForceLaw) -> (Vec<Body<f64>>, NBodyParams<f64>, f64) {
    let (g, separation) = (1.0, 1.0);
    let bodies = scenario::two_body_circular_orbit(law, [1.0, 1.0], g, separation);
    let period = scenario::circular_period(law, 2.0, g, separation);
    (bodies, NBodyParams::new(2, 0.001, g, 0.01), period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::ActiveSimulation;

    #[test]
    fn test_create_test_app() {
        let mut app = create_test_app(quick_config());
        app.update();
        assert!(app.world().contains_resource::<SimulationConfig>());
        assert!(app.world().contains_resource::<ActiveSimulation>());
    }

    #[test]
    fn test_fixture_shapes() {
        let (chain, params) = displaced_chain();
        assert_eq!(chain.len(), params.particle_count);
        assert_eq!(params.natural_length, 0.5);

        let (chain, params) = oscillating_chain();
        assert_eq!(chain.len(), params.particle_count);
        assert_eq!(params.natural_length, 0.5);
        assert!(!chain[7].is_free());
    }
}
