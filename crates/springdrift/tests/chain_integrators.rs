//! Behavior shared by every spring chain scheme
//!
//! Anchors must never move, free particles must respond to the springs the
//! same way under every scheme, and the symplectic schemes must hold the
//! energy of an undamped chain while the explicit Euler step lets it grow.

use bevy::math::DVec3;
use springdrift::physics::diagnostics::chain_energy;
use springdrift::physics::integrators::ChainRegistry;
use springdrift::physics::params::ChainParams;
use springdrift::physics::particles::ChainParticle;
use springdrift::physics::simulation::ChainSimulation;
use springdrift::test_utils::{displaced_chain, hanging_chain, oscillating_chain};

const SCHEMES: [&str; 4] = [
    "semi_implicit_euler",
    "leapfrog",
    "velocity_verlet",
    "staggered_verlet",
];

const SYMPLECTIC: [&str; 3] = ["leapfrog", "velocity_verlet", "staggered_verlet"];

fn simulation(
    name: &str,
    initial: Vec<ChainParticle<f64>>,
    params: &ChainParams<f64>,
) -> ChainSimulation<f64> {
    let integrator = ChainRegistry::<f64>::default().create(name).unwrap();
    ChainSimulation::new(initial, integrator, params).unwrap()
}

#[test]
fn test_anchors_are_bit_exact() {
    for name in SCHEMES {
        let (initial, params) = hanging_chain(20);
        let (first, last) = (initial[0], initial[19]);
        let mut simulation = simulation(name, initial, &params);

        for _ in 0..200 {
            simulation.step(&params).unwrap();
            let state = simulation.current();
            assert_eq!(state[0].position, first.position, "{name} moved the left anchor");
            assert_eq!(state[19].position, last.position, "{name} moved the right anchor");
            assert_eq!(state[0].velocity, DVec3::ZERO);
        }
    }
}

#[test]
fn test_pinned_interior_particle_is_frozen() {
    for name in SCHEMES {
        let (initial, params) = hanging_chain(12);
        let mut simulation = simulation(name, initial, &params);
        for _ in 0..10 {
            simulation.step(&params).unwrap();
        }

        simulation.pin(6).unwrap();
        let pinned = simulation.current()[6].position;
        for _ in 0..50 {
            simulation.step(&params).unwrap();
            assert_eq!(simulation.current()[6].position, pinned, "{name} moved a pinned particle");
        }
    }
}

#[test]
fn test_hanging_chain_sags_and_stays_finite() {
    for name in SCHEMES {
        let (initial, params) = hanging_chain(20);
        let mut simulation = simulation(name, initial, &params);
        for _ in 0..600 {
            simulation.step(&params).unwrap();
        }

        let state = simulation.current();
        assert!(state.iter().all(|p| p.position.is_finite()), "{name} diverged");
        assert!(state[10].position.y < -0.05, "{name} did not sag: {}", state[10].position.y);
        // symmetric about the midpoint
        assert!((state[4].position.y - state[15].position.y).abs() < 1e-6);
    }
}

#[test]
fn test_velocity_verlet_first_step() {
    let (initial, params) = displaced_chain();
    let mut simulation = simulation("velocity_verlet", initial, &params);

    // Stretched left spring and compressed right spring both pull toward -x
    let force = simulation.current()[2].force;
    assert!((force.x + 50.0).abs() < 1e-9);
    assert!((force.y - params.gravity.y).abs() < 1e-12);

    simulation.step(&params).unwrap();
    let moved = simulation.current()[2];
    assert!(moved.velocity.x < 0.0);
    assert!(moved.velocity.x > -params.dt * 50.0);

    // Drift with the stored forces: +25 on particles 1 and 3, -50 on particle 2
    let dt = params.dt;
    let drift = 0.5 * dt * dt;
    let (x1, x2, x3) = (0.5 + 25.0 * drift, 1.1 - 50.0 * drift, 1.5 + 25.0 * drift);
    let (v1, v2, v3) = (12.5 * dt, -25.0 * dt, 12.5 * dt);

    // Force at the drifted state; both springs stay on the x axis
    let stretch = |length: f64| (length - 0.5) * 250.0;
    let force = -stretch(x2 - x1) + stretch(x3 - x2) - 30.0 * (v2 - v1) - 30.0 * (v2 - v3);

    assert!((moved.position.x - x2).abs() < 1e-12);
    assert!((moved.force.x - force).abs() < 1e-10);
    assert!((moved.velocity.x - (-50.0 + force) * dt / 2.0).abs() < 1e-12);
}

#[test]
fn test_velocity_verlet_transverse_displacement() {
    let (mut initial, params) = displaced_chain();
    let params = params.with_gravity(DVec3::ZERO);
    for (i, particle) in initial.iter_mut().enumerate() {
        particle.position = DVec3::new(0.5 * i as f64, 0.0, 0.0);
    }
    initial[2].position.y = 0.1;

    let mut simulation = simulation("velocity_verlet", initial, &params);
    let reach = 0.26_f64.sqrt();
    let expected = 2.0 * (reach - 0.5) * 250.0 * (-0.1 / reach);
    assert!((simulation.current()[2].force.y - expected).abs() < 1e-9);
    assert_eq!(simulation.current()[2].force.x, 0.0);

    simulation.step(&params).unwrap();
    assert!(simulation.current()[2].velocity.y < 0.0);
}

#[test]
fn test_every_scheme_pulls_the_same_way() {
    for name in SCHEMES {
        let (initial, params) = displaced_chain();
        let mut simulation = simulation(name, initial, &params);
        for _ in 0..3 {
            simulation.step(&params).unwrap();
        }
        let moved = simulation.current()[2].position;
        assert!(moved.x < 1.1, "{name} left particle 2 at {moved}");
    }
}

fn relative_energy_drift(name: &str, steps: usize) -> (f64, f64) {
    let (initial, params) = oscillating_chain();
    let initial_energy = chain_energy(&initial, &params).total();
    let mut simulation = simulation(name, initial, &params);

    let mut worst: f64 = 0.0;
    for _ in 0..steps {
        simulation.step(&params).unwrap();
        let energy = simulation.energy(&params).total();
        worst = worst.max((energy - initial_energy).abs() / initial_energy);
    }
    (worst, simulation.energy(&params).total() / initial_energy)
}

#[test]
fn test_symplectic_schemes_hold_energy() {
    for name in SYMPLECTIC {
        let (worst, _) = relative_energy_drift(name, 2000);
        assert!(worst < 0.05, "{name} drifted by {:.3}%", worst * 100.0);
    }
}

#[test]
fn test_euler_gains_energy() {
    let (_, ratio) = relative_energy_drift("semi_implicit_euler", 1000);
    assert!(ratio > 2.0, "energy ratio after 1000 steps: {ratio}");
}

#[test]
fn test_reset_replays_identically() {
    for name in SCHEMES {
        let (initial, params) = hanging_chain(10);
        let mut simulation = simulation(name, initial, &params);

        let mut first_run = Vec::new();
        for _ in 0..25 {
            simulation.step(&params).unwrap();
            first_run.push(simulation.current()[5].position);
        }

        simulation.reset(&params);
        for expected in first_run {
            simulation.step(&params).unwrap();
            assert_eq!(simulation.current()[5].position, expected, "{name} replay diverged");
        }
    }
}
