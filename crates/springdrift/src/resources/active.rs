//! The running system, erased over family and precision

use crate::config::{ChainConfig, NBodyConfig, Precision, SimulationConfig, SystemKind};
use crate::physics::integrators::{ChainRegistry, NBodyRegistry};
use crate::physics::math::{Real, SimVector};
use crate::physics::params::{ChainParams, NBodyParams};
use crate::physics::scenario;
use crate::physics::simulation::{ChainSimulation, NBodySimulation, SimulationError};
use bevy::prelude::*;
use rand::Rng;
use std::fmt;

/// Snapshot of the conserved quantities at one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report {
    pub step: u64,
    pub kinetic: f64,
    pub potential: f64,
    /// Magnitude of the total momentum, N-body only
    pub momentum: Option<f64>,
}

impl Report {
    pub fn total(&self) -> f64 {
        self.kinetic + self.potential
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {}: kinetic {:.6e}, potential {:.6e}, total {:.6e}",
            self.step,
            self.kinetic,
            self.potential,
            self.total()
        )?;
        if let Some(momentum) = self.momentum {
            write!(f, ", |p| {momentum:.3e}")?;
        }
        Ok(())
    }
}

/// Operations the app drives without knowing the family or precision
pub trait SimulationRun: Send + Sync {
    fn system(&self) -> SystemKind;

    fn step(&mut self) -> Result<(), SimulationError>;

    /// Restore the initial snapshot.
    fn reset(&mut self);

    /// Swap in the scheme registered under `name`.
    fn set_integrator(&mut self, name: &str) -> Result<(), SimulationError>;

    fn integrator_name(&self) -> &'static str;

    fn step_count(&self) -> u64;

    fn particle_count(&self) -> usize;

    fn report(&self) -> Report;
}

pub struct ChainRun<S: Real> {
    pub simulation: ChainSimulation<S>,
    pub params: ChainParams<S>,
}

impl<S: Real> ChainRun<S> {
    pub fn from_config(config: &ChainConfig) -> Result<Self, SimulationError> {
        let params = config.params::<S>();
        let (start, end) = config.endpoints::<S>();
        let initial = scenario::straight_chain(config.particle_count, start, end);
        let integrator = ChainRegistry::<S>::default()
            .create(&config.integrator)
            .map_err(SimulationError::UnknownIntegrator)?;

        Ok(Self {
            simulation: ChainSimulation::new(initial, integrator, &params)?,
            params,
        })
    }
}

impl<S: Real> SimulationRun for ChainRun<S> {
    fn system(&self) -> SystemKind {
        SystemKind::Chain
    }

    fn step(&mut self) -> Result<(), SimulationError> {
        self.simulation.step(&self.params)
    }

    fn reset(&mut self) {
        self.simulation.reset(&self.params);
    }

    fn set_integrator(&mut self, name: &str) -> Result<(), SimulationError> {
        let integrator = ChainRegistry::<S>::default()
            .create(name)
            .map_err(SimulationError::UnknownIntegrator)?;
        self.simulation.set_integrator(integrator, &self.params);
        Ok(())
    }

    fn integrator_name(&self) -> &'static str {
        self.simulation.integrator_name()
    }

    fn step_count(&self) -> u64 {
        self.simulation.step_count()
    }

    fn particle_count(&self) -> usize {
        self.simulation.particle_count()
    }

    fn report(&self) -> Report {
        let energy = self.simulation.energy(&self.params);
        Report {
            step: self.step_count(),
            kinetic: energy.kinetic.to_f64(),
            potential: (energy.spring + energy.gravitational).to_f64(),
            momentum: None,
        }
    }
}

pub struct NBodyRun<S: Real> {
    pub simulation: NBodySimulation<S>,
    pub params: NBodyParams<S>,
}

impl<S: Real> NBodyRun<S> {
    pub fn from_config<R: Rng + ?Sized>(config: &NBodyConfig, rng: &mut R) -> Result<Self, SimulationError> {
        let params = config.params::<S>();
        let mut initial = scenario::random_disc::<S, R>(config.particle_count, &config.disc_settings(), rng);
        if config.remove_net_momentum {
            scenario::remove_net_momentum(&mut initial);
        }
        let integrator = NBodyRegistry::<S>::default()
            .create(&config.integrator)
            .map_err(SimulationError::UnknownIntegrator)?;

        Ok(Self {
            simulation: NBodySimulation::new(initial, integrator, &params)?,
            params,
        })
    }
}

impl<S: Real> SimulationRun for NBodyRun<S> {
    fn system(&self) -> SystemKind {
        SystemKind::NBody
    }

    fn step(&mut self) -> Result<(), SimulationError> {
        self.simulation.step(&self.params)
    }

    fn reset(&mut self) {
        self.simulation.reset(&self.params);
    }

    fn set_integrator(&mut self, name: &str) -> Result<(), SimulationError> {
        let integrator = NBodyRegistry::<S>::default()
            .create(name)
            .map_err(SimulationError::UnknownIntegrator)?;
        self.simulation.set_integrator(integrator, &self.params);
        Ok(())
    }

    fn integrator_name(&self) -> &'static str {
        self.simulation.integrator_name()
    }

    fn step_count(&self) -> u64 {
        self.simulation.step_count()
    }

    fn particle_count(&self) -> usize {
        self.simulation.particle_count()
    }

    fn report(&self) -> Report {
        Report {
            step: self.step_count(),
            kinetic: self.simulation.kinetic_energy().to_f64(),
            potential: self.simulation.potential_energy(&self.params).to_f64(),
            momentum: Some(self.simulation.momentum().length().to_f64()),
        }
    }
}

/// The simulation the app is currently advancing
#[derive(Resource, Deref, DerefMut)]
pub struct ActiveSimulation(pub Box<dyn SimulationRun>);

impl ActiveSimulation {
    /// Build the system selected by `config.run`.
    pub fn from_config<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Result<Self, SimulationError> {
        let run: Box<dyn SimulationRun> = match (config.run.system, config.run.resolved_precision()) {
            (SystemKind::Chain, Precision::F32) => Box::new(ChainRun::<f32>::from_config(&config.chain)?),
            (SystemKind::Chain, Precision::F64) => Box::new(ChainRun::<f64>::from_config(&config.chain)?),
            (SystemKind::NBody, Precision::F32) => {
                Box::new(NBodyRun::<f32>::from_config(&config.nbody, rng)?)
            }
            (SystemKind::NBody, Precision::F64) => {
                Box::new(NBodyRun::<f64>::from_config(&config.nbody, rng)?)
            }
        };
        Ok(Self(run))
    }
}
