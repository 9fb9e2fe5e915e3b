//! Drivers owning the buffers of one running system
//!
//! A driver allocates the slots its scheme needs, runs the scheme's
//! bootstrap, and then advances one physical step per [`step`] call. Between
//! calls the only view it exposes is the front slot; the intermediate passes
//! of a step are never observable.
//!
//! [`step`]: ChainSimulation::step

use crate::physics::buffers::BufferSet;
use crate::physics::diagnostics::{self, ChainEnergy};
use crate::physics::forces::ForceLaw;
use crate::physics::integrators::{ChainIntegrator, NBodyIntegrator};
use crate::physics::math::{Real, SimVector, Vector};
use crate::physics::params::{ChainParams, NBodyParams};
use crate::physics::particles::{Body, ChainParticle};
use std::fmt;

/// Errors raised before any kernel runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// The system has fewer particles than its family requires
    TooFewParticles { required: usize, actual: usize },
    /// The parameter block describes a different particle count
    CountMismatch { expected: usize, actual: usize },
    /// A particle index outside the system
    IndexOutOfRange { index: usize, count: usize },
    /// A scheme name no registry entry answers to
    UnknownIntegrator(String),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::TooFewParticles { required, actual } => {
                write!(f, "need at least {required} particles, got {actual}")
            }
            SimulationError::CountMismatch { expected, actual } => write!(
                f,
                "parameter block is for {actual} particles but the system has {expected}"
            ),
            SimulationError::IndexOutOfRange { index, count } => {
                write!(f, "particle {index} is out of range for {count} particles")
            }
            SimulationError::UnknownIntegrator(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for SimulationError {}

fn check_count(expected: usize, actual: usize) -> Result<(), SimulationError> {
    if expected == actual {
        Ok(())
    } else {
        Err(SimulationError::CountMismatch { expected, actual })
    }
}

/// A damped spring chain advancing under one scheme
pub struct ChainSimulation<S: Real> {
    buffers: BufferSet<ChainParticle<S>>,
    integrator: Box<dyn ChainIntegrator<S>>,
    initial: Vec<ChainParticle<S>>,
    steps: u64,
}

impl<S: Real> ChainSimulation<S> {
    pub const MIN_PARTICLES: usize = 2;

    pub fn new(
        initial: Vec<ChainParticle<S>>,
        integrator: Box<dyn ChainIntegrator<S>>,
        params: &ChainParams<S>,
    ) -> Result<Self, SimulationError> {
        if initial.len() < Self::MIN_PARTICLES {
            return Err(SimulationError::TooFewParticles {
                required: Self::MIN_PARTICLES,
                actual: initial.len(),
            });
        }
        check_count(initial.len(), params.particle_count)?;

        let mut buffers = BufferSet::new(&initial, integrator.buffering());
        integrator.bootstrap(&mut buffers, params);

        Ok(Self {
            buffers,
            integrator,
            initial,
            steps: 0,
        })
    }

    /// Advance one physical step.
    pub fn step(&mut self, params: &ChainParams<S>) -> Result<(), SimulationError> {
        check_count(self.buffers.len(), params.particle_count)?;
        self.integrator.step(&mut self.buffers, params);
        self.steps += 1;
        Ok(())
    }

    /// Latest completed state
    pub fn current(&self) -> &[ChainParticle<S>] {
        self.buffers.current()
    }

    pub fn particle_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn step_count(&self) -> u64 {
        self.steps
    }

    pub fn integrator_name(&self) -> &'static str {
        self.integrator.name()
    }

    /// Swap schemes, continuing from the current state.
    pub fn set_integrator(&mut self, integrator: Box<dyn ChainIntegrator<S>>, params: &ChainParams<S>) {
        let state = self.buffers.current().to_vec();
        self.buffers = BufferSet::new(&state, integrator.buffering());
        integrator.bootstrap(&mut self.buffers, params);
        self.integrator = integrator;
    }

    /// Restore the initial snapshot.
    pub fn reset(&mut self, params: &ChainParams<S>) {
        self.buffers.refill(&self.initial);
        self.integrator.bootstrap(&mut self.buffers, params);
        self.steps = 0;
    }

    fn check_index(&self, index: usize) -> Result<(), SimulationError> {
        let count = self.buffers.len();
        if index < count {
            Ok(())
        } else {
            Err(SimulationError::IndexOutOfRange { index, count })
        }
    }

    /// Anchor particle `index` where it currently is.
    pub fn pin(&mut self, index: usize) -> Result<(), SimulationError> {
        self.set_mobility(index, false)
    }

    pub fn release(&mut self, index: usize) -> Result<(), SimulationError> {
        self.set_mobility(index, true)
    }

    /// Flip the mobility of particle `index`; returns whether it is now free.
    pub fn toggle_pin(&mut self, index: usize) -> Result<bool, SimulationError> {
        self.check_index(index)?;
        let free = !self.current()[index].is_free();
        self.set_mobility(index, free)?;
        Ok(free)
    }

    /// Either way the particle ends up at rest at its current position in
    /// every slot, so every scheme sees a consistent history for it.
    fn set_mobility(&mut self, index: usize, free: bool) -> Result<(), SimulationError> {
        self.check_index(index)?;
        let position = self.current()[index].position;
        let mobility = if free { S::ONE } else { S::ZERO };

        self.buffers.edit_all_slots(index, |particle| {
            particle.mobility = mobility;
            particle.position = position;
            particle.position_temp = position;
            particle.velocity = Vector::<S>::ZERO;
            particle.velocity_temp = Vector::<S>::ZERO;
        });
        Ok(())
    }

    /// Place particle `index` at `position`, at rest, in every slot.
    pub fn move_particle(&mut self, index: usize, position: Vector<S>) -> Result<(), SimulationError> {
        self.check_index(index)?;
        self.buffers.edit_all_slots(index, |particle| {
            particle.position = position;
            particle.position_temp = position;
            particle.velocity = Vector::<S>::ZERO;
            particle.velocity_temp = Vector::<S>::ZERO;
        });
        Ok(())
    }

    pub fn energy(&self, params: &ChainParams<S>) -> ChainEnergy<S> {
        diagnostics::chain_energy(self.current(), params)
    }
}

/// An N-body system advancing under one scheme
pub struct NBodySimulation<S: Real> {
    buffers: BufferSet<Body<S>>,
    integrator: Box<dyn NBodyIntegrator<S>>,
    initial: Vec<Body<S>>,
    steps: u64,
}

impl<S: Real> NBodySimulation<S> {
    pub const MIN_PARTICLES: usize = 1;

    pub fn new(
        initial: Vec<Body<S>>,
        integrator: Box<dyn NBodyIntegrator<S>>,
        params: &NBodyParams<S>,
    ) -> Result<Self, SimulationError> {
        if initial.len() < Self::MIN_PARTICLES {
            return Err(SimulationError::TooFewParticles {
                required: Self::MIN_PARTICLES,
                actual: initial.len(),
            });
        }
        check_count(initial.len(), params.particle_count)?;

        let mut buffers = BufferSet::new(&initial, integrator.buffering());
        integrator.bootstrap(&mut buffers, params);

        Ok(Self {
            buffers,
            integrator,
            initial,
            steps: 0,
        })
    }

    pub fn step(&mut self, params: &NBodyParams<S>) -> Result<(), SimulationError> {
        check_count(self.buffers.len(), params.particle_count)?;
        self.integrator.step(&mut self.buffers, params);
        self.steps += 1;
        Ok(())
    }

    pub fn current(&self) -> &[Body<S>] {
        self.buffers.current()
    }

    pub fn particle_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn step_count(&self) -> u64 {
        self.steps
    }

    pub fn integrator_name(&self) -> &'static str {
        self.integrator.name()
    }

    pub fn force_law(&self) -> ForceLaw {
        self.integrator.force_law()
    }

    /// Swap schemes, re-running the new scheme's bootstrap on the current
    /// state.
    pub fn set_integrator(&mut self, integrator: Box<dyn NBodyIntegrator<S>>, params: &NBodyParams<S>) {
        let state: Vec<Body<S>> = self.buffers.current().iter().map(|body| body.synced()).collect();
        self.buffers = BufferSet::new(&state, integrator.buffering());
        integrator.bootstrap(&mut self.buffers, params);
        self.integrator = integrator;
    }

    pub fn reset(&mut self, params: &NBodyParams<S>) {
        self.buffers.refill(&self.initial);
        self.integrator.bootstrap(&mut self.buffers, params);
        self.steps = 0;
    }

    pub fn momentum(&self) -> Vector<S> {
        diagnostics::total_momentum(self.current())
    }

    pub fn kinetic_energy(&self) -> S {
        diagnostics::kinetic_energy(self.current())
    }

    /// Potential energy under the current scheme's force law
    pub fn potential_energy(&self, params: &NBodyParams<S>) -> S {
        diagnostics::potential_energy(self.current(), params, self.force_law())
    }

    pub fn total_energy(&self, params: &NBodyParams<S>) -> S {
        self.kinetic_energy() + self.potential_energy(params)
    }

    /// Distance between bodies `a` and `b`
    pub fn separation(&self, a: usize, b: usize) -> Result<S, SimulationError> {
        let count = self.buffers.len();
        for index in [a, b] {
            if index >= count {
                return Err(SimulationError::IndexOutOfRange { index, count });
            }
        }
        let bodies = self.current();
        Ok((bodies[b].position - bodies[a].position).length())
    }
}
