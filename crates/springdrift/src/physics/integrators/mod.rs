//! Time-stepping schemes for both particle families
//!
//! A scheme is a stateless value that knows how many buffers it needs, how to
//! derive its staging state from a plain snapshot (the bootstrap), and how to
//! sequence its kernel passes over a [`BufferSet`] for one physical step.

use crate::physics::buffers::{BufferSet, Buffering};
use crate::physics::forces::ForceLaw;
use crate::physics::math::Real;
use crate::physics::params::{ChainParams, NBodyParams};
use crate::physics::particles::{Body, ChainParticle};

pub mod chain;
pub mod nbody;
pub mod registry;

pub use registry::{ChainRegistry, IntegratorRegistry, NBodyRegistry};

/// Metadata shared by every scheme
pub trait Integrator: Send + Sync {
    /// Canonical name used for registry lookup and configuration
    fn name(&self) -> &'static str;

    /// Alternative names resolving to this scheme
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Convergence order of the global error
    fn order(&self) -> usize;

    fn buffering(&self) -> Buffering;
}

/// A scheme advancing a damped spring chain
pub trait ChainIntegrator<S: Real>: Integrator {
    /// Derive staging state from the snapshot held in every slot.
    ///
    /// Called once after allocation and again whenever the scheme is swapped
    /// in or the simulation is reset.
    fn bootstrap(
        &self,
        _buffers: &mut BufferSet<ChainParticle<S>>,
        _params: &ChainParams<S>,
    ) {
    }

    /// Advance one physical step, leaving the result in the front slot.
    fn step(&self, buffers: &mut BufferSet<ChainParticle<S>>, params: &ChainParams<S>);

    fn clone_box(&self) -> Box<dyn ChainIntegrator<S>>;
}

/// A scheme advancing an N-body system
pub trait NBodyIntegrator<S: Real>: Integrator {
    /// Pairwise force law this scheme integrates
    fn force_law(&self) -> ForceLaw;

    fn bootstrap(&self, buffers: &mut BufferSet<Body<S>>, params: &NBodyParams<S>);

    fn step(&self, buffers: &mut BufferSet<Body<S>>, params: &NBodyParams<S>);

    fn clone_box(&self) -> Box<dyn NBodyIntegrator<S>>;
}

impl<S: Real> Clone for Box<dyn ChainIntegrator<S>> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl<S: Real> Clone for Box<dyn NBodyIntegrator<S>> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
