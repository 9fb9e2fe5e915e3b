//! Registry pattern for selecting schemes by name
//!
//! Each scheme describes itself (canonical name, aliases, order), so the
//! registry only has to index boxed instances under every name they answer
//! to. All schemes are stateless, so handing out a scheme is a `clone_box`.
//!
//! The registry is generic over the scheme trait object; [`ChainRegistry`]
//! and [`NBodyRegistry`] are the two instantiations the crate uses.

use super::chain::{Leapfrog, SemiImplicitEuler, StaggeredVerlet};
use super::nbody::{ForwardEuler, Heun, Midpoint, RungeKuttaFourthOrder};
use super::{ChainIntegrator, Integrator, NBodyIntegrator, chain, nbody};
use crate::physics::math::Real;
use std::collections::{BTreeSet, HashMap};

/// Name-indexed collection of boxed schemes
pub struct IntegratorRegistry<I: ?Sized> {
    /// Canonical names and aliases both map to an instance
    integrators: HashMap<String, Box<I>>,
}

pub type ChainRegistry<S> = IntegratorRegistry<dyn ChainIntegrator<S>>;
pub type NBodyRegistry<S> = IntegratorRegistry<dyn NBodyIntegrator<S>>;

impl<I> IntegratorRegistry<I>
where
    I: ?Sized + Integrator,
    Box<I>: Clone,
{
    /// Create an empty registry without any pre-registered schemes.
    pub fn new() -> Self {
        Self {
            integrators: HashMap::new(),
        }
    }

    /// Register a single scheme.
    ///
    /// Returns self for method chaining.
    pub fn with_integrator(mut self, integrator: Box<I>) -> Self {
        self.register_integrator(integrator);
        self
    }

    pub fn register_integrator(&mut self, integrator: Box<I>) {
        for alias in integrator.aliases() {
            self.integrators
                .insert((*alias).to_string(), integrator.clone());
        }
        self.integrators
            .insert(integrator.name().to_string(), integrator);
    }

    pub fn create(&self, name: &str) -> Result<Box<I>, String> {
        self.integrators.get(name).cloned().ok_or_else(|| {
            let alias_names: Vec<String> = self
                .list_aliases()
                .into_iter()
                .map(|(alias, _)| alias)
                .collect();
            format!(
                "Unknown integrator: '{}'. Available integrators: {}. Aliases: {}",
                name,
                self.list_available().join(", "),
                alias_names.join(", ")
            )
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.integrators.contains_key(name)
    }

    /// Canonical names, sorted
    pub fn list_available(&self) -> Vec<String> {
        self.integrators
            .values()
            .map(|integrator| integrator.name().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// `(alias, canonical name)` pairs, sorted by alias
    pub fn list_aliases(&self) -> Vec<(String, String)> {
        let mut aliases: Vec<(String, String)> = self
            .integrators
            .iter()
            .filter(|(key, integrator)| key.as_str() != integrator.name())
            .map(|(key, integrator)| (key.clone(), integrator.name().to_string()))
            .collect();

        aliases.sort();
        aliases
    }
}

impl<S: Real> IntegratorRegistry<dyn ChainIntegrator<S>> {
    /// Register the four chain schemes.
    pub fn with_standard_integrators(self) -> Self {
        self.with_integrator(Box::new(SemiImplicitEuler))
            .with_integrator(Box::new(Leapfrog))
            .with_integrator(Box::new(chain::VelocityVerlet))
            .with_integrator(Box::new(StaggeredVerlet))
    }
}

impl<S: Real> IntegratorRegistry<dyn NBodyIntegrator<S>> {
    /// Register the six N-body schemes.
    pub fn with_standard_integrators(self) -> Self {
        self.with_integrator(Box::new(ForwardEuler))
            .with_integrator(Box::new(nbody::VelocityVerlet::PLANAR))
            .with_integrator(Box::new(nbody::VelocityVerlet::INVERSE_SQUARE))
            .with_integrator(Box::new(Midpoint))
            .with_integrator(Box::new(Heun))
            .with_integrator(Box::new(RungeKuttaFourthOrder))
    }
}

impl<S: Real> Default for IntegratorRegistry<dyn ChainIntegrator<S>> {
    fn default() -> Self {
        Self::new().with_standard_integrators()
    }
}

impl<S: Real> Default for IntegratorRegistry<dyn NBodyIntegrator<S>> {
    fn default() -> Self {
        Self::new().with_standard_integrators()
    }
}
