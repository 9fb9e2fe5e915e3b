//! Per-particle records stored in the state buffers

use crate::physics::math::{Real, SimVector, Vector};

/// One point mass of a spring chain
///
/// `mobility` is zero for an anchored particle and nonzero for a free one.
/// The staging fields are only meaningful to the schemes that use them:
/// `force` for velocity Verlet, `position_temp`/`velocity_temp` for the
/// staggered scheme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainParticle<S: Real> {
    pub position: Vector<S>,
    pub mobility: S,
    pub velocity: Vector<S>,
    pub force: Vector<S>,
    pub position_temp: Vector<S>,
    pub velocity_temp: Vector<S>,
}

impl<S: Real> ChainParticle<S> {
    pub fn new(position: Vector<S>, free: bool) -> Self {
        Self {
            position,
            mobility: if free { S::ONE } else { S::ZERO },
            velocity: Vector::<S>::ZERO,
            force: Vector::<S>::ZERO,
            position_temp: position,
            velocity_temp: Vector::<S>::ZERO,
        }
    }

    pub fn free(position: Vector<S>) -> Self {
        Self::new(position, true)
    }

    pub fn anchored(position: Vector<S>) -> Self {
        Self::new(position, false)
    }

    pub fn with_velocity(self, velocity: Vector<S>) -> Self {
        Self {
            velocity,
            velocity_temp: velocity,
            ..self
        }
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.mobility != S::ZERO
    }
}

/// One gravitating body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body<S: Real> {
    pub mass: S,
    pub position: Vector<S>,
    pub velocity: Vector<S>,
    /// Provisional full-step-ahead position
    pub position_temp: Vector<S>,
    /// Provisional (or accumulating) velocity
    pub velocity_temp: Vector<S>,
}

impl<S: Real> Body<S> {
    pub fn new(mass: S, position: Vector<S>, velocity: Vector<S>) -> Self {
        Self {
            mass,
            position,
            velocity,
            position_temp: position,
            velocity_temp: velocity,
        }
    }

    /// Copy the authoritative state into the staging fields.
    pub fn synced(self) -> Self {
        Self {
            position_temp: self.position,
            velocity_temp: self.velocity,
            ..self
        }
    }

    pub fn momentum(&self) -> Vector<S> {
        self.velocity * self.mass
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::DVec3;

    #[test]
    fn test_mobility_flag() {
        let anchored = ChainParticle::<f64>::anchored(DVec3::X);
        let free = ChainParticle::<f64>::free(DVec3::Y);
        assert!(!anchored.is_free());
        assert_eq!(anchored.mobility, 0.0);
        assert!(free.is_free());
        assert_eq!(free.position_temp, DVec3::Y);
    }

    #[test]
    fn test_body_synced() {
        let mut body = Body::<f64>::new(2.0, DVec3::X, DVec3::Y);
        body.position_temp = DVec3::ZERO;
        body.velocity_temp = DVec3::ZERO;
        let body = body.synced();
        assert_eq!(body.position_temp, DVec3::X);
        assert_eq!(body.velocity_temp, DVec3::Y);
        assert_eq!(body.momentum(), DVec3::new(0.0, 2.0, 0.0));
    }
}
