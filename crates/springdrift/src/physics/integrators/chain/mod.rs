//! Spring chain schemes

pub mod leapfrog;
pub mod semi_implicit_euler;
pub mod staggered_verlet;
pub mod velocity_verlet;

pub use leapfrog::Leapfrog;
pub use semi_implicit_euler::SemiImplicitEuler;
pub use staggered_verlet::StaggeredVerlet;
pub use velocity_verlet::VelocityVerlet;
