//! N-body gravitational schemes

pub mod forward_euler;
pub mod runge_kutta;
pub mod velocity_verlet;

pub use forward_euler::ForwardEuler;
pub use runge_kutta::{Heun, Midpoint, RungeKuttaFourthOrder, Tableau};
pub use velocity_verlet::VelocityVerlet;
