pub mod boundary;
pub mod buffers;
pub mod diagnostics;
pub mod forces;
pub mod integrators;
pub mod math;
pub mod params;
pub mod particles;
pub mod scenario;
pub mod simulation;
