//! Event definitions shared between the app and its plugins

use bevy::prelude::*;

/// Requests applied to the running simulation between steps
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub enum SimulationCommand {
    /// Restore the initial state and zero the step counter
    Restart,
    /// Continue from the current state under another scheme
    SetIntegrator(String),
    TogglePause,
    Quit,
}
