use super::Paused;
use crate::prelude::*;

/// Build the configured system and make it the active simulation.
pub fn setup_simulation(
    mut commands: Commands,
    config: Res<SimulationConfig>,
    mut rng: ResMut<SharedRng>,
    mut exit: EventWriter<AppExit>,
) {
    match ActiveSimulation::from_config(&config, &mut **rng) {
        Ok(active) => {
            info!(
                "Simulating {:?} system of {} particles with {} ({:?})",
                active.system(),
                active.particle_count(),
                active.integrator_name(),
                config.run.resolved_precision()
            );
            commands.insert_resource(LatestReport(Some(active.report())));
            commands.insert_resource(active);
        }
        Err(e) => {
            error!("Failed to build simulation: {}", e);
            exit.write(AppExit::error());
        }
    }
}

pub fn handle_simulation_commands(
    mut commands_reader: EventReader<SimulationCommand>,
    active: Option<ResMut<ActiveSimulation>>,
    mut paused: ResMut<Paused>,
    mut exit: EventWriter<AppExit>,
) {
    let Some(mut active) = active else {
        commands_reader.clear();
        return;
    };

    for command in commands_reader.read() {
        match command {
            SimulationCommand::Restart => {
                active.reset();
                info!("Simulation restarted");
            }
            SimulationCommand::SetIntegrator(name) => match active.set_integrator(name) {
                Ok(()) => info!("Switched to {}", active.integrator_name()),
                Err(e) => warn!("Keeping {}: {}", active.integrator_name(), e),
            },
            SimulationCommand::TogglePause => {
                **paused = !**paused;
                debug!("Paused: {}", **paused);
            }
            SimulationCommand::Quit => {
                exit.write(AppExit::Success);
            }
        }
    }
}

/// Advance one physical step.
pub fn step_simulation(active: Option<ResMut<ActiveSimulation>>, mut exit: EventWriter<AppExit>) {
    let Some(mut active) = active else {
        return;
    };

    if let Err(e) = active.step() {
        error!("Step {} failed: {}", active.step_count() + 1, e);
        exit.write(AppExit::error());
    }
}

/// Log diagnostics every `report_interval` steps.
pub fn report_progress(
    active: Option<Res<ActiveSimulation>>,
    config: Res<SimulationConfig>,
    mut latest: ResMut<LatestReport>,
) {
    let Some(active) = active else {
        return;
    };

    let step = active.step_count();
    let already_reported = latest.is_some_and(|report| report.step == step);
    if step == 0 || step % config.run.report_interval.max(1) != 0 || already_reported {
        return;
    }

    let report = active.report();
    info!("{}", report);
    **latest = Some(report);
}

pub fn exit_after_step_budget(
    active: Option<Res<ActiveSimulation>>,
    config: Res<SimulationConfig>,
    mut exit: EventWriter<AppExit>,
) {
    let Some(active) = active else {
        return;
    };

    let budget = config.run.steps;
    if budget > 0 && active.step_count() >= budget {
        info!("Finished {} steps: {}", budget, active.report());
        exit.write(AppExit::Success);
    }
}
