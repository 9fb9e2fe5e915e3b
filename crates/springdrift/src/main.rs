use bevy::app::ScheduleRunnerPlugin;
use bevy::log::{Level, LogPlugin};
use clap::Parser;
use springdrift::SimulationPlugin;
use springdrift::cli::{self, Args};
use springdrift::prelude::*;
use std::time::Duration;

fn main() -> AppExit {
    let args = Args::parse();

    if args.list_integrators {
        cli::handle_list_integrators();
        return AppExit::Success;
    }

    let config = match cli::load_and_apply_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return AppExit::error();
        }
    };

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    App::new()
        .add_plugins((
            // Step as fast as the kernels allow
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::ZERO)),
            LogPlugin {
                level,
                ..default()
            },
            SimulationPlugin::with_config(config),
        ))
        .run()
}
