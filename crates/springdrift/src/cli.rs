//! Command line interface for springdrift

use clap::Parser;
use std::fmt;

use crate::config::{Precision, SimulationConfig, SystemKind};
use crate::physics::integrators::{ChainRegistry, IntegratorRegistry, NBodyRegistry};

/// CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// Configuration file could not be loaded
    ConfigLoad(String),
    /// Invalid integrator name provided
    InvalidIntegrator(String),
    /// Configuration values out of range after overrides
    InvalidConfig(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::ConfigLoad(msg) => write!(f, "Failed to load configuration: {msg}"),
            CliError::InvalidIntegrator(msg) => write!(f, "Invalid integrator: {msg}"),
            CliError::InvalidConfig(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CliError {}

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")");

/// springdrift - headless spring chain and N-body integrator
#[derive(Parser, Debug)]
#[command(version, long_version = LONG_VERSION, about, long_about = None)]
pub struct Args {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Which system to simulate (overrides config file)
    #[arg(long, value_enum, value_name = "SYSTEM")]
    pub system: Option<SystemKind>,

    /// Steps to run before exiting, 0 to run until interrupted
    #[arg(long, value_name = "COUNT")]
    pub steps: Option<u64>,

    /// Integrator for the selected system (e.g., leapfrog, velocity_verlet, rk4)
    #[arg(short = 'i', long, value_name = "TYPE")]
    pub integrator: Option<String>,

    /// Random seed for the initial N-body disc
    #[arg(short = 's', long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Number of N-body bodies (overrides config file)
    #[arg(short = 'n', long, value_name = "COUNT")]
    pub bodies: Option<usize>,

    /// Number of chain particles (overrides config file)
    #[arg(long, value_name = "COUNT")]
    pub particles: Option<usize>,

    /// Floating-point precision of the kernels
    #[arg(long, value_enum, value_name = "PRECISION")]
    pub precision: Option<Precision>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// List available integrators and exit
    #[arg(long)]
    pub list_integrators: bool,
}

fn print_registry<I>(title: &str, registry: &IntegratorRegistry<I>)
where
    I: ?Sized + crate::physics::integrators::Integrator,
    Box<I>: Clone,
{
    println!("{title}:");
    for name in registry.list_available() {
        println!("  - {name}");
    }

    let aliases = registry.list_aliases();
    if !aliases.is_empty() {
        println!("  Aliases:");
        for (alias, target) in aliases {
            println!("    - {alias} -> {target}");
        }
    }
}

/// Handles the --list-integrators flag by printing both families' schemes
pub fn handle_list_integrators() {
    print_registry("Chain integrators", &ChainRegistry::<f64>::default());
    println!();
    print_registry("N-body integrators", &NBodyRegistry::<f64>::default());
}

/// Loads configuration from file or defaults, then applies command-line overrides
pub fn load_and_apply_config(args: &Args) -> Result<SimulationConfig, CliError> {
    let mut config = if let Some(config_path) = &args.config {
        if !std::path::Path::new(config_path).exists() {
            return Err(CliError::ConfigLoad(format!("{config_path} does not exist")));
        }
        println!("Loading configuration from: {config_path}");
        SimulationConfig::load_or_default(config_path)
    } else {
        SimulationConfig::load_from_user_config()
    };

    apply_overrides(args, &mut config)?;

    config
        .validate()
        .map_err(|e| CliError::InvalidConfig(e.to_string()))?;

    Ok(config)
}

fn apply_overrides(args: &Args, config: &mut SimulationConfig) -> Result<(), CliError> {
    if let Some(system) = args.system {
        println!("Simulating: {system:?}");
        config.run.system = system;
    }

    if let Some(steps) = args.steps {
        println!("Overriding step count to: {steps}");
        config.run.steps = steps;
    }

    if let Some(precision) = args.precision {
        println!("Using precision: {precision:?}");
        config.run.precision = Some(precision);
    }

    if let Some(body_count) = args.bodies {
        println!("Overriding body count to: {body_count}");
        config.nbody.particle_count = body_count;
    }

    if let Some(particle_count) = args.particles {
        println!("Overriding chain particle count to: {particle_count}");
        config.chain.particle_count = particle_count;
    }

    if let Some(integrator_type) = &args.integrator {
        // Validate against the registry of the system being run
        let known = match config.run.system {
            SystemKind::Chain => ChainRegistry::<f64>::default().create(integrator_type).map(drop),
            SystemKind::NBody => NBodyRegistry::<f64>::default().create(integrator_type).map(drop),
        };
        known.map_err(CliError::InvalidIntegrator)?;

        println!("Using integrator: {integrator_type}");
        match config.run.system {
            SystemKind::Chain => config.chain.integrator = integrator_type.clone(),
            SystemKind::NBody => config.nbody.integrator = integrator_type.clone(),
        }
    }

    if let Some(seed) = args.seed {
        println!("Using random seed: {seed}");
        config.run.seed = Some(seed);
    }

    Ok(())
}
