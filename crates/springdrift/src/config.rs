use crate::physics::integrators::{ChainRegistry, NBodyRegistry};
use crate::physics::math::{Real, SimVector, Vector};
use crate::physics::params::{ChainParams, NBodyParams};
use crate::physics::scenario::DiscSettings;
use bevy::prelude::*;
use clap::ValueEnum;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use springdrift_macros::ConfigDefaults;
use std::fmt;
use std::path::PathBuf;

/// Which particle family a run simulates
#[derive(Serialize, Deserialize, ValueEnum, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SystemKind {
    Chain,
    #[value(name = "nbody")]
    #[serde(rename = "nbody")]
    NBody,
}

/// Floating-point precision the kernels run in
#[derive(Serialize, Deserialize, ValueEnum, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    F32,
    F64,
}

impl SystemKind {
    /// Precision the system runs in unless configured otherwise: the chain
    /// in single precision, N-body gravity in double.
    pub fn native_precision(self) -> Precision {
        match self {
            SystemKind::Chain => Precision::F32,
            SystemKind::NBody => Precision::F64,
        }
    }
}

impl RunConfig {
    pub fn resolved_precision(&self) -> Precision {
        self.precision.unwrap_or(self.system.native_precision())
    }
}

#[derive(Resource, ConfigDefaults, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    #[default(ChainConfig::default())]
    pub chain: ChainConfig,

    #[default(NBodyConfig::default())]
    pub nbody: NBodyConfig,

    #[default(RunConfig::default())]
    pub run: RunConfig,
}

#[derive(ConfigDefaults, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ChainConfig {
    #[default(20)]
    #[bound(min = 2)]
    pub particle_count: usize,

    /// Distance between the two anchored ends, laid out along x
    #[default(1.8)]
    #[bound(positive)]
    pub total_length: f64,

    #[default(250.0)]
    #[bound(min = 0.0)]
    pub spring_constant: f64,

    #[default(30.0)]
    #[bound(min = 0.0)]
    pub damping: f64,

    #[default(1.0)]
    #[bound(positive)]
    pub mass: f64,

    #[default(1.0 / 60.0)]
    #[bound(positive)]
    pub dt: f64,

    /// Uniform gravity; `(0, -9.8 / particle_count, 0)` when absent
    #[default(None)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gravity: Option<[f64; 3]>,

    #[default("velocity_verlet")]
    pub integrator: String,
}

#[derive(ConfigDefaults, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct NBodyConfig {
    #[default(500)]
    #[bound(positive)]
    pub particle_count: usize,

    #[default(1.0 / 300.0)]
    #[bound(positive)]
    pub dt: f64,

    #[default(0.0002)]
    #[bound(min = 0.0)]
    pub gravitational_constant: f64,

    #[default(0.05)]
    #[bound(min = 0.0)]
    pub r_threshold: f64,

    #[default(5000.0)]
    #[bound(positive)]
    pub central_mass: f64,

    #[default(0.8)]
    #[bound(positive)]
    pub max_radius: f64,

    #[default(5)]
    #[bound(positive)]
    pub max_mass: u32,

    #[default(0.3)]
    #[bound(min = 0.0)]
    pub min_speed: f64,

    #[default(1.2)]
    #[bound(positive)]
    pub max_speed: f64,

    /// Subtract the mean velocity so the barycenter stays put
    #[default(true)]
    pub remove_net_momentum: bool,

    #[default("velocity_verlet")]
    pub integrator: String,
}

#[derive(ConfigDefaults, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    #[default(SystemKind::Chain)]
    pub system: SystemKind,

    /// Kernel precision; each system's native precision when absent
    #[default(None)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<Precision>,

    /// Steps to run before exiting; zero runs until quit
    #[default(600)]
    pub steps: u64,

    /// Steps between diagnostic reports
    #[default(60)]
    #[bound(positive)]
    pub report_interval: u64,

    #[default(None)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// A configuration that loaded but cannot drive a simulation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub violations: Vec<String>,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid configuration: {}", self.violations.join("; "))
    }
}

impl std::error::Error for ConfigError {}

impl ChainConfig {
    pub fn params<S: Real>(&self) -> ChainParams<S> {
        let gravity = match self.gravity {
            Some([x, y, z]) => Vector::<S>::new(S::from_f64(x), S::from_f64(y), S::from_f64(z)),
            None => ChainParams::<S>::scaled_gravity(self.particle_count),
        };

        ChainParams::new(
            self.particle_count,
            S::from_f64(self.total_length),
            S::from_f64(self.dt),
            S::from_f64(self.spring_constant),
            S::from_f64(self.damping),
            S::from_f64(self.mass),
            gravity,
        )
    }

    /// Anchor positions, centered on the origin
    pub fn endpoints<S: Real>(&self) -> (Vector<S>, Vector<S>) {
        let half = S::from_f64(self.total_length * 0.5);
        (
            Vector::<S>::new(-half, S::ZERO, S::ZERO),
            Vector::<S>::new(half, S::ZERO, S::ZERO),
        )
    }
}

impl NBodyConfig {
    pub fn params<S: Real>(&self) -> NBodyParams<S> {
        NBodyParams::new(
            self.particle_count,
            S::from_f64(self.dt),
            S::from_f64(self.gravitational_constant),
            S::from_f64(self.r_threshold),
        )
    }

    pub fn disc_settings(&self) -> DiscSettings {
        DiscSettings {
            central_mass: self.central_mass,
            max_radius: self.max_radius,
            max_mass: self.max_mass,
            min_speed: self.min_speed,
            max_speed: self.max_speed,
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a file, falling back to defaults if the file doesn't exist
    pub fn load_or_default(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Failed to parse config file {}: {}. Using defaults.", path, e);
                    Self::default()
                }
            },
            Err(_) => {
                info!("Config file {} not found. Using defaults.", path);
                Self::default()
            }
        }
    }

    /// Location of the per-user configuration file, if the platform has one
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "springdrift").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Layer the per-user configuration file and `SPRINGDRIFT__SECTION__KEY`
    /// environment variables over the defaults.
    pub fn load_from_user_config() -> Self {
        match Self::layered(Self::user_config_path()) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load user configuration: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    fn layered(path: Option<PathBuf>) -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            debug!("Looking for user configuration at {}", path.display());
            builder = builder.add_source(::config::File::from(path).required(false));
        }

        builder
            .add_source(
                ::config::Environment::with_prefix("SPRINGDRIFT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check every declared bound plus the constraints spanning fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut violations: Vec<String> = Vec::new();
        violations.extend(prefixed("chain", self.chain.bound_violations()));
        violations.extend(prefixed("nbody", self.nbody.bound_violations()));
        violations.extend(prefixed("run", self.run.bound_violations()));

        if self.nbody.max_speed <= self.nbody.min_speed {
            violations.push(format!(
                "nbody.max_speed must exceed nbody.min_speed ({} <= {})",
                self.nbody.max_speed, self.nbody.min_speed
            ));
        }

        if let Err(e) = ChainRegistry::<f64>::default().create(&self.chain.integrator) {
            violations.push(format!("chain.integrator: {e}"));
        }
        if let Err(e) = NBodyRegistry::<f64>::default().create(&self.nbody.integrator) {
            violations.push(format!("nbody.integrator: {e}"));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ConfigError { violations })
        }
    }
}

fn prefixed(section: &str, violations: Vec<String>) -> impl Iterator<Item = String> + '_ {
    violations
        .into_iter()
        .map(move |violation| format!("{section}.{violation}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::{DVec3, Vec3};

    #[test]
    fn test_defaults_are_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.chain.particle_count, 20);
        assert_eq!(config.nbody.particle_count, 500);
        assert_eq!(config.run.system, SystemKind::Chain);
    }

    #[test]
    fn test_chain_params_use_scaled_gravity() {
        let config = ChainConfig::default();
        let params = config.params::<f32>();
        assert!((params.gravity.y + 0.49).abs() < 1e-6);
        assert!((params.natural_length - 1.8 / 19.0).abs() < 1e-6);

        let explicit = ChainConfig {
            gravity: Some([0.0, -1.0, 0.0]),
            ..config
        };
        assert_eq!(explicit.params::<f64>().gravity, DVec3::new(0.0, -1.0, 0.0));
        assert_eq!(
            explicit.endpoints::<f32>(),
            (Vec3::new(-0.9, 0.0, 0.0), Vec3::new(0.9, 0.0, 0.0))
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SimulationConfig = toml::from_str(
            r#"
            [chain]
            particle_count = 8
            integrator = "leapfrog"

            [run]
            system = "nbody"
            precision = "f64"
            "#,
        )
        .unwrap();

        assert_eq!(config.chain.particle_count, 8);
        assert_eq!(config.chain.integrator, "leapfrog");
        assert_eq!(config.chain.spring_constant, 250.0);
        assert_eq!(config.nbody, NBodyConfig::default());
        assert_eq!(config.run.system, SystemKind::NBody);
        assert_eq!(config.run.precision, Some(Precision::F64));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = SimulationConfig::default();
        config.run.seed = Some(42);
        config.chain.gravity = Some([0.0, -9.8, 0.0]);

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: SimulationConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validate_collects_every_violation() {
        let mut config = SimulationConfig::default();
        config.chain.particle_count = 1;
        config.nbody.dt = 0.0;
        config.nbody.min_speed = 2.0;
        config.nbody.integrator = "leapfrog".to_string();
        config.run.report_interval = 0;

        let error = config.validate().unwrap_err();
        assert_eq!(error.violations.len(), 5);
        assert!(error.violations[0].starts_with("chain.particle_count"));
        assert!(error.violations[1].starts_with("nbody.dt"));
        assert!(error.violations[2].starts_with("run.report_interval"));
        assert!(error.violations[3].contains("max_speed"));
        assert!(error.violations[4].contains("Unknown integrator: 'leapfrog'"));
    }

    #[test]
    fn test_precision_follows_system_unless_set() {
        let mut run = RunConfig::default();
        assert_eq!(run.precision, None);
        assert_eq!(run.resolved_precision(), Precision::F32);

        run.system = SystemKind::NBody;
        assert_eq!(run.resolved_precision(), Precision::F64);

        run.precision = Some(Precision::F32);
        assert_eq!(run.resolved_precision(), Precision::F32);

        let parsed: SimulationConfig = toml::from_str("[run]\nsystem = \"nbody\"\n").unwrap();
        assert_eq!(parsed.run.resolved_precision(), Precision::F64);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = SimulationConfig::load_or_default("/nonexistent/springdrift.toml");
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("springdrift-config-{}.toml", std::process::id()));
        let path = path.to_string_lossy().into_owned();

        let mut config = SimulationConfig::default();
        config.nbody.particle_count = 64;
        config.save(&path).unwrap();

        let loaded = SimulationConfig::load_or_default(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_layered_reads_file_source() {
        let path = std::env::temp_dir().join(format!("springdrift-layered-{}.toml", std::process::id()));
        std::fs::write(&path, "[nbody]\nparticle_count = 12\nintegrator = \"rk4\"\n").unwrap();

        let config = SimulationConfig::layered(Some(path.clone())).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.nbody.particle_count, 12);
        assert_eq!(config.nbody.integrator, "rk4");
        assert_eq!(config.chain, ChainConfig::default());
    }
}
