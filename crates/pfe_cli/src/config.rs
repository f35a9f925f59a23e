//! CLI configuration management
//!
//! Handles loading configuration from TOML files, environment variables and
//! command-line flags.

use pfe_core::types::{AssetModel, PortfolioSpec};
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Environment variable overriding the log level.
pub const ENV_LOG_LEVEL: &str = "PFE_LOG_LEVEL";
/// Environment variable overriding the seed.
pub const ENV_SEED: &str = "PFE_SEED";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid seed: {0}. Must be a non-negative integer")]
    InvalidSeed(String),

    #[error("Configuration file error: {0}")]
    FileError(String),
}

/// Log levels supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

/// Market model of one asset.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AssetConfig {
    pub s0: f64,
    pub mu: f64,
    pub sigma: f64,
}

/// `[portfolio]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    pub w1: f64,
    pub w2: f64,
    pub strike: f64,
    /// Shared model parameters (asset 1, and asset 2 unless overridden).
    pub s0: f64,
    pub mu: f64,
    pub sigma: f64,
    /// Separate model for asset 2.
    pub asset2: Option<AssetConfig>,
    pub tau: f64,
    pub alpha: f64,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            w1: 0.5,
            w2: 0.5,
            strike: 100.0,
            s0: 100.0,
            mu: 0.05,
            sigma: 0.2,
            asset2: None,
            tau: 1.0,
            alpha: 0.95,
        }
    }
}

impl PortfolioConfig {
    /// Builds the immutable spec handed to the estimators.
    ///
    /// Values are not validated here; the estimators reject invalid specs.
    pub fn to_spec(&self) -> PortfolioSpec {
        let asset1 = AssetModel::new(self.s0, self.mu, self.sigma);
        let spec = PortfolioSpec::basket(self.w1, self.w2, self.strike, asset1, self.tau, self.alpha);
        match self.asset2 {
            Some(a) => spec.with_assets(asset1, AssetModel::new(a.s0, a.mu, a.sigma)),
            None => spec,
        }
    }
}

/// `[classical]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClassicalConfig {
    pub num_samples: usize,
    pub antithetic: bool,
}

impl Default for ClassicalConfig {
    fn default() -> Self {
        Self {
            num_samples: 10_000,
            antithetic: true,
        }
    }
}

/// `[quantum]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct QuantumConfig {
    pub num_qubits: u32,
    pub ae_iterations: u32,
}

impl Default for QuantumConfig {
    fn default() -> Self {
        Self {
            num_qubits: 5,
            ae_iterations: 6,
        }
    }
}

/// `[benchmark]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    pub sample_sizes: Vec<usize>,
    pub reference_samples: usize,
    pub parallel: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            sample_sizes: vec![1_000, 3_000, 10_000, 30_000, 100_000],
            reference_samples: 1_000_000,
            parallel: false,
        }
    }
}

/// `[credit]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CreditConfig {
    pub hazard_rate: f64,
    pub lgd: f64,
}

impl Default for CreditConfig {
    fn default() -> Self {
        Self {
            hazard_rate: 0.02,
            lgd: 0.6,
        }
    }
}

/// `[profile]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub time_grid: Vec<f64>,
    pub num_samples: usize,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            time_grid: vec![0.0, 0.25, 0.5, 0.75, 1.0],
            num_samples: 10_000,
        }
    }
}

/// Full CLI configuration
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Master seed; chosen at random and reported when unset.
    pub seed: Option<u64>,
    pub portfolio: PortfolioConfig,
    pub classical: ClassicalConfig,
    pub quantum: QuantumConfig,
    pub benchmark: BenchmarkConfig,
    pub credit: CreditConfig,
    pub profile: ProfileConfig,
}

impl CliConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::FileError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = LogLevel::from_str(&level)?;
        }
        if let Some(seed) = lookup(ENV_SEED) {
            self.seed = Some(
                seed.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidSeed(seed.clone()))?,
            );
        }
        Ok(())
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(level) = &cli.log_level {
            self.log_level = LogLevel::from_str(level)?;
        }
        if let Some(seed) = cli.seed {
            self.seed = Some(seed);
        }

        let p = &mut self.portfolio;
        let overrides = &cli.portfolio;
        for (target, value) in [
            (&mut p.w1, overrides.w1),
            (&mut p.w2, overrides.w2),
            (&mut p.strike, overrides.strike),
            (&mut p.s0, overrides.s0),
            (&mut p.mu, overrides.mu),
            (&mut p.sigma, overrides.sigma),
            (&mut p.tau, overrides.tau),
            (&mut p.alpha, overrides.alpha),
        ] {
            if let Some(v) = value {
                *target = v;
            }
        }

        if let Some(n) = cli.num_samples {
            self.classical.num_samples = n;
            self.profile.num_samples = n;
        }
        if cli.no_antithetic {
            self.classical.antithetic = false;
        }
        if let Some(n) = cli.num_qubits {
            self.quantum.num_qubits = n;
        }
        if let Some(n) = cli.ae_iterations {
            self.quantum.ae_iterations = n;
        }
        if let Some(sizes) = &cli.sample_sizes {
            self.benchmark.sample_sizes = sizes.clone();
        }
        if let Some(n) = cli.reference_samples {
            self.benchmark.reference_samples = n;
        }
        if cli.parallel {
            self.benchmark.parallel = true;
        }
        if let Some(grid) = &cli.time_grid {
            self.profile.time_grid = grid.clone();
        }
        if let Some(h) = cli.hazard_rate {
            self.credit.hazard_rate = h;
        }
        if let Some(lgd) = cli.lgd {
            self.credit.lgd = lgd;
        }
        Ok(())
    }
}

/// Portfolio flag overrides
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortfolioOverrides {
    pub w1: Option<f64>,
    pub w2: Option<f64>,
    pub strike: Option<f64>,
    pub s0: Option<f64>,
    pub mu: Option<f64>,
    pub sigma: Option<f64>,
    pub tau: Option<f64>,
    pub alpha: Option<f64>,
}

/// Flag values collected from the command line
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub seed: Option<u64>,
    pub portfolio: PortfolioOverrides,
    pub num_samples: Option<usize>,
    pub no_antithetic: bool,
    pub num_qubits: Option<u32>,
    pub ae_iterations: Option<u32>,
    pub sample_sizes: Option<Vec<usize>>,
    pub reference_samples: Option<usize>,
    pub parallel: bool,
    pub time_grid: Option<Vec<f64>>,
    pub hazard_rate: Option<f64>,
    pub lgd: Option<f64>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<CliConfig, ConfigError> {
    build_config_with(cli, |key| std::env::var(key).ok())
}

fn build_config_with<F>(cli: &CliArgs, lookup: F) -> Result<CliConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &cli.config_file {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };
    config.apply_env_with(lookup)?;
    config.merge_with_cli(cli)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.seed, None);
        assert_eq!(config.portfolio.to_spec(), PortfolioSpec::default());
        assert_eq!(config.classical.num_samples, 10_000);
        assert!(config.classical.antithetic);
        assert_eq!(config.quantum.num_qubits, 5);
        assert_eq!(config.quantum.ae_iterations, 6);
        assert_eq!(config.benchmark.reference_samples, 1_000_000);
        assert!(!config.benchmark.parallel);
        assert_eq!(config.benchmark.sample_sizes.len(), 5);
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("WARN").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);

        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(format!("{}", LogLevel::Trace), "trace");
        assert_eq!(format!("{}", LogLevel::Error), "error");
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_str = r#"
            log_level = "debug"
            seed = 7

            [portfolio]
            w1 = 0.3
            w2 = 0.7
            strike = 95.0
            alpha = 0.99

            [portfolio.asset2]
            s0 = 90.0
            mu = 0.0
            sigma = 0.3

            [quantum]
            num_qubits = 8

            [benchmark]
            sample_sizes = [100, 1000]
            parallel = true
        "#;

        let config: CliConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.portfolio.w1, 0.3);
        assert_eq!(config.portfolio.sigma, 0.2);
        assert_eq!(config.quantum.num_qubits, 8);
        assert_eq!(config.quantum.ae_iterations, 6);
        assert_eq!(config.benchmark.sample_sizes, vec![100, 1000]);
        assert!(config.benchmark.parallel);

        let spec = config.portfolio.to_spec();
        assert_eq!(spec.assets[0], AssetModel::new(100.0, 0.05, 0.2));
        assert_eq!(spec.assets[1], AssetModel::new(90.0, 0.0, 0.3));
        assert_eq!(spec.alpha, 0.99);
    }

    #[test]
    fn test_partial_toml_deserialization() {
        let config: CliConfig = toml::from_str("[classical]\nnum_samples = 500\n").unwrap();
        assert_eq!(config.classical.num_samples, 500);
        assert!(config.classical.antithetic);
        assert_eq!(config.portfolio, PortfolioConfig::default());
    }

    #[test]
    fn test_invalid_log_level_in_toml() {
        assert!(toml::from_str::<CliConfig>("log_level = \"loud\"").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = CliConfig::default();
        config
            .apply_env_with(env(&[(ENV_LOG_LEVEL, "info"), (ENV_SEED, " 123 ")]))
            .unwrap();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.seed, Some(123));

        let err = config.apply_env_with(env(&[(ENV_SEED, "abc")])).unwrap_err();
        assert!(err.to_string().contains("Invalid seed"));
    }

    #[test]
    fn test_cli_args_merge() {
        let mut config = CliConfig::default();
        let cli = CliArgs {
            log_level: Some("debug".to_string()),
            seed: Some(9),
            portfolio: PortfolioOverrides {
                sigma: Some(0.3),
                alpha: Some(0.9),
                ..Default::default()
            },
            num_samples: Some(2_000),
            no_antithetic: true,
            sample_sizes: Some(vec![10, 20]),
            parallel: true,
            lgd: Some(0.4),
            ..Default::default()
        };

        config.merge_with_cli(&cli).unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.portfolio.sigma, 0.3);
        assert_eq!(config.portfolio.alpha, 0.9);
        assert_eq!(config.portfolio.w1, 0.5);
        assert_eq!(config.classical.num_samples, 2_000);
        assert_eq!(config.profile.num_samples, 2_000);
        assert!(!config.classical.antithetic);
        assert_eq!(config.benchmark.sample_sizes, vec![10, 20]);
        assert!(config.benchmark.parallel);
        assert_eq!(config.credit.lgd, 0.4);
    }

    #[test]
    fn test_priority_cli_over_env() {
        let cli = CliArgs {
            seed: Some(1),
            ..Default::default()
        };
        let config = build_config_with(&cli, env(&[(ENV_SEED, "2"), (ENV_LOG_LEVEL, "error")])).unwrap();
        assert_eq!(config.seed, Some(1));
        assert_eq!(config.log_level, LogLevel::Error);
    }

    #[test]
    fn test_missing_config_file() {
        let cli = CliArgs {
            config_file: Some(PathBuf::from("/nonexistent/pfe.toml")),
            ..Default::default()
        };
        let err = build_config_with(&cli, env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::FileError(_)));
    }
}
