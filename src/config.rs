use crate::profile::Conformance;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_VAR: &str = "PDFA_VALIDATE_CONFIG";

const CONFIG_NAMES: [&str; 4] = [
    "pdfa-validate.toml",
    "pdfa-validate.json",
    ".pdfa-validate.toml",
    ".pdfa-validate.json",
];

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Trait for abstracting environment variable access
pub trait EnvProvider {
    fn get(&self, key: &str) -> Option<String>;
}

/// System environment variable provider for production use
pub struct SystemEnvProvider;

impl EnvProvider for SystemEnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Environment variable error: {0}")]
    Environment(String),

    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub preflight: PreflightConfig,
    pub logging: LoggingConfig,
}

/// Settings passed to the validation engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Stop checking at the first violation
    pub stop_on_first_error: bool,
}

/// Settings for the key-gated preflight front-end
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PreflightConfig {
    /// Conformance level checked by `pdfa-preflight`, e.g. `2b`
    pub profile: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
}

impl Default for PreflightConfig {
    fn default() -> Self {
        Self {
            profile: Conformance::default().tag().to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl PreflightConfig {
    pub fn conformance(&self) -> Result<Conformance> {
        self.profile.parse().map_err(ConfigError::Validation)
    }
}

/// Configuration manager for loading configuration files and overrides
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration with precedence: defaults -> file -> environment
    pub fn load_config() -> Result<Config> {
        Self::load_config_with(&SystemEnvProvider)
    }

    /// Load configuration reading the environment through `env`
    pub fn load_config_with(env: &impl EnvProvider) -> Result<Config> {
        let mut config = Config::default();

        if let Some(config_path) = env.get(CONFIG_PATH_VAR) {
            config = Self::load_from_file(Path::new(&config_path))?;
        } else if let Some(found_config) = Self::find_config_file()? {
            config = found_config;
        }

        config = Self::apply_environment_overrides_with(env, config)?;
        Self::validate_config(&config)?;

        Ok(config)
    }

    /// Load configuration from a file (TOML or JSON)
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(toml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => {
                // Try to parse as TOML first, then JSON
                if let Ok(config) = toml::from_str::<Config>(&content) {
                    Ok(config)
                } else {
                    Ok(serde_json::from_str(&content)?)
                }
            }
        }
    }

    /// Find configuration file in standard locations
    pub fn find_config_file() -> Result<Option<Config>> {
        let app_config_dir = dirs::config_dir().map(|dir| dir.join("pdfa-validate"));
        Self::find_config_file_in(Path::new("."), app_config_dir.as_deref())
    }

    /// Search `current_dir`, then `app_config_dir`, for the first known file name
    pub fn find_config_file_in(
        current_dir: &Path,
        app_config_dir: Option<&Path>,
    ) -> Result<Option<Config>> {
        let candidates = std::iter::once(current_dir)
            .chain(app_config_dir)
            .flat_map(|dir| CONFIG_NAMES.iter().map(move |name| dir.join(name)));

        for path in candidates {
            if path.is_file() {
                return Ok(Some(Self::load_from_file(&path)?));
            }
        }

        Ok(None)
    }

    /// Apply environment variable overrides with a custom environment provider
    pub fn apply_environment_overrides_with(
        env: &impl EnvProvider,
        mut config: Config,
    ) -> Result<Config> {
        if let Some(stop) = env.get("PDFA_VALIDATE_STOP_ON_FIRST_ERROR") {
            config.engine.stop_on_first_error = stop.parse().map_err(|_| {
                ConfigError::Environment(format!(
                    "Invalid PDFA_VALIDATE_STOP_ON_FIRST_ERROR value: {}",
                    stop
                ))
            })?;
        }

        if let Some(profile) = env.get("PDFA_VALIDATE_PROFILE") {
            if profile.parse::<Conformance>().is_err() {
                return Err(ConfigError::Environment(format!(
                    "Invalid PDFA_VALIDATE_PROFILE value: {}",
                    profile
                )));
            }
            config.preflight.profile = profile;
        }

        if let Some(level) = env.get("PDFA_VALIDATE_LOG_LEVEL") {
            config.logging.level = level.trim().to_lowercase();
        }

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate_config(config: &Config) -> Result<()> {
        config.preflight.conformance()?;

        if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Invalid log level: {} (expected one of {})",
                config.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }
}
