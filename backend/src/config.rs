//! Registry configuration file support.
//!
//! Configuration is read from a TOML file and then overridden by environment
//! variables. Every section is optional; missing values fall back to defaults.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [pedigree]
//! max_generations = 10
//!
//! [repository]
//! seed_file = "seed.json"
//! ```
//!
//! # Environment Variables
//!
//! - `HORSE_REGISTRY_CONFIG`: explicit path to the configuration file
//! - `HOST`: server host
//! - `PORT`: server port
//! - `MAX_GENERATIONS`: pedigree depth bound

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::db::repository::{ErrorContext, RepositoryError};

/// Largest generation bound a deployment may configure.
pub const MAX_GENERATIONS_CEILING: u32 = 25;

/// Generation bound used when none is configured.
pub const DEFAULT_MAX_GENERATIONS: u32 = 10;

/// Top-level registry configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub pedigree: PedigreeSettings,
    #[serde(default)]
    pub repository: RepositorySettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Pedigree construction settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PedigreeSettings {
    /// Largest accepted `generations` value for family tree requests.
    #[serde(default = "default_max_generations")]
    pub max_generations: u32,
}

/// Store settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySettings {
    /// JSON file with owners and horses loaded into an empty store at startup.
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_generations() -> u32 {
    DEFAULT_MAX_GENERATIONS
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for PedigreeSettings {
    fn default() -> Self {
        Self {
            max_generations: DEFAULT_MAX_GENERATIONS,
        }
    }
}

impl RegistryConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Returns
    /// * `Ok(RegistryConfig)` if successful
    /// * `Err(RepositoryError)` if the file cannot be read, parsed or fails validation
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RepositoryError::configuration_with_context(
                format!("Failed to read config file: {}", e),
                ErrorContext::new("load_config").with_details(path.display().to_string()),
            )
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, RepositoryError> {
        let config: RegistryConfig = toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Uses `HORSE_REGISTRY_CONFIG` when set; otherwise searches for
    /// `registry.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// # Returns
    /// * `Ok(Some(RegistryConfig))` if a file was found and parsed
    /// * `Ok(None)` if no file exists in any standard location
    /// * `Err(RepositoryError)` if a file exists but is invalid
    pub fn from_default_location() -> Result<Option<Self>, RepositoryError> {
        if let Ok(path) = std::env::var("HORSE_REGISTRY_CONFIG") {
            return Self::from_file(path).map(Some);
        }

        let search_paths = [
            PathBuf::from("registry.toml"),
            PathBuf::from("backend/registry.toml"),
            PathBuf::from("../registry.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path).map(Some);
            }
        }

        Ok(None)
    }

    /// Resolve the effective configuration: file (if any), then env overrides.
    pub fn load() -> Result<Self, RepositoryError> {
        let mut config = Self::from_default_location()?.unwrap_or_default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `HOST`, `PORT` and `MAX_GENERATIONS` from the environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), RepositoryError> {
        if let Ok(host) = std::env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            self.server.port = port.parse().map_err(|e| {
                RepositoryError::configuration(format!("Invalid PORT '{}': {}", port, e))
            })?;
        }
        if let Ok(max) = std::env::var("MAX_GENERATIONS") {
            self.pedigree.max_generations = max.parse().map_err(|e| {
                RepositoryError::configuration(format!("Invalid MAX_GENERATIONS '{}': {}", max, e))
            })?;
        }
        self.validate()
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), RepositoryError> {
        if self.server.port == 0 {
            return Err(RepositoryError::configuration("server.port must be non-zero"));
        }
        self.pedigree.validate()
    }

    /// `host:port` string for binding the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl PedigreeSettings {
    pub fn new(max_generations: u32) -> Result<Self, RepositoryError> {
        let settings = Self { max_generations };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), RepositoryError> {
        if !(1..=MAX_GENERATIONS_CEILING).contains(&self.max_generations) {
            return Err(RepositoryError::configuration(format!(
                "pedigree.max_generations must be between 1 and {}, got {}",
                MAX_GENERATIONS_CEILING, self.max_generations
            )));
        }
        Ok(())
    }
}
