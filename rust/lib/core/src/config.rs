use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default prediction endpoint of the price classifier.
pub const DEFAULT_PREDICTOR_URL: &str = "http://localhost:8000/predict_price/";

/// Default number of devices handled by one batch prediction.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Service configuration, read from a TOML file.
///
/// Every section and key is optional; missing values fall back to the
/// defaults below.
///
/// ```toml
/// [server]
/// listen = "0.0.0.0:8080"
///
/// [storage]
/// data_dir = "/var/lib/devclass"
///
/// [predictor]
/// url = "http://localhost:8000/predict_price/"
/// timeout_secs = 10
/// batch_size = 10
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerSection,
    pub storage: StorageSection,
    pub predictor: PredictorSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Listen address for the HTTP server.
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Directory holding the database file.
    pub data_dir: Option<PathBuf>,

    /// Path to the SQLite database file.
    /// Defaults to `{data_dir}/devices.sqlite`.
    pub sqlite_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PredictorSection {
    /// Endpoint receiving the device feature vector.
    pub url: String,

    /// Request timeout. `None` leaves the HTTP client default in place.
    pub timeout_secs: Option<u64>,

    /// Upper bound on devices handled by one batch prediction.
    pub batch_size: usize,
}

impl Default for PredictorSection {
    fn default() -> Self {
        Self {
            url: DEFAULT_PREDICTOR_URL.to_string(),
            timeout_secs: None,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Failure to read or parse a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ServiceConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ServiceConfig =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.listen.is_empty() {
            return Err(ConfigError::Invalid("server.listen is empty".into()));
        }
        if self.predictor.url.is_empty() {
            return Err(ConfigError::Invalid("predictor.url is empty".into()));
        }
        if self.predictor.batch_size == 0 {
            return Err(ConfigError::Invalid("predictor.batch_size must be > 0".into()));
        }
        if self.predictor.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid("predictor.timeout_secs must be > 0".into()));
        }
        Ok(())
    }

    /// Resolve the SQLite database path, falling back to `{data_dir}/devices.sqlite`.
    pub fn resolve_sqlite_path(&self) -> PathBuf {
        if let Some(path) = &self.storage.sqlite_path {
            return path.clone();
        }
        self.storage
            .data_dir
            .as_ref()
            .map(|d| d.join("devices.sqlite"))
            .unwrap_or_else(|| PathBuf::from("devices.sqlite"))
    }
}
