//! Application configuration.
//!
//! Precedence: CLI flag > environment > config file > defaults. The config
//! file is the one named by `--config`, else `AFFITO_CONFIG`, else
//! `./affito.toml` when present.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::cors::DEFAULT_ALLOWED_ORIGINS;
use crate::errors::ApiError;

pub const DEFAULT_CONFIG_FILE: &str = "affito.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Listings file, NDJSON or a single JSON array.
    pub data_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// The only identity allowed to change `stateMaloi`.
    pub authorized_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self { allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|o| (*o).to_string()).collect() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Bearer token -> email.
    pub tokens: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: Option<PathBuf>,
    pub level: Option<String>,
    pub retention: Option<u32>,
    /// Queries at or above this duration count as slow.
    pub slow_query_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub review: ReviewConfig,
    pub cors: CorsConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config: Option<PathBuf>,
    pub data: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ApiError> {
        toml::from_str(s).map_err(|e| ApiError::Config(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self, ApiError> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| ApiError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&s).map_err(|e| ApiError::Config(format!("{}: {e}", path.display())))
    }

    /// Resolve the effective configuration. `lookup` reads environment
    /// variables. A file named explicitly (flag or `AFFITO_CONFIG`) must be
    /// readable; the default `./affito.toml` is optional.
    pub fn resolve<F>(cli: &CliOverrides, lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit = cli.config.clone().or_else(|| lookup("AFFITO_CONFIG").map(PathBuf::from));
        let mut cfg = match explicit {
            Some(path) => Self::from_file(&path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() { Self::from_file(default)? } else { Self::default() }
            }
        };

        if let Some(s) = lookup("AFFITO_DATA_FILE") {
            cfg.store.data_file = Some(PathBuf::from(s));
        }
        if let Some(s) = lookup("AFFITO_AUTHORIZED_EMAIL") {
            cfg.review.authorized_email = Some(s);
        }
        if let Some(s) = lookup("AFFITO_LOG_DIR") {
            cfg.logging.dir = Some(PathBuf::from(s));
        }
        if let Some(s) = lookup("AFFITO_LOG_LEVEL") {
            cfg.logging.level = Some(s);
        }
        if let Some(s) = lookup("AFFITO_LOG_RETENTION") {
            match s.trim().parse::<u32>() {
                Ok(n) => cfg.logging.retention = Some(n),
                Err(_) => return Err(ApiError::Config(format!("AFFITO_LOG_RETENTION: not a count: {s}"))),
            }
        }

        if let Some(p) = &cli.data {
            cfg.store.data_file = Some(p.clone());
        }
        Ok(cfg)
    }

    /// [`AppConfig::resolve`] over the process environment.
    pub fn load(cli: &CliOverrides) -> Result<Self, ApiError> {
        Self::resolve(cli, |k| std::env::var(k).ok())
    }
}
