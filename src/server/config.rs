use bcrypt::DEFAULT_COST;
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file at {path:?}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse TOML from config file at {path:?}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to load config from environment: {0}")]
    Env(#[from] envy::Error),
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub log_dir: String,
    pub bcrypt_cost: u32,
    /// `None` allows any origin.
    pub cors_allow_origin: Option<String>,
}

// Partial config for layering
#[derive(Deserialize, Default, Debug)]
pub struct PartialServerConfig {
    pub database_url: Option<String>,
    pub listen_addr: Option<String>,
    pub log_dir: Option<String>,
    pub bcrypt_cost: Option<u32>,
    pub cors_allow_origin: Option<String>,
}

fn default_database_url() -> String {
    "sqlite://article-api.db?mode=rwc".to_string()
}

fn default_listen_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl ServerConfig {
    /// Loads the optional TOML file, then lets environment variables (and `.env`) override it.
    pub fn load(config_path: Option<&str>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let file_config = match config_path {
            Some(path_str) => read_config_file(Path::new(path_str))?,
            None => PartialServerConfig::default(),
        };
        let env_config: PartialServerConfig = envy::from_env()?;

        Self::resolve(env_config, file_config)
    }

    /// Merges two layers; `primary` wins wherever it has a value.
    pub fn resolve(
        primary: PartialServerConfig,
        fallback: PartialServerConfig,
    ) -> Result<Self, ConfigError> {
        let listen_addr_raw = primary
            .listen_addr
            .or(fallback.listen_addr)
            .unwrap_or_else(default_listen_addr);
        let listen_addr = listen_addr_raw
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                field: "listen_addr",
                message: format!("{listen_addr_raw:?}: {e}"),
            })?;

        let bcrypt_cost = primary.bcrypt_cost.or(fallback.bcrypt_cost).unwrap_or(DEFAULT_COST);
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                field: "bcrypt_cost",
                message: format!("{bcrypt_cost} is outside 4..=31"),
            });
        }

        Ok(ServerConfig {
            database_url: primary
                .database_url
                .or(fallback.database_url)
                .unwrap_or_else(default_database_url),
            listen_addr,
            log_dir: primary.log_dir.or(fallback.log_dir).unwrap_or_else(default_log_dir),
            bcrypt_cost,
            cors_allow_origin: primary
                .cors_allow_origin
                .or(fallback.cors_allow_origin)
                .filter(|origin| !origin.is_empty() && origin != "*"),
        })
    }
}

/// A missing file is treated as an empty layer.
pub fn read_config_file(path: &Path) -> Result<PartialServerConfig, ConfigError> {
    if !path.exists() {
        return Ok(PartialServerConfig::default());
    }
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::ParseFile {
        path: path.to_path_buf(),
        source,
    })
}
