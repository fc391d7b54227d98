//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::cache::{CacheConfig, StartupPolicy};
use crate::upstream::UpstreamConfig;

/// Default address to listen on.
const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
    3000,
);

/// Errors from reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable could not be parsed
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },

    /// The keys file could not be read
    #[error("failed to read keys file {path}: {source}")]
    KeysFileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The keys file is not valid JSON
    #[error("failed to parse keys file {path}: {source}")]
    KeysFileJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Neither credentials nor offline data were configured
    #[error("FUEL_API_KEY and FUEL_API_SECRET (or FUEL_KEYS_FILE) are required")]
    MissingCredentials,
}

/// API credentials as stored in a keys file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeys {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_secret: Option<String>,
}

impl ApiKeys {
    /// Read credentials from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::KeysFileIo {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&json).map_err(|source| ConfigError::KeysFileJson {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Everything the server binary needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub keys: ApiKeys,
    pub base_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub cache: CacheConfig,
    /// Serve `/data` and `/stats`
    pub diagnostics: bool,
    /// Serve this saved snapshot instead of calling upstream
    pub offline_data: Option<PathBuf>,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let file_keys = match var("FUEL_KEYS_FILE") {
            Some(path) => ApiKeys::from_file(Path::new(&path))?,
            None => ApiKeys::default(),
        };
        let keys = ApiKeys {
            api_key: var("FUEL_API_KEY").or(file_keys.api_key),
            api_secret: var("FUEL_API_SECRET").or(file_keys.api_secret),
        };

        let bind_addr = match var("FUEL_BIND_ADDR") {
            Some(addr) => addr.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "FUEL_BIND_ADDR",
                value: addr,
            })?,
            None => DEFAULT_BIND_ADDR,
        };

        let mut cache = CacheConfig::default();
        if let Some(mins) = var("FUEL_REFRESH_MINS") {
            let secs = mins
                .trim()
                .parse::<u64>()
                .ok()
                .and_then(|m| m.checked_mul(60))
                .ok_or_else(|| ConfigError::InvalidValue {
                    name: "FUEL_REFRESH_MINS",
                    value: mins.clone(),
                })?;
            cache = cache.with_refresh_interval(Duration::from_secs(secs));
        }
        if parse_flag("FUEL_FAIL_ON_EMPTY_START", var("FUEL_FAIL_ON_EMPTY_START"))? {
            cache = cache.with_startup_policy(StartupPolicy::FailFast);
        }

        Ok(Self {
            keys,
            base_url: var("FUEL_API_BASE_URL"),
            bind_addr,
            cache,
            diagnostics: parse_flag("FUEL_DIAGNOSTICS", var("FUEL_DIAGNOSTICS"))?,
            offline_data: var("FUEL_OFFLINE_DATA").map(PathBuf::from),
        })
    }

    /// Client configuration for the live API.
    pub fn upstream(&self) -> Result<UpstreamConfig, ConfigError> {
        let (Some(key), Some(secret)) = (&self.keys.api_key, &self.keys.api_secret) else {
            return Err(ConfigError::MissingCredentials);
        };

        let config = UpstreamConfig::new(key, secret);
        Ok(match &self.base_url {
            Some(url) => config.with_base_url(url),
            None => config,
        })
    }
}

fn parse_flag(name: &'static str, value: Option<String>) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(false);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue { name, value }),
    }
}
