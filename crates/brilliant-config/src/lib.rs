//! Configuration for the Brilliant CLI.
//!
//! One TOML file layered under `BRILLIANT_*` environment variables, and
//! translation to `brilliant_core::AppConfig`. The CLI applies its flag
//! overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use brilliant_core::config::{DEFAULT_CACHE_TTL, DEFAULT_TIMEOUT, LICENSE_CACHE_KEY};
use brilliant_core::{AppConfig, BackendConfig, GateConfig};

/// Environment variable prefix; `BRILLIANT_BACKEND_URL` sets `backend.url`.
pub const ENV_PREFIX: &str = "BRILLIANT_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub backend: Backend,

    #[serde(default)]
    pub cache: Cache,
}

/// Where the backend's command bridge listens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Backend {
    /// Base URL; commands are posted to `{url}/invoke/{command}`.
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept self-signed TLS certificates.
    #[serde(default)]
    pub insecure: bool,
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            timeout: default_timeout(),
            insecure: false,
        }
    }
}

/// License verification cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Cache {
    /// Keep the verification record on disk between runs.
    #[serde(default = "default_true")]
    pub persist: bool,

    /// Override the platform cache directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Seconds a persisted verification stays reusable.
    #[serde(default = "default_ttl")]
    pub ttl: u64,
}

impl Default for Cache {
    fn default() -> Self {
        Self {
            persist: true,
            dir: None,
            ttl: default_ttl(),
        }
    }
}

fn default_backend_url() -> String {
    "http://127.0.0.1:1420".into()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}
fn default_ttl() -> u64 {
    DEFAULT_CACHE_TTL.as_secs()
}
fn default_true() -> bool {
    true
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "brilliant", "brilliant")
}

fn home_fallback(kind: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(kind);
    p.push("brilliant");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Platform cache directory for the verification record.
pub fn default_cache_dir() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".cache"),
        |dirs| dirs.cache_dir().to_path_buf(),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Defaults, then the TOML file at `path`, then the environment.
pub fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("_"))
}

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = figment_for(path).extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

impl Config {
    /// Parsed backend URL.
    pub fn backend_url(&self) -> Result<url::Url, ConfigError> {
        self.backend.url.parse().map_err(|_| ConfigError::Validation {
            field: "backend.url".into(),
            reason: format!("invalid URL: {}", self.backend.url),
        })
    }

    /// Directory the verification record lives in, or `None` when
    /// persistence is disabled.
    pub fn cache_dir(&self) -> Option<PathBuf> {
        if !self.cache.persist {
            return None;
        }
        Some(self.cache.dir.clone().unwrap_or_else(default_cache_dir))
    }

    /// Build the core runtime configuration.
    pub fn to_app_config(&self) -> Result<AppConfig, ConfigError> {
        if self.backend.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "backend.timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        if self.cache.ttl == 0 {
            return Err(ConfigError::Validation {
                field: "cache.ttl".into(),
                reason: "must be at least 1 second".into(),
            });
        }

        Ok(AppConfig {
            backend: BackendConfig {
                url: self.backend_url()?,
                timeout: Duration::from_secs(self.backend.timeout),
                accept_invalid_certs: self.backend.insecure,
            },
            gate: GateConfig {
                cache_key: LICENSE_CACHE_KEY.into(),
                cache_ttl: Duration::from_secs(self.cache.ttl),
            },
            cache_dir: self.cache_dir(),
        })
    }
}
