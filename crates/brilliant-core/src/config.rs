// ── Runtime configuration ──
//
// Already-resolved settings handed to the core by the CLI. File and
// environment layering lives in brilliant-config.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// Storage key of the persisted license verification record.
pub const LICENSE_CACHE_KEY: &str = "license_verification_cache";

/// How long a persisted verification may be reused.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Default per-request timeout for backend calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the backend lives and how to reach it.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub url: Url,
    pub timeout: Duration,
    pub accept_invalid_certs: bool,
}

/// Verification cache placement and lifetime.
#[derive(Debug, Clone)]
pub struct GateConfig {
    pub cache_key: String,
    pub cache_ttl: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            cache_key: LICENSE_CACHE_KEY.into(),
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

/// Everything needed to build an [`App`](crate::App).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub gate: GateConfig,
    /// Directory for the file-backed store. `None` keeps state in memory
    /// only, so every run verifies against the backend.
    pub cache_dir: Option<PathBuf>,
}

impl BackendConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            timeout: DEFAULT_TIMEOUT,
            accept_invalid_certs: false,
        }
    }
}
