//! CLI configuration -- thin wrapper around `brilliant_config`.
//!
//! Re-exports the shared types and applies `GlobalOpts` flag overrides
//! (--backend, --timeout, --cache-dir, --insecure) on top of file + env.

use brilliant_core::AppConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use brilliant_config::{Config, config_path, load_config, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Merge flag overrides into a loaded config.
pub fn apply_overrides(mut cfg: Config, global: &GlobalOpts) -> Config {
    if let Some(ref url) = global.backend {
        cfg.backend.url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        cfg.backend.timeout = timeout;
    }
    if let Some(ref dir) = global.cache_dir {
        cfg.cache.dir = Some(dir.clone());
        cfg.cache.persist = true;
    }
    if global.insecure {
        cfg.backend.insecure = true;
    }
    cfg
}

/// Load file + env, apply flags, and translate to the core runtime config.
pub fn resolve(global: &GlobalOpts) -> Result<(Config, AppConfig), CliError> {
    let cfg = apply_overrides(load_config()?, global);
    let app = cfg.to_app_config()?;
    Ok((cfg, app))
}
