// ── Application facade ──
//
// Wires one bridge, one store, one clock and the process-lifetime
// verification session together, and hands out gates and catalog handles
// that share them.

use std::sync::Arc;

use brilliant_bridge::{CommandBridge, HttpBridge, TransportConfig};
use tracing::debug;

use crate::catalog::Catalog;
use crate::clock::{Clock, SystemClock};
use crate::config::{AppConfig, GateConfig};
use crate::error::CoreError;
use crate::license::{GateView, LicenseGate, MountOutcome, VerificationSession};
use crate::settings::{Settings, Updater};
use crate::store::{FileStore, KeyValueStore, MemoryStore};

/// Process-wide entry point.
pub struct App<B = Arc<HttpBridge>> {
    bridge: B,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    session: VerificationSession,
    gate_config: GateConfig,
}

impl App {
    /// Build the HTTP bridge and store described by `config`.
    pub fn new(config: &AppConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            timeout: config.backend.timeout,
            accept_invalid_certs: config.backend.accept_invalid_certs,
        };
        let bridge = HttpBridge::new(config.backend.url.clone(), &transport)?;

        let store: Arc<dyn KeyValueStore> = match &config.cache_dir {
            Some(dir) => Arc::new(FileStore::new(dir.clone())),
            None => Arc::new(MemoryStore::new()),
        };
        debug!(backend = %config.backend.url, "app initialised");

        Ok(Self::with_parts(
            Arc::new(bridge),
            store,
            Arc::new(SystemClock),
            config.gate.clone(),
        ))
    }
}

impl<B: CommandBridge + Clone> App<B> {
    /// Assemble from explicit parts.
    pub fn with_parts(
        bridge: B,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        gate_config: GateConfig,
    ) -> Self {
        Self {
            bridge,
            store,
            clock,
            session: VerificationSession::new(),
            gate_config,
        }
    }

    pub fn session(&self) -> &VerificationSession {
        &self.session
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// A fresh, unmounted gate sharing this process's session.
    pub fn gate(&self) -> LicenseGate<B> {
        LicenseGate::new(
            self.bridge.clone(),
            self.session.clone(),
            Arc::clone(&self.store),
            Arc::clone(&self.clock),
            &self.gate_config,
        )
    }

    /// Catalog access without consulting the gate.
    pub fn catalog(&self) -> Catalog<B> {
        Catalog::new(self.bridge.clone())
    }

    /// Profile access without consulting the gate.
    pub fn settings(&self) -> Settings<B> {
        Settings::new(self.bridge.clone())
    }

    pub fn updater(&self) -> Updater<B> {
        Updater::new(self.bridge.clone())
    }

    /// Mount a gate and fail with `LicenseRequired` unless it opens.
    pub async fn require_license(&self) -> Result<MountOutcome, CoreError> {
        let gate = self.gate();
        let outcome = gate.mount().await;
        match gate.view() {
            GateView::Open { .. } => Ok(outcome),
            GateView::VerificationFailed { error } => {
                Err(CoreError::LicenseRequired { reason: error })
            }
            GateView::ActivationRequired | GateView::Verifying => {
                let reason = gate
                    .state()
                    .license_status
                    .map_or_else(|| "license is not activated".to_owned(), |s| s.message);
                Err(CoreError::LicenseRequired { reason })
            }
        }
    }

    /// The catalog, only if the license gate opens.
    pub async fn open_catalog(&self) -> Result<(Catalog<B>, MountOutcome), CoreError> {
        let outcome = self.require_license().await?;
        Ok((self.catalog(), outcome))
    }

    /// The profile, only if the license gate opens.
    pub async fn open_settings(&self) -> Result<Settings<B>, CoreError> {
        self.require_license().await?;
        Ok(self.settings())
    }
}
