// ── License gate ──
//
// Owns the in-memory license state for one front-end mount and decides
// whether the persisted verification record, the process session, or a
// real backend round-trip supplies it.

use std::sync::Arc;

use brilliant_bridge::{CommandBridge, LicenseClient, LicenseInfo, LicenseStatus};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::record::{LicenseVerificationRecord, StoredVerification};
use super::session::{SessionInner, SessionResult, VerificationSession};
use super::state::GateState;
use super::view::GateView;
use crate::cache::TtlCache;
use crate::clock::Clock;
use crate::config::GateConfig;
use crate::error::CoreError;
use crate::store::KeyValueStore;

const CHECK_FAILED: &str = "License check failed";
const ACTIVATION_FAILED: &str = "Activation failed";
const RENEWAL_FAILED: &str = "Renewal failed";
const DEACTIVATION_FAILED: &str = "Deactivation failed";
const VALIDATION_FAILED: &str = "Validation failed";
const INFO_FAILED: &str = "Could not load license info";
const MACHINE_CODE_FAILED: &str = "Could not read machine code";

/// Where a mount got its license state from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum MountOutcome {
    /// A fresh persisted record was reused.
    Cached,
    /// The backend was asked.
    Verified,
    /// An earlier mount in this process already verified.
    AlreadyVerified,
}

/// License gate bound to one bridge, one cache and the process session.
pub struct LicenseGate<B> {
    client: LicenseClient<B>,
    cache: TtlCache<LicenseVerificationRecord>,
    session: VerificationSession,
    state: watch::Sender<GateState>,
}

impl<B: CommandBridge> LicenseGate<B> {
    pub fn new(
        bridge: B,
        session: VerificationSession,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        config: &GateConfig,
    ) -> Self {
        let cache = TtlCache::new(config.cache_key.clone(), config.cache_ttl, store, clock);
        let (state, _) = watch::channel(GateState::default());
        Self {
            client: LicenseClient::new(bridge),
            cache,
            session,
            state,
        }
    }

    // ── Observation ──────────────────────────────────────────────────

    /// Snapshot of the current state.
    pub fn state(&self) -> GateState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<GateState> {
        self.state.subscribe()
    }

    pub fn can_use_app(&self) -> bool {
        self.state.borrow().can_use_app()
    }

    pub fn view(&self) -> GateView {
        self.state.borrow().view()
    }

    pub fn session(&self) -> &VerificationSession {
        &self.session
    }

    pub fn cache(&self) -> &TtlCache<LicenseVerificationRecord> {
        &self.cache
    }

    // ── Startup ──────────────────────────────────────────────────────

    /// Establish the license state for this mount.
    ///
    /// A fresh persisted record wins. Otherwise the first mount of the
    /// process asks the backend and later mounts reuse that answer.
    pub async fn mount(&self) -> MountOutcome {
        if let Some(entry) = self.cache.get() {
            if entry.value.already_verified {
                let mut session = self.session.lock().await;
                self.adopt_cached(&entry);
                session.verified = true;
                session.last = Some(SessionResult {
                    record: entry.value,
                    error: None,
                });
                return MountOutcome::Cached;
            }
        }

        let mut session = self.session.lock().await;
        if !session.verified {
            self.check_locked(&mut session).await;
            session.verified = true;
            self.state.send_modify(|s| {
                s.already_verified = true;
                s.loading = false;
            });
            return MountOutcome::Verified;
        }

        debug!("license already verified this session");
        let last = session.last.clone();
        self.state.send_modify(|s| {
            if let Some(last) = &last {
                s.adopt(&last.record);
                s.error.clone_from(&last.error);
            }
            s.already_verified = true;
            s.loading = false;
        });
        MountOutcome::AlreadyVerified
    }

    fn adopt_cached(&self, entry: &StoredVerification) {
        let age = self.cache.age(entry);
        info!(
            age_secs = age.num_seconds(),
            is_activated = entry.value.is_activated,
            "license state restored from cache"
        );
        self.state.send_modify(|s| {
            s.adopt(&entry.value);
            s.error = None;
            s.already_verified = true;
            s.loading = false;
        });
    }

    // ── Verification ─────────────────────────────────────────────────

    /// Ask the backend for the current license state.
    ///
    /// Failures are recorded in the state rather than returned.
    pub async fn check_activation_status(&self) -> GateState {
        let mut session = self.session.lock().await;
        self.check_locked(&mut session).await;
        self.state()
    }

    async fn check_locked(&self, session: &mut SessionInner) {
        self.state.send_modify(|s| s.loading = true);

        match self.fetch_verification().await {
            Ok(record) => {
                info!(
                    is_activated = record.is_activated,
                    can_use_app = record.can_use_app(),
                    "license verified"
                );
                if let Err(e) = self.cache.put(record.clone()) {
                    warn!(error = %e, "failed to persist license verification");
                }
                self.state.send_modify(|s| {
                    s.adopt(&record);
                    s.error = None;
                    s.loading = false;
                });
                session.last = Some(SessionResult {
                    record,
                    error: None,
                });
            }
            Err(e) => {
                let message = e.display_message(CHECK_FAILED);
                warn!(error = %e, "license verification failed");
                self.state.send_modify(|s| {
                    s.is_activated = false;
                    s.error = Some(message.clone());
                    s.loading = false;
                });
                session.last = Some(SessionResult {
                    record: LicenseVerificationRecord::default(),
                    error: Some(message),
                });
            }
        }
    }

    async fn fetch_verification(&self) -> Result<LicenseVerificationRecord, CoreError> {
        let is_activated = self.client.is_license_activated().await?;
        if !is_activated {
            return Ok(LicenseVerificationRecord {
                is_activated,
                license_status: None,
                license_info: None,
                already_verified: true,
            });
        }

        let status = self.client.validate_current_license().await?;
        let info = self.client.get_license_info().await?;
        Ok(LicenseVerificationRecord {
            is_activated,
            license_status: Some(status),
            license_info: Some(info),
            already_verified: true,
        })
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Bind `key` to this machine, then re-verify.
    ///
    /// Returns the backend's confirmation message.
    pub async fn activate_license(&self, key: &SecretString) -> Result<String, CoreError> {
        let key = key.expose_secret().trim();
        if key.is_empty() {
            return Err(self.record_error(CoreError::EmptyLicenseKey, ACTIVATION_FAILED));
        }

        self.begin();
        let message = match self.client.activate_license(key).await {
            Ok(message) => message,
            Err(e) => return Err(self.record_error(e.into(), ACTIVATION_FAILED)),
        };

        self.reverify().await;
        self.state.send_modify(|s| s.activation_override = true);
        info!("license activated");
        Ok(message)
    }

    /// Extend the current license, then re-verify.
    pub async fn renew_license(&self) -> Result<String, CoreError> {
        self.begin();
        let message = match self.client.renew_license().await {
            Ok(message) => message,
            Err(e) => return Err(self.record_error(e.into(), RENEWAL_FAILED)),
        };

        self.reverify().await;
        info!("license renewed");
        Ok(message)
    }

    /// Release the license from this machine.
    ///
    /// Clears the license state, the persisted record and the session, so
    /// the next mount asks the backend again.
    pub async fn deactivate_license(&self) -> Result<String, CoreError> {
        self.begin();
        let message = match self.client.deactivate_license().await {
            Ok(message) => message,
            Err(e) => return Err(self.record_error(e.into(), DEACTIVATION_FAILED)),
        };

        self.state.send_modify(|s| {
            s.clear_license();
            s.already_verified = false;
            s.activation_override = false;
            s.loading = false;
        });
        self.invalidate_cache();
        self.session.reset().await;
        info!("license deactivated");
        Ok(message)
    }

    /// Real verification followed by cache invalidation, so the record
    /// written by the check is never served to a later run.
    async fn reverify(&self) {
        {
            let mut session = self.session.lock().await;
            self.check_locked(&mut session).await;
            session.verified = true;
        }
        self.invalidate_cache();
        self.state.send_modify(|s| {
            s.already_verified = true;
            s.loading = false;
        });
    }

    // ── Point reads ──────────────────────────────────────────────────

    pub async fn validate_license(&self) -> Result<LicenseStatus, CoreError> {
        self.begin();
        match self.client.validate_current_license().await {
            Ok(status) => {
                let published = status.clone();
                self.state.send_modify(|s| {
                    s.license_status = Some(published);
                    s.loading = false;
                });
                Ok(status)
            }
            Err(e) => Err(self.record_error(e.into(), VALIDATION_FAILED)),
        }
    }

    pub async fn get_license_info(&self) -> Result<LicenseInfo, CoreError> {
        self.begin();
        match self.client.get_license_info().await {
            Ok(info) => {
                let published = info.clone();
                self.state.send_modify(|s| {
                    s.license_info = Some(published);
                    s.loading = false;
                });
                Ok(info)
            }
            Err(e) => Err(self.record_error(e.into(), INFO_FAILED)),
        }
    }

    pub async fn get_machine_code(&self) -> Result<String, CoreError> {
        self.client
            .get_machine_code()
            .await
            .map_err(|e| self.record_error(e.into(), MACHINE_CODE_FAILED))
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|s| s.error = None);
    }

    /// Delete the persisted record without touching in-memory state.
    pub fn clear_cache(&self) -> Result<(), CoreError> {
        self.cache.invalidate()
    }

    // ── Helpers ──────────────────────────────────────────────────────

    fn begin(&self) {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
    }

    fn record_error(&self, err: CoreError, prefix: &str) -> CoreError {
        let message = err.display_message(prefix);
        warn!(error = %err, "{prefix}");
        self.state.send_modify(|s| {
            s.error = Some(message);
            s.loading = false;
        });
        err
    }

    fn invalidate_cache(&self) {
        if let Err(e) = self.cache.invalidate() {
            warn!(error = %e, "failed to clear license cache");
        }
    }
}
