#![allow(clippy::unwrap_used)]
// License gate behaviour against a scripted bridge and a manual clock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{TimeDelta, TimeZone, Utc};
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};

use brilliant_bridge::{CommandBridge, Error, ErrorKind};
use brilliant_core::{
    Clock, CoreError, GateConfig, GateView, KeyValueStore, LicenseGate, LicenseState, ManualClock,
    MemoryStore, MountOutcome, StoredVerification, VerificationSession,
};

// ── Helpers ─────────────────────────────────────────────────────────

type Reply = Result<Value, (ErrorKind, String)>;

/// Bridge answering from a per-command script and counting calls.
#[derive(Default)]
struct ScriptedBridge {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedBridge {
    fn respond(&self, command: &str, value: Value) {
        self.replies
            .lock()
            .unwrap()
            .insert(command.into(), Ok(value));
    }

    fn fail(&self, command: &str, kind: ErrorKind, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .insert(command.into(), Err((kind, message.into())));
    }

    fn count(&self, command: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| c == command)
            .count()
    }

    fn total(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn args(&self, command: &str) -> Vec<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| c == command)
            .map(|(_, a)| a.clone())
            .collect()
    }
}

impl CommandBridge for ScriptedBridge {
    async fn call(&self, command: &str, args: Value) -> Result<Value, Error> {
        // Let concurrent mounts interleave.
        tokio::task::yield_now().await;
        self.calls.lock().unwrap().push((command.to_owned(), args));
        let reply = self.replies.lock().unwrap().get(command).cloned();
        match reply {
            Some(Ok(value)) => Ok(value),
            Some(Err((kind, message))) => Err(Error::Backend {
                command: command.to_owned(),
                kind,
                message,
            }),
            None => Err(Error::Backend {
                command: command.to_owned(),
                kind: ErrorKind::Unknown,
                message: format!("unscripted command {command}"),
            }),
        }
    }
}

struct Harness {
    bridge: Arc<ScriptedBridge>,
    store: Arc<MemoryStore>,
    clock: Arc<ManualClock>,
    session: VerificationSession,
}

impl Harness {
    fn new() -> Self {
        Self {
            bridge: Arc::new(ScriptedBridge::default()),
            store: Arc::new(MemoryStore::new()),
            clock: Arc::new(ManualClock::new(
                Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap(),
            )),
            session: VerificationSession::new(),
        }
    }

    /// A gate as built by a fresh mount in the same process.
    fn gate(&self) -> LicenseGate<Arc<ScriptedBridge>> {
        LicenseGate::new(
            Arc::clone(&self.bridge),
            self.session.clone(),
            self.store.clone(),
            self.clock.clone(),
            &GateConfig::default(),
        )
    }

    /// Simulate a process restart: new session, same store and clock.
    fn restart(&mut self) {
        self.session = VerificationSession::new();
    }

    fn stored(&self) -> Option<StoredVerification> {
        self.store
            .get("license_verification_cache")
            .unwrap()
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    fn script_valid_license(&self) {
        self.bridge.respond("is_license_activated", json!(true));
        self.bridge.respond(
            "validate_current_license",
            json!({
                "is_valid": true,
                "status": "valid",
                "message": "License valid",
                "days_remaining": null
            }),
        );
        self.bridge.respond("get_license_info", license_info());
    }

    fn script_not_activated(&self) {
        self.bridge.respond("is_license_activated", json!(false));
    }
}

fn license_info() -> Value {
    json!({
        "key": "ABCDE-FGHIJ-KLMNO-PQRST",
        "machine_code": "MC-1",
        "expires": "2027-01-01 00:00:00 UTC",
        "product_id": "brilliant",
        "premium": false,
        "max_offline_days": 7,
        "last_activation": "2026-01-01 00:00:00 UTC",
        "days_until_expiry": 365
    })
}

fn key(s: &str) -> SecretString {
    SecretString::from(s.to_owned())
}

// ── Cold start ──────────────────────────────────────────────────────

#[tokio::test]
async fn cold_start_not_activated_shows_activation_form() {
    let h = Harness::new();
    h.script_not_activated();

    let gate = h.gate();
    assert_eq!(gate.view(), GateView::Verifying);
    assert_eq!(gate.mount().await, MountOutcome::Verified);

    assert_eq!(gate.view(), GateView::ActivationRequired);
    assert!(!gate.can_use_app());
    assert_eq!(h.bridge.count("is_license_activated"), 1);
    assert_eq!(h.bridge.count("validate_current_license"), 0);

    // Later mounts in the same run make no calls.
    let again = h.gate();
    assert_eq!(again.mount().await, MountOutcome::AlreadyVerified);
    assert_eq!(again.view(), GateView::ActivationRequired);
    assert_eq!(h.bridge.total(), 1);
}

#[tokio::test]
async fn cold_start_valid_license_opens_gate_and_writes_cache() {
    let h = Harness::new();
    h.script_valid_license();

    let gate = h.gate();
    assert_eq!(gate.mount().await, MountOutcome::Verified);

    assert!(gate.can_use_app());
    assert_eq!(
        gate.view(),
        GateView::Open {
            expiry_warning: None,
            can_deactivate: true
        }
    );

    let stored = h.stored().expect("verification should be cached");
    assert!(stored.value.already_verified);
    assert!(stored.value.is_activated);
    assert_eq!(stored.inserted_at, h.clock.now());
}

#[tokio::test]
async fn persisted_record_shape() {
    let h = Harness::new();
    h.script_valid_license();
    h.gate().mount().await;

    insta::assert_json_snapshot!(h.stored().unwrap(), @r#"
    {
      "timestamp": 1767268800000,
      "isActivated": true,
      "licenseStatus": {
        "is_valid": true,
        "status": "valid",
        "message": "License valid"
      },
      "licenseInfo": {
        "key": "ABCDE-FGHIJ-KLMNO-PQRST",
        "machine_code": "MC-1",
        "expires": "2027-01-01 00:00:00 UTC",
        "product_id": "brilliant",
        "premium": false,
        "max_offline_days": 7,
        "last_activation": "2026-01-01 00:00:00 UTC",
        "days_until_expiry": 365
      },
      "alreadyVerified": true
    }
    "#);
}

// ── Warm start ──────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_status_survives_the_cache() {
    let mut h = Harness::new();
    h.script_valid_license();
    h.bridge.respond(
        "validate_current_license",
        json!({
            "is_valid": true,
            "status": "grace_period",
            "message": "Em período de carência",
            "days_remaining": 2
        }),
    );
    h.gate().mount().await;

    let raw = h.store.get("license_verification_cache").unwrap().unwrap();
    let record: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(record["licenseStatus"]["status"], "grace_period");

    h.restart();
    let gate = h.gate();
    assert_eq!(gate.mount().await, MountOutcome::Cached);
    assert_eq!(
        gate.state().license_status.unwrap().status,
        LicenseState::Other("grace_period".into())
    );
}

#[tokio::test]
async fn warm_start_within_ttl_is_served_from_cache() {
    let mut h = Harness::new();
    h.script_valid_license();
    let first = h.gate();
    first.mount().await;
    let verified_state = first.state();
    assert_eq!(h.bridge.total(), 3);

    h.restart();
    h.clock.advance(TimeDelta::seconds(4 * 60 + 59));

    let gate = h.gate();
    assert_eq!(gate.mount().await, MountOutcome::Cached);
    assert_eq!(h.bridge.total(), 3, "no backend call expected");

    let state = gate.state();
    assert_eq!(state.is_activated, verified_state.is_activated);
    assert_eq!(state.license_status, verified_state.license_status);
    assert_eq!(state.license_info, verified_state.license_info);
    assert!(state.already_verified);
    assert!(!state.loading);
    assert!(gate.can_use_app());
    assert!(h.session.is_verified().await);
}

#[tokio::test]
async fn warm_start_after_ttl_calls_backend() {
    let mut h = Harness::new();
    h.script_valid_license();
    h.gate().mount().await;

    h.restart();
    h.clock.advance(TimeDelta::seconds(5 * 60 + 1));

    let gate = h.gate();
    assert_eq!(gate.mount().await, MountOutcome::Verified);
    assert_eq!(h.bridge.count("is_license_activated"), 2);
}

#[tokio::test]
async fn future_dated_record_is_ignored() {
    let mut h = Harness::new();
    h.script_valid_license();
    h.gate().mount().await;

    h.restart();
    h.clock.advance(TimeDelta::minutes(-1));

    assert_eq!(h.gate().mount().await, MountOutcome::Verified);
    assert_eq!(h.bridge.count("is_license_activated"), 2);
}

#[tokio::test]
async fn corrupt_record_is_deleted_and_backend_asked() {
    let h = Harness::new();
    h.script_not_activated();
    h.store
        .set("license_verification_cache", "{\"timestamp\": \"yesterday\"")
        .unwrap();

    assert_eq!(h.gate().mount().await, MountOutcome::Verified);
    assert_eq!(h.bridge.count("is_license_activated"), 1);
    // Replaced by the fresh verification.
    assert!(!h.stored().unwrap().value.is_activated);
}

#[tokio::test]
async fn record_without_already_verified_is_not_adopted() {
    let h = Harness::new();
    h.script_not_activated();
    h.store
        .set(
            "license_verification_cache",
            &json!({ "timestamp": 1_767_268_800_000_i64, "isActivated": true }).to_string(),
        )
        .unwrap();

    assert_eq!(h.gate().mount().await, MountOutcome::Verified);
    assert_eq!(h.bridge.count("is_license_activated"), 1);
}

// ── One verification per process ────────────────────────────────────

#[tokio::test]
async fn concurrent_mounts_verify_once() {
    let h = Harness::new();
    h.script_not_activated();

    let a = h.gate();
    let b = h.gate();
    let (oa, ob) = tokio::join!(a.mount(), b.mount());

    let mut outcomes = [oa, ob];
    outcomes.sort_by_key(|o| o.to_string());
    assert_eq!(
        outcomes,
        [MountOutcome::AlreadyVerified, MountOutcome::Verified]
    );
    assert_eq!(h.bridge.count("is_license_activated"), 1);
    assert_eq!(a.view(), b.view());
}

#[tokio::test]
async fn failed_verification_still_counts_as_verified() {
    let h = Harness::new();
    h.bridge
        .fail("is_license_activated", ErrorKind::Network, "Sem conexão");

    let gate = h.gate();
    assert_eq!(gate.mount().await, MountOutcome::Verified);
    assert_eq!(
        gate.view(),
        GateView::VerificationFailed {
            error: "Sem conexão".into()
        }
    );
    assert!(h.stored().is_none(), "failures are not cached");

    let again = h.gate();
    assert_eq!(again.mount().await, MountOutcome::AlreadyVerified);
    assert_eq!(again.view(), gate.view());
    assert_eq!(h.bridge.total(), 1);
}

#[tokio::test]
async fn check_failure_clears_activation_and_keeps_cache() {
    let h = Harness::new();
    h.script_valid_license();
    let gate = h.gate();
    gate.mount().await;
    let before = h.stored().unwrap();

    h.bridge
        .fail("validate_current_license", ErrorKind::Expired, "Licença expirada");
    let state = gate.check_activation_status().await;

    assert!(!state.is_activated);
    assert_eq!(state.error.as_deref(), Some("Licença expirada"));
    assert!(!state.loading);
    assert_eq!(h.stored().unwrap(), before);
}

#[tokio::test]
async fn untyped_failure_gets_operation_prefix() {
    let h = Harness::new();
    let gate = h.gate();
    h.bridge
        .fail("is_license_activated", ErrorKind::Unknown, "");
    let state = gate.check_activation_status().await;
    assert_eq!(
        state.error.as_deref(),
        Some("License check failed: is_license_activated failed (unknown)")
    );
}

// ── Activation ──────────────────────────────────────────────────────

#[tokio::test]
async fn empty_key_fails_without_backend_call() {
    let h = Harness::new();
    let gate = h.gate();

    let err = gate.activate_license(&key("   ")).await.unwrap_err();
    assert!(matches!(err, CoreError::EmptyLicenseKey));
    assert_eq!(h.bridge.total(), 0);
    assert!(gate.state().error.is_some());
}

#[tokio::test]
async fn activation_trims_key_reverifies_and_clears_cache() {
    let h = Harness::new();
    h.script_not_activated();
    let gate = h.gate();
    gate.mount().await;
    assert_eq!(gate.view(), GateView::ActivationRequired);

    h.bridge
        .respond("activate_license", json!("Produto ativado com sucesso!"));
    h.script_valid_license();

    let message = gate
        .activate_license(&key("  ABCDE-FGHIJ-KLMNO-PQRST \n"))
        .await
        .unwrap();

    assert_eq!(message, "Produto ativado com sucesso!");
    assert_eq!(
        h.bridge.args("activate_license"),
        vec![json!({ "licenseKey": "ABCDE-FGHIJ-KLMNO-PQRST" })]
    );
    // Exactly one re-verification.
    assert_eq!(h.bridge.count("is_license_activated"), 2);
    assert!(h.stored().is_none(), "cache must be invalidated");

    let state = gate.state();
    assert!(state.activation_override);
    assert!(gate.can_use_app());
    assert!(gate.view().is_open());

    // A fresh mount in the same run reuses the re-verified result.
    let other = h.gate();
    assert_eq!(other.mount().await, MountOutcome::AlreadyVerified);
    assert!(other.can_use_app());
    assert_eq!(h.bridge.count("is_license_activated"), 2);
}

#[tokio::test]
async fn activation_after_restart_is_not_cache_served() {
    let mut h = Harness::new();
    h.script_valid_license();
    h.bridge.respond("activate_license", json!("ok"));

    let gate = h.gate();
    gate.mount().await;
    gate.activate_license(&key("ABCDE-1")).await.unwrap();

    h.restart();
    assert_eq!(h.gate().mount().await, MountOutcome::Verified);
}

#[tokio::test]
async fn rejected_key_records_backend_message() {
    let h = Harness::new();
    h.script_not_activated();
    h.bridge.fail(
        "activate_license",
        ErrorKind::InvalidKey,
        "Chave de licença inválida",
    );
    let gate = h.gate();
    gate.mount().await;

    let err = gate.activate_license(&key("WRONG")).await.unwrap_err();
    assert_eq!(err.backend_kind(), Some(ErrorKind::InvalidKey));

    let state = gate.state();
    assert_eq!(state.error.as_deref(), Some("Chave de licença inválida"));
    assert!(!state.activation_override);
    assert!(!state.loading);
    assert_eq!(h.bridge.count("is_license_activated"), 1);

    gate.clear_error();
    assert_eq!(gate.state().error, None);
}

// ── Renewal / deactivation ──────────────────────────────────────────

#[tokio::test]
async fn renewal_reverifies_and_clears_cache() {
    let h = Harness::new();
    h.script_valid_license();
    h.bridge.respond("renew_license", json!("Licença renovada"));
    let gate = h.gate();
    gate.mount().await;
    assert!(h.stored().is_some());

    assert_eq!(gate.renew_license().await.unwrap(), "Licença renovada");
    assert_eq!(h.bridge.count("is_license_activated"), 2);
    assert!(h.stored().is_none());
    assert!(!gate.state().activation_override);
}

#[tokio::test]
async fn renewal_failure_without_message_is_not_blank() {
    let h = Harness::new();
    h.script_valid_license();
    h.bridge.fail("renew_license", ErrorKind::Unknown, "");
    let gate = h.gate();
    gate.mount().await;

    let err = gate.renew_license().await.unwrap_err();
    assert_eq!(err.to_string(), "renew_license failed (unknown)");
    assert_eq!(
        gate.state().error.as_deref(),
        Some("Renewal failed: renew_license failed (unknown)")
    );
    assert!(gate.can_use_app());
}

#[tokio::test]
async fn deactivation_clears_state_cache_and_session() {
    let h = Harness::new();
    h.script_valid_license();
    h.bridge.respond("activate_license", json!("ok"));
    h.bridge.respond("deactivate_license", json!("Licença desativada"));

    let gate = h.gate();
    gate.mount().await;
    gate.activate_license(&key("ABCDE-1")).await.unwrap();
    h.gate().mount().await;
    assert!(h.stored().is_none());
    // Re-seed the cache so deletion is observable.
    gate.check_activation_status().await;
    assert!(h.stored().is_some());

    assert_eq!(
        gate.deactivate_license().await.unwrap(),
        "Licença desativada"
    );

    let state = gate.state();
    assert!(!state.is_activated);
    assert_eq!(state.license_status, None);
    assert_eq!(state.license_info, None);
    assert!(!state.activation_override);
    assert!(h.stored().is_none());
    assert!(!h.session.is_verified().await);

    // The next mount verifies exactly once.
    h.script_not_activated();
    let calls = h.bridge.count("is_license_activated");
    let next = h.gate();
    assert_eq!(next.mount().await, MountOutcome::Verified);
    assert_eq!(h.gate().mount().await, MountOutcome::AlreadyVerified);
    assert_eq!(h.bridge.count("is_license_activated"), calls + 1);
    assert_eq!(next.view(), GateView::ActivationRequired);
}

#[tokio::test]
async fn failed_deactivation_keeps_license() {
    let h = Harness::new();
    h.script_valid_license();
    h.bridge
        .fail("deactivate_license", ErrorKind::Network, "Sem conexão");
    let gate = h.gate();
    gate.mount().await;

    assert!(gate.deactivate_license().await.is_err());
    assert!(gate.state().is_activated);
    assert!(h.stored().is_some());
    assert_eq!(gate.state().error.as_deref(), Some("Sem conexão"));
}

// ── Point reads ─────────────────────────────────────────────────────

#[tokio::test]
async fn point_reads_update_state_but_not_cache() {
    let h = Harness::new();
    h.script_valid_license();
    let gate = h.gate();
    gate.mount().await;
    let before = h.stored().unwrap();

    h.bridge.respond(
        "validate_current_license",
        json!({
            "is_valid": true,
            "status": "near_expiration",
            "message": "Expira em 3 dias",
            "days_remaining": 3
        }),
    );
    h.clock.advance(TimeDelta::seconds(30));

    let status = gate.validate_license().await.unwrap();
    assert_eq!(status.status, LicenseState::NearExpiration);
    assert_eq!(
        gate.view(),
        GateView::Open {
            expiry_warning: Some(3),
            can_deactivate: true
        }
    );

    let info = gate.get_license_info().await.unwrap();
    assert_eq!(info.machine_code, "MC-1");
    assert_eq!(h.stored().unwrap(), before);
}

#[tokio::test]
async fn machine_code_passes_through() {
    let h = Harness::new();
    h.bridge.respond("get_machine_code", json!("ABCD-1234"));
    assert_eq!(h.gate().get_machine_code().await.unwrap(), "ABCD-1234");
}

#[tokio::test]
async fn state_changes_are_published() {
    let h = Harness::new();
    h.script_valid_license();
    let gate = h.gate();
    let mut rx = gate.subscribe();
    assert!(rx.borrow().loading);

    gate.mount().await;

    assert!(rx.has_changed().unwrap());
    let state = rx.borrow_and_update().clone();
    assert!(!state.loading);
    assert!(state.can_use_app());
}
