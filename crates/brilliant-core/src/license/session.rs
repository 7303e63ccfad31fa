// ── Process-lifetime verification context ──
//
// Created once at startup and shared by every gate mount. Holds whether
// the real backend verification already ran this process, and what it
// produced.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use super::record::LicenseVerificationRecord;

/// Result of the most recent verification this process performed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionResult {
    pub record: LicenseVerificationRecord,
    /// Normalized error message when the verification failed.
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub(crate) struct SessionInner {
    pub(crate) verified: bool,
    pub(crate) last: Option<SessionResult>,
}

/// Shared, clonable handle to the process's verification state.
///
/// The lock serializes mounts, so concurrent gates never run the backend
/// verification twice.
#[derive(Debug, Clone, Default)]
pub struct VerificationSession {
    inner: Arc<Mutex<SessionInner>>,
}

impl VerificationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a verification (real or cache-served) already happened.
    pub async fn is_verified(&self) -> bool {
        self.inner.lock().await.verified
    }

    pub async fn last_result(&self) -> Option<SessionResult> {
        self.inner.lock().await.last.clone()
    }

    /// Forget everything; the next mount verifies against the backend.
    pub async fn reset(&self) {
        let mut inner = self.inner.lock().await;
        inner.verified = false;
        inner.last = None;
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().await
    }
}
