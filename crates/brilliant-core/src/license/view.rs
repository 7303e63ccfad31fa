use serde::Serialize;

use super::state::GateState;

/// What the front-end should show for a given license state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum GateView {
    /// First verification still running.
    Verifying,
    /// Verification failed and nothing else lets the user in.
    VerificationFailed { error: String },
    /// No usable license: show the activation form.
    ActivationRequired,
    /// The application is usable.
    Open {
        /// Days left, when the license is close to expiry.
        expiry_warning: Option<i64>,
        can_deactivate: bool,
    },
}

impl GateView {
    pub fn resolve(state: &GateState) -> Self {
        if state.loading && !state.already_verified {
            return Self::Verifying;
        }

        if let Some(error) = &state.error {
            if !state.is_activated && !state.activation_override {
                return Self::VerificationFailed {
                    error: error.clone(),
                };
            }
        }

        if !state.can_use_app() && !state.activation_override {
            return Self::ActivationRequired;
        }

        Self::Open {
            expiry_warning: state
                .license_status
                .as_ref()
                .and_then(brilliant_bridge::LicenseStatus::near_expiration_days)
                .filter(|days| *days != 0),
            can_deactivate: state.is_activated,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }
}
