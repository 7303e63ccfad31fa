use brilliant_bridge::{LicenseInfo, LicenseStatus};
use serde::Serialize;

use super::record::LicenseVerificationRecord;
use super::view::GateView;

/// In-memory license state of one gate, published on every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateState {
    pub is_activated: bool,
    pub license_status: Option<LicenseStatus>,
    pub license_info: Option<LicenseInfo>,
    /// A backend round-trip is in flight.
    pub loading: bool,
    /// Normalized message of the last failed operation.
    pub error: Option<String>,
    /// The verification step for this mount has completed.
    pub already_verified: bool,
    /// Set by a successful activation; opens the gate before the next
    /// verification settles.
    pub activation_override: bool,
}

impl Default for GateState {
    fn default() -> Self {
        Self {
            is_activated: false,
            license_status: None,
            license_info: None,
            loading: true,
            error: None,
            already_verified: false,
            activation_override: false,
        }
    }
}

impl GateState {
    /// `is_activated && license_status.is_valid`.
    pub fn can_use_app(&self) -> bool {
        self.is_activated
            && self
                .license_status
                .as_ref()
                .is_some_and(|status| status.is_valid)
    }

    pub fn view(&self) -> GateView {
        GateView::resolve(self)
    }

    pub(crate) fn adopt(&mut self, record: &LicenseVerificationRecord) {
        self.is_activated = record.is_activated;
        self.license_status.clone_from(&record.license_status);
        self.license_info.clone_from(&record.license_info);
    }

    pub(crate) fn clear_license(&mut self) {
        self.is_activated = false;
        self.license_status = None;
        self.license_info = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brilliant_bridge::LicenseState;

    fn status(is_valid: bool) -> LicenseStatus {
        LicenseStatus {
            is_valid,
            status: if is_valid {
                LicenseState::Valid
            } else {
                LicenseState::Expired
            },
            message: String::new(),
            days_remaining: None,
        }
    }

    #[test]
    fn can_use_app_truth_table() {
        let cases = [
            (false, None, false),
            (false, Some(true), false),
            (false, Some(false), false),
            (true, None, false),
            (true, Some(false), false),
            (true, Some(true), true),
        ];
        for (is_activated, valid, expected) in cases {
            let state = GateState {
                is_activated,
                license_status: valid.map(status),
                ..GateState::default()
            };
            assert_eq!(
                state.can_use_app(),
                expected,
                "is_activated={is_activated} valid={valid:?}"
            );
        }
    }

    #[test]
    fn starts_loading() {
        let state = GateState::default();
        assert!(state.loading);
        assert!(!state.already_verified);
        assert!(!state.can_use_app());
    }
}
