// License commands
//
// Thin typed wrappers over the backend's licensing operations. No policy
// lives here; caching and gating are the core crate's concern.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::bridge::{CommandBridge, invoke, no_args};
use crate::error::Error;

/// Backend command names for the licensing surface.
pub mod commands {
    pub const IS_LICENSE_ACTIVATED: &str = "is_license_activated";
    pub const VALIDATE_CURRENT_LICENSE: &str = "validate_current_license";
    pub const GET_LICENSE_INFO: &str = "get_license_info";
    pub const ACTIVATE_LICENSE: &str = "activate_license";
    pub const RENEW_LICENSE: &str = "renew_license";
    pub const DEACTIVATE_LICENSE: &str = "deactivate_license";
    pub const GET_MACHINE_CODE: &str = "get_machine_code";
}

/// Validity category reported by `validate_current_license`.
///
/// Statuses this client does not know about are kept verbatim in
/// [`LicenseState::Other`] so they survive a cache round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LicenseState {
    Valid,
    NearExpiration,
    Expired,
    NotActivated,
    OfflineExpired,
    Other(String),
}

impl LicenseState {
    /// The backend's snake_case spelling.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Valid => "valid",
            Self::NearExpiration => "near_expiration",
            Self::Expired => "expired",
            Self::NotActivated => "not_activated",
            Self::OfflineExpired => "offline_expired",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for LicenseState {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "valid" => Self::Valid,
            "near_expiration" => Self::NearExpiration,
            "expired" => Self::Expired,
            "not_activated" => Self::NotActivated,
            "offline_expired" => Self::OfflineExpired,
            _ => Self::Other(raw),
        }
    }
}

impl From<LicenseState> for String {
    fn from(state: LicenseState) -> Self {
        match state {
            LicenseState::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for LicenseState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of `validate_current_license`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseStatus {
    pub is_valid: bool,
    pub status: LicenseState,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_remaining: Option<i64>,
}

impl LicenseStatus {
    /// Days left when the backend flagged the license as close to expiry.
    pub fn near_expiration_days(&self) -> Option<i64> {
        match (&self.status, self.days_remaining) {
            (LicenseState::NearExpiration, Some(days)) => Some(days),
            _ => None,
        }
    }
}

/// Result of `get_license_info`.
///
/// Dates are kept exactly as the backend formats them
/// (`YYYY-MM-DD HH:MM:SS UTC`); they are display values only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseInfo {
    pub key: String,
    pub machine_code: String,
    pub expires: String,
    pub product_id: String,
    pub premium: bool,
    pub max_offline_days: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activation: Option<String>,
    pub days_until_expiry: i64,
}

impl LicenseInfo {
    /// The license key with everything but its edges hidden.
    pub fn masked_key(&self) -> String {
        let chars: Vec<char> = self.key.chars().collect();
        if chars.len() <= 9 {
            return "*".repeat(chars.len());
        }
        chars
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if i < 5 || i >= chars.len() - 4 || *c == '-' {
                    *c
                } else {
                    '*'
                }
            })
            .collect()
    }
}

/// Typed client for the licensing commands.
#[derive(Debug, Clone)]
pub struct LicenseClient<B> {
    bridge: B,
}

impl<B: CommandBridge> LicenseClient<B> {
    pub fn new(bridge: B) -> Self {
        Self { bridge }
    }

    /// The underlying bridge.
    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    /// Whether a license key is currently bound to this installation.
    pub async fn is_license_activated(&self) -> Result<bool, Error> {
        debug!("checking activation");
        invoke(&self.bridge, commands::IS_LICENSE_ACTIVATED, no_args()).await
    }

    pub async fn validate_current_license(&self) -> Result<LicenseStatus, Error> {
        invoke(&self.bridge, commands::VALIDATE_CURRENT_LICENSE, no_args()).await
    }

    pub async fn get_license_info(&self) -> Result<LicenseInfo, Error> {
        invoke(&self.bridge, commands::GET_LICENSE_INFO, no_args()).await
    }

    /// Bind `license_key` to this machine. Returns the backend's success message.
    pub async fn activate_license(&self, license_key: &str) -> Result<String, Error> {
        debug!("activating license");
        invoke(
            &self.bridge,
            commands::ACTIVATE_LICENSE,
            json!({ "licenseKey": license_key }),
        )
        .await
    }

    pub async fn renew_license(&self) -> Result<String, Error> {
        invoke(&self.bridge, commands::RENEW_LICENSE, no_args()).await
    }

    pub async fn deactivate_license(&self) -> Result<String, Error> {
        invoke(&self.bridge, commands::DEACTIVATE_LICENSE, no_args()).await
    }

    pub async fn get_machine_code(&self) -> Result<String, Error> {
        invoke(&self.bridge, commands::GET_MACHINE_CODE, no_args()).await
    }
}
