use brilliant_bridge::{LicenseInfo, LicenseStatus};
use serde::{Deserialize, Serialize};

use crate::cache::CacheEntry;

/// Outcome of one successful verification round-trip.
///
/// Persisted inside a [`CacheEntry`] under the license cache key, which adds
/// the capture `timestamp`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseVerificationRecord {
    pub is_activated: bool,
    #[serde(default)]
    pub license_status: Option<LicenseStatus>,
    #[serde(default)]
    pub license_info: Option<LicenseInfo>,
    #[serde(default)]
    pub already_verified: bool,
}

/// A verification record as it sits in the store.
pub type StoredVerification = CacheEntry<LicenseVerificationRecord>;

impl LicenseVerificationRecord {
    /// `true` only for an activated installation whose status is valid.
    pub fn can_use_app(&self) -> bool {
        self.is_activated
            && self
                .license_status
                .as_ref()
                .is_some_and(|status| status.is_valid)
    }
}
