//! License gate, verification cache and catalog services for Brilliant.
//!
//! Sits between `brilliant-bridge` and front-ends (the CLI):
//!
//! - **[`LicenseGate`]**: one mount's license state. [`mount()`](LicenseGate::mount)
//!   reuses a fresh persisted record, otherwise verifies against the backend
//!   once per process through the shared [`VerificationSession`]. State
//!   changes are published on a `tokio::sync::watch` channel.
//!
//! - **[`TtlCache`]**: single-slot cache over a [`KeyValueStore`], stamped
//!   by an injectable [`Clock`]. Entries older than the TTL, dated in the
//!   future, or unreadable are deleted on read.
//!
//! - **[`GateView`]**: what a front-end shows for a [`GateState`]: the
//!   verifying screen, a verification error, the activation form, or the
//!   open application with an optional expiry warning.
//!
//! - **[`Catalog`]**: section, item and info operations with form
//!   validation applied before the backend is called.
//!
//! - **[`Settings`]**: the user profile and its image; [`Updater`] wraps the
//!   backend's update check.
//!
//! - **[`App`]**: wires bridge, store, clock and session together.

pub mod app;
pub mod cache;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod license;
pub mod settings;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use app::App;
pub use cache::{CacheEntry, CacheMiss, TtlCache};
pub use catalog::{
    Attribute, Catalog, CatalogSummary, EditAttribute, EditItem, NewItem, SavedItem,
    normalize_section_name,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, BackendConfig, GateConfig};
pub use error::CoreError;
pub use license::{
    GateState, GateView, LicenseGate, LicenseVerificationRecord, MountOutcome, SessionResult,
    StoredVerification, VerificationSession,
};
pub use settings::{MAX_PROFILE_IMAGE_BYTES, Settings, SettingsPatch, Updater, image_format};
pub use store::{FileStore, KeyValueStore, MemoryStore};

// Wire types callers need alongside the core API.
pub use brilliant_bridge::{
    CommandBridge, ErrorKind, HttpBridge, Info, Item, ItemFields, LicenseInfo, LicenseState,
    LicenseStatus, Section, UserSettings,
};
