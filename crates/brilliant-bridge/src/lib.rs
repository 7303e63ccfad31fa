//! Async client for the Brilliant backend's command bridge.
//!
//! The desktop backend exposes every operation as a named command taking a
//! JSON object of arguments. This crate provides:
//!
//! - **[`CommandBridge`]**: the transport seam. [`HttpBridge`] speaks the
//!   JSON envelope over HTTP; tests plug in scripted implementations.
//! - **[`LicenseClient`]**: typed wrappers for activation, validation,
//!   renewal and deactivation.
//! - **[`CatalogClient`]**: typed wrappers for sections, items, infos and
//!   image upload.
//! - **[`SettingsClient`]**: the user profile and its image.
//! - **[`UpdateClient`]**: the backend's update check and installer.
//! - **[`Error`]**: a structured error channel: backend failures carry a
//!   machine-readable [`ErrorKind`] plus the backend's own message.

pub mod bridge;
pub mod catalog;
pub mod error;
pub mod http;
pub mod license;
pub mod settings;
pub mod transport;
pub mod update;

pub use bridge::{CommandBridge, invoke, no_args};
pub use catalog::{CatalogClient, Info, Item, ItemFields, Section};
pub use error::{Error, ErrorKind};
pub use http::HttpBridge;
pub use license::{LicenseClient, LicenseInfo, LicenseState, LicenseStatus};
pub use settings::{SettingsClient, UserSettings};
pub use transport::TransportConfig;
pub use update::UpdateClient;
