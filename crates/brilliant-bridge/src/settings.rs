// Settings commands
//
// One user profile per installation: contact details shown on exported
// catalogs, the color palette, and a profile image stored as a blob.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::bridge::{CommandBridge, invoke, no_args};
use crate::error::Error;

/// Backend command names for the settings surface.
pub mod commands {
    pub const GET_SETTINGS: &str = "get_settings";
    pub const SAVE_SETTINGS: &str = "save_settings_command";
    pub const SAVE_PALETTE: &str = "save_palette";
    pub const SAVE_USER_IMAGE: &str = "save_user_image";
    pub const GET_USER_IMAGE: &str = "get_user_image";
}

/// The stored user profile, as `get_settings` returns it.
///
/// `save_settings_command` writes every column, `image_blob` included, so a
/// profile must be saved back with the blob it was read with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    pub id: i32,
    pub name: String,
    pub save_path: String,
    pub instagram_username: String,
    pub website_url: String,
    pub youtube_channel: String,
    /// Legacy file path; the image itself lives in `image_blob`.
    pub image_path: String,
    #[serde(default)]
    pub image_blob: Option<Vec<u8>>,
    pub pallet: String,
    pub phone_number: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Typed client for the settings commands.
#[derive(Debug, Clone)]
pub struct SettingsClient<B> {
    bridge: B,
}

impl<B: CommandBridge> SettingsClient<B> {
    pub fn new(bridge: B) -> Self {
        Self { bridge }
    }

    pub async fn get_settings(&self) -> Result<UserSettings, Error> {
        invoke(&self.bridge, commands::GET_SETTINGS, no_args()).await
    }

    pub async fn save_settings(&self, settings: &UserSettings) -> Result<(), Error> {
        debug!(id = settings.id, "saving settings");
        invoke(
            &self.bridge,
            commands::SAVE_SETTINGS,
            json!({ "settings": settings }),
        )
        .await
    }

    pub async fn save_palette(&self, palette_id: &str) -> Result<(), Error> {
        invoke(
            &self.bridge,
            commands::SAVE_PALETTE,
            json!({ "paletteId": palette_id }),
        )
        .await
    }

    /// Replace the profile image. An empty slice clears it.
    pub async fn save_user_image(&self, image: &[u8]) -> Result<(), Error> {
        debug!(bytes = image.len(), "uploading profile image");
        invoke(
            &self.bridge,
            commands::SAVE_USER_IMAGE,
            json!({ "imageData": image }),
        )
        .await
    }

    pub async fn get_user_image(&self) -> Result<Option<Vec<u8>>, Error> {
        invoke(&self.bridge, commands::GET_USER_IMAGE, no_args()).await
    }
}
