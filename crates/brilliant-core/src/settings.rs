// ── Settings service ──
//
// Profile edits and the profile image, validated before the backend sees
// them. Saves always write back the full record read just before.

use brilliant_bridge::{CommandBridge, SettingsClient, UpdateClient, UserSettings};
use tracing::{debug, info};
use url::Url;

use crate::error::CoreError;

/// Largest profile image accepted, in bytes.
pub const MAX_PROFILE_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Fields to change on the profile. `None` keeps the stored value.
///
/// Values are trimmed before saving; an empty string clears the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub instagram_username: Option<String>,
    pub website_url: Option<String>,
    pub youtube_channel: Option<String>,
    pub save_path: Option<String>,
    /// Applied through the palette command, not the profile save.
    pub palette: Option<String>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn touches_profile(&self) -> bool {
        Self {
            palette: None,
            ..self.clone()
        } != Self::default()
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.is_empty() {
            return Err(invalid("settings", "nothing to change"));
        }
        if let Some(email) = self.email.as_deref().map(str::trim) {
            let valid = email.is_empty()
                || email
                    .split_once('@')
                    .is_some_and(|(user, host)| !user.is_empty() && host.contains('.'));
            if !valid {
                return Err(invalid("email", format!("'{email}' is not an email address")));
            }
        }
        if let Some(website) = self.website_url.as_deref().map(str::trim) {
            if !website.is_empty() {
                let url = Url::parse(website)
                    .map_err(|e| invalid("website", format!("'{website}': {e}")))?;
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(invalid("website", "must be an http or https URL"));
                }
            }
        }
        if self
            .palette
            .as_deref()
            .is_some_and(|p| p.trim().is_empty())
        {
            return Err(invalid("palette", "must not be empty"));
        }
        Ok(())
    }

    fn apply(&self, settings: &mut UserSettings) {
        let fields = [
            (&self.name, &mut settings.name),
            (&self.email, &mut settings.email),
            (&self.phone_number, &mut settings.phone_number),
            (&self.instagram_username, &mut settings.instagram_username),
            (&self.website_url, &mut settings.website_url),
            (&self.youtube_channel, &mut settings.youtube_channel),
            (&self.save_path, &mut settings.save_path),
        ];
        for (patch, field) in fields {
            if let Some(value) = patch {
                value.trim().clone_into(field);
            }
        }
    }
}

/// Image formats the profile image may use, by signature.
pub fn image_format(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => Some("png"),
        [0xFF, 0xD8, 0xFF, ..] => Some("jpeg"),
        [b'G', b'I', b'F', b'8', ..] => Some("gif"),
        [b'B', b'M', ..] => Some("bmp"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("webp"),
        _ => None,
    }
}

/// Validated profile operations.
#[derive(Debug, Clone)]
pub struct Settings<B> {
    client: SettingsClient<B>,
}

impl<B: CommandBridge> Settings<B> {
    pub fn new(bridge: B) -> Self {
        Self {
            client: SettingsClient::new(bridge),
        }
    }

    pub async fn get(&self) -> Result<UserSettings, CoreError> {
        Ok(self.client.get_settings().await?)
    }

    /// Apply `patch` to the stored profile and return the saved record.
    pub async fn update(&self, patch: &SettingsPatch) -> Result<UserSettings, CoreError> {
        patch.validate()?;
        let mut settings = self.client.get_settings().await?;

        if patch.touches_profile() {
            patch.apply(&mut settings);
            self.client.save_settings(&settings).await?;
            info!(id = settings.id, "profile saved");
        }
        if let Some(palette) = &patch.palette {
            let palette = palette.trim();
            self.client.save_palette(palette).await?;
            palette.clone_into(&mut settings.pallet);
            info!(palette, "palette saved");
        }
        Ok(settings)
    }

    /// Replace the profile image. Returns the detected format.
    pub async fn set_image(&self, image: &[u8]) -> Result<&'static str, CoreError> {
        if image.is_empty() {
            return Err(invalid("image", "the file is empty"));
        }
        if image.len() > MAX_PROFILE_IMAGE_BYTES {
            return Err(invalid(
                "image",
                format!(
                    "{} bytes exceeds the {MAX_PROFILE_IMAGE_BYTES} byte limit",
                    image.len()
                ),
            ));
        }
        let format = image_format(image)
            .ok_or_else(|| invalid("image", "not a PNG, JPEG, GIF, BMP or WebP image"))?;

        self.client.save_user_image(image).await?;
        debug!(format, bytes = image.len(), "profile image stored");
        Ok(format)
    }

    pub async fn remove_image(&self) -> Result<(), CoreError> {
        self.client.save_user_image(&[]).await?;
        info!("profile image removed");
        Ok(())
    }

    /// The stored profile image. An empty blob counts as none.
    pub async fn image(&self) -> Result<Option<Vec<u8>>, CoreError> {
        Ok(self
            .client
            .get_user_image()
            .await?
            .filter(|bytes| !bytes.is_empty()))
    }
}

/// The backend's updater.
#[derive(Debug, Clone)]
pub struct Updater<B> {
    client: UpdateClient<B>,
}

impl<B: CommandBridge> Updater<B> {
    pub fn new(bridge: B) -> Self {
        Self {
            client: UpdateClient::new(bridge),
        }
    }

    /// The version on offer, if newer than the running one.
    pub async fn check(&self) -> Result<Option<String>, CoreError> {
        let version = self
            .client
            .check_for_update()
            .await?
            .filter(|v| !v.trim().is_empty());
        debug!(?version, "update check");
        Ok(version)
    }

    pub async fn install(&self) -> Result<(), CoreError> {
        Ok(self.client.download_and_install_update().await?)
    }
}

fn invalid(field: &str, message: impl Into<String>) -> CoreError {
    CoreError::ValidationFailed {
        field: field.into(),
        message: message.into(),
    }
}
