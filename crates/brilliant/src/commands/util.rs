//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use secrecy::SecretString;

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Take the license key from the argument, or prompt without echo.
pub fn license_key(arg: Option<String>) -> Result<SecretString, CliError> {
    if let Some(key) = arg {
        return Ok(SecretString::from(key));
    }
    let key = rpassword::prompt_password("License key: ")?;
    Ok(SecretString::from(key))
}

/// Read an image file for upload.
pub fn read_image(path: &Path) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|e| CliError::Validation {
        field: "image".into(),
        reason: format!("cannot read {}: {e}", path.display()),
    })
}

pub fn yes_no(v: bool) -> String {
    if v { "yes" } else { "no" }.into()
}
