// Updater commands
//
// The backend owns the update channel; the client only asks whether a newer
// version exists and tells the backend to install it.

use tracing::info;

use crate::bridge::{CommandBridge, invoke, no_args};
use crate::error::Error;

/// Backend command names for the updater.
pub mod commands {
    pub const CHECK_FOR_UPDATE: &str = "check_for_update";
    pub const DOWNLOAD_AND_INSTALL_UPDATE: &str = "download_and_install_update";
}

/// Typed client for the updater commands.
#[derive(Debug, Clone)]
pub struct UpdateClient<B> {
    bridge: B,
}

impl<B: CommandBridge> UpdateClient<B> {
    pub fn new(bridge: B) -> Self {
        Self { bridge }
    }

    /// The newer version on offer, if any.
    pub async fn check_for_update(&self) -> Result<Option<String>, Error> {
        invoke(&self.bridge, commands::CHECK_FOR_UPDATE, no_args()).await
    }

    /// Download and install the pending update. A backend with nothing to
    /// install succeeds without doing anything.
    pub async fn download_and_install_update(&self) -> Result<(), Error> {
        info!("requesting update install");
        invoke(
            &self.bridge,
            commands::DOWNLOAD_AND_INSTALL_UPDATE,
            no_args(),
        )
        .await
    }
}
