//! Application update handlers.

use brilliant_core::App;

use crate::cli::{GlobalOpts, UpdateArgs, UpdateCommand};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(app: &App, args: UpdateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    app.require_license().await?;
    let updater = app.updater();

    match args.command {
        UpdateCommand::Check => {
            let pb = output::spinner(global, "Checking for updates...");
            let result = updater.check().await;
            pb.finish_and_clear();

            match result? {
                Some(version) => println!("{version}"),
                None => {
                    if !global.quiet {
                        eprintln!("Already up to date");
                    }
                }
            }
            Ok(())
        }

        UpdateCommand::Install => {
            let Some(version) = updater.check().await? else {
                if !global.quiet {
                    eprintln!("Already up to date");
                }
                return Ok(());
            };
            if !util::confirm(&format!("Install version {version}?"), global.yes)? {
                return Ok(());
            }

            let pb = output::spinner(global, "Installing update...");
            let result = updater.install().await;
            pb.finish_and_clear();
            result?;

            if !global.quiet {
                eprintln!("Version {version} installed; restart the backend to use it");
            }
            Ok(())
        }
    }
}
