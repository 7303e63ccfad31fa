//! Command dispatch: CLI args -> gate / catalog calls -> output formatting.

pub mod cache;
pub mod catalog;
pub mod config_cmd;
pub mod infos;
pub mod items;
pub mod license;
pub mod sections;
pub mod settings;
pub mod update;
pub mod util;

use brilliant_core::App;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a backend-bound command to its handler.
pub async fn dispatch(cmd: Command, app: &App, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::License(args) => license::handle(app, args, global).await,
        Command::Cache(args) => cache::handle(app, args, global),
        Command::Sections(args) => sections::handle(app, args, global).await,
        Command::Items(args) => items::handle(app, args, global).await,
        Command::Infos(args) => infos::handle(app, args, global).await,
        Command::Catalog(args) => catalog::handle(app, args, global).await,
        Command::Settings(args) => settings::handle(app, args, global).await,
        Command::Update(args) => update::handle(app, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
