//! Item attribute handlers.

use tabled::Tabled;

use brilliant_core::{App, Info};

use crate::cli::{GlobalOpts, InfosArgs, InfosCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct InfoRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Value")]
    details: String,
    #[tabled(rename = "ID")]
    id: String,
}

impl From<&Info> for InfoRow {
    fn from(i: &Info) -> Self {
        Self {
            name: i.name.clone(),
            details: i.details.clone(),
            id: i.id.clone(),
        }
    }
}

pub async fn handle(app: &App, args: InfosArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (catalog, _) = app.open_catalog().await?;

    match args.command {
        InfosCommand::List { code } => {
            let infos = catalog.infos(&code).await?;
            let out = output::render_list(&global.output, &infos, |i| InfoRow::from(i), |i| {
                format!("{}={}", i.name, i.details)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        InfosCommand::Update {
            id,
            item,
            info: (name, details),
        } => {
            let info = Info {
                id,
                item_code: item.trim().to_owned(),
                name,
                details,
            };
            catalog.update_info(&info).await?;
            if !global.quiet {
                eprintln!("Attribute '{}' updated", info.name);
            }
            Ok(())
        }

        InfosCommand::Delete { id } => {
            if !util::confirm(&format!("Delete attribute '{id}'?"), global.yes)? {
                return Ok(());
            }
            catalog.delete_info(&id).await?;
            if !global.quiet {
                eprintln!("Attribute deleted");
            }
            Ok(())
        }
    }
}
