//! Section command handlers.

use tabled::Tabled;

use brilliant_core::{App, Section};

use crate::cli::{GlobalOpts, SectionsArgs, SectionsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SectionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
}

impl From<&Section> for SectionRow {
    fn from(s: &Section) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
        }
    }
}

fn detail(s: &Section) -> String {
    output::detail_lines(&[("ID", s.id.clone()), ("Name", s.name.clone())])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(app: &App, args: SectionsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (catalog, _) = app.open_catalog().await?;

    match args.command {
        SectionsCommand::List => {
            let sections = catalog.sections().await?;
            let out = output::render_list(
                &global.output,
                &sections,
                |s| SectionRow::from(s),
                |s| s.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SectionsCommand::Get { id } => {
            let section = catalog.section(&id).await?;
            let out = output::render_single(&global.output, &section, detail, |s| s.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SectionsCommand::Create { name } => {
            let name = catalog.create_section(&name).await?;
            if !global.quiet {
                eprintln!("Section '{name}' created");
            }
            Ok(())
        }

        SectionsCommand::Rename { id, name } => {
            let name = catalog.rename_section(&id, &name).await?;
            if !global.quiet {
                eprintln!("Section renamed to '{name}'");
            }
            Ok(())
        }

        SectionsCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete section '{id}'? Its items stay in the backend."),
                global.yes,
            )? {
                return Ok(());
            }
            catalog.delete_section(&id).await?;
            if !global.quiet {
                eprintln!("Section deleted");
            }
            Ok(())
        }
    }
}
