//! Catalog-wide query handlers.

use brilliant_core::{App, CatalogSummary};

use crate::cli::{CatalogArgs, CatalogCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

fn summary_detail(s: &CatalogSummary) -> String {
    output::detail_lines(&[
        ("Sections", util::yes_no(s.has_sections)),
        ("Items", util::yes_no(s.has_items)),
    ])
}

pub async fn handle(app: &App, args: CatalogArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (catalog, _) = app.open_catalog().await?;

    match args.command {
        CatalogCommand::Summary => {
            let summary = catalog.summary().await?;
            let out = output::render_single(&global.output, &summary, summary_detail, |s| {
                if s.has_items {
                    "items".into()
                } else if s.has_sections {
                    "sections".into()
                } else {
                    "empty".into()
                }
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
