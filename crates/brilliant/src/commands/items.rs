//! Item command handlers.

use tabled::Tabled;

use brilliant_core::{App, Attribute, EditAttribute, EditItem, Item, NewItem, SavedItem};

use crate::cli::{GlobalOpts, ItemsArgs, ItemsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Image")]
    image: String,
}

impl From<&Item> for ItemRow {
    fn from(i: &Item) -> Self {
        Self {
            id: i.id.clone(),
            code: i.code.clone(),
            description: i.description.clone(),
            image: i.image_path.clone(),
        }
    }
}

fn detail(i: &Item) -> String {
    output::detail_lines(&[
        ("ID", i.id.clone()),
        ("Code", i.code.clone()),
        ("Description", i.description.clone()),
        ("Section", i.section_id.clone()),
        ("Image", i.image_path.clone()),
    ])
}

fn saved_detail(c: &SavedItem) -> String {
    let mut pairs = vec![
        ("Code", c.fields.code.clone()),
        ("Section", c.fields.section_id.clone()),
        ("Image", c.fields.image_path.clone()),
    ];
    for info in &c.infos {
        pairs.push(("Info", format!("{} = {}", info.name, info.details)));
    }
    for id in &c.removed {
        pairs.push(("Removed", id.clone()));
    }
    output::detail_lines(&pairs)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(app: &App, args: ItemsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (catalog, _) = app.open_catalog().await?;

    match args.command {
        ItemsCommand::List { section } => {
            let section = catalog.section_by_name(&section).await?;
            let items = catalog.items(&section.id).await?;
            let out = output::render_list(&global.output, &items, |i| ItemRow::from(i), |i| i.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ItemsCommand::Get { id } => {
            let item = catalog.item(&id).await?;
            let out = output::render_single(&global.output, &item, detail, |i| i.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ItemsCommand::Create {
            code,
            section,
            image,
            description,
            infos,
        } => {
            let form = NewItem {
                code,
                description,
                section,
                image: util::read_image(&image)?,
                attributes: infos
                    .into_iter()
                    .map(|(name, value)| Attribute { name, value })
                    .collect(),
            };
            let pb = output::spinner(global, "Creating item...");
            let result = catalog.create_item(&form).await;
            pb.finish_and_clear();
            let created = result?;

            let out = output::render_single(&global.output, &created, saved_detail, |c| {
                c.fields.code.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ItemsCommand::Update {
            id,
            code,
            section,
            image,
            description,
            infos,
            edits,
            removed,
        } => {
            let current = catalog.item(&id).await?;
            let section = match section {
                Some(name) => name,
                None => catalog.section(&current.section_id).await?.name,
            };
            let attributes = edits
                .into_iter()
                .map(|(id, name, value)| EditAttribute {
                    id: Some(id),
                    name,
                    value,
                })
                .chain(infos.into_iter().map(|(name, value)| EditAttribute {
                    id: None,
                    name,
                    value,
                }))
                .collect();
            let form = EditItem {
                code: code.unwrap_or(current.code),
                description: description.unwrap_or(current.description),
                section,
                image: image.as_deref().map(util::read_image).transpose()?,
                attributes,
                removed,
            };

            let pb = output::spinner(global, "Updating item...");
            let result = catalog.edit_item(&id, &form).await;
            pb.finish_and_clear();
            let saved = result?;

            let out = output::render_single(&global.output, &saved, saved_detail, |c| {
                c.fields.code.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ItemsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete item '{id}'?"), global.yes)? {
                return Ok(());
            }
            catalog.delete_item(&id).await?;
            if !global.quiet {
                eprintln!("Item deleted");
            }
            Ok(())
        }
    }
}
