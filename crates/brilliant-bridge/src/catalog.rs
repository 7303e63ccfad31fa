// Catalog commands
//
// Sections group items; items carry a code, a description and an image;
// infos are free-form name/details attributes keyed by item code.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::bridge::{CommandBridge, invoke, no_args, to_args};
use crate::error::Error;

/// Backend command names for the catalog surface.
pub mod commands {
    pub const LIST_SECTIONS: &str = "list_sections";
    pub const GET_SECTION: &str = "get_section";
    pub const GET_SECTION_BY_NAME: &str = "get_section_by_name";
    pub const CREATE_SECTION: &str = "create_section";
    pub const UPDATE_SECTION: &str = "update_section";
    pub const DELETE_SECTION: &str = "delete_section";
    pub const HAS_SECTIONS: &str = "has_sections";

    pub const LIST_ITEMS: &str = "list_items";
    pub const GET_ITEM: &str = "get_item";
    pub const CREATE_ITEM: &str = "create_item";
    pub const UPDATE_ITEM: &str = "update_item";
    pub const DELETE_ITEM: &str = "delete_item";
    pub const HAS_ITEMS: &str = "has_items";

    pub const LIST_INFOS: &str = "list_infos";
    pub const CREATE_INFO: &str = "create_info";
    pub const UPDATE_INFO: &str = "update_info";
    pub const DELETE_INFO: &str = "delete_info";

    pub const SAVE_IMAGE: &str = "save_image";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub code: String,
    pub description: String,
    pub section_id: String,
    /// Backend-relative path, e.g. `./images/123.jpg`.
    pub image_path: String,
}

/// A single name/details attribute attached to an item code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    pub id: String,
    pub item_code: String,
    pub name: String,
    pub details: String,
}

/// Arguments shared by `create_item` and `update_item`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFields {
    pub code: String,
    pub description: String,
    pub section_id: String,
    pub image_path: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateItemArgs<'a> {
    id: &'a str,
    #[serde(flatten)]
    fields: &'a ItemFields,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InfoArgs<'a> {
    id: &'a str,
    item_code: &'a str,
    name: &'a str,
    details: &'a str,
}

impl<'a> From<&'a Info> for InfoArgs<'a> {
    fn from(info: &'a Info) -> Self {
        Self {
            id: &info.id,
            item_code: &info.item_code,
            name: &info.name,
            details: &info.details,
        }
    }
}

/// Typed client for the catalog commands.
#[derive(Debug, Clone)]
pub struct CatalogClient<B> {
    bridge: B,
}

impl<B: CommandBridge> CatalogClient<B> {
    pub fn new(bridge: B) -> Self {
        Self { bridge }
    }

    // ── Sections ─────────────────────────────────────────────────────

    pub async fn list_sections(&self) -> Result<Vec<Section>, Error> {
        invoke(&self.bridge, commands::LIST_SECTIONS, no_args()).await
    }

    pub async fn get_section(&self, id: &str) -> Result<Option<Section>, Error> {
        invoke(&self.bridge, commands::GET_SECTION, json!({ "id": id })).await
    }

    pub async fn get_section_by_name(&self, name: &str) -> Result<Option<Section>, Error> {
        invoke(
            &self.bridge,
            commands::GET_SECTION_BY_NAME,
            json!({ "name": name }),
        )
        .await
    }

    pub async fn create_section(&self, name: &str) -> Result<(), Error> {
        debug!(name, "creating section");
        invoke(&self.bridge, commands::CREATE_SECTION, json!({ "name": name })).await
    }

    /// Rename a section. The backend names the id argument `uuid` here.
    pub async fn update_section(&self, id: &str, name: &str) -> Result<(), Error> {
        invoke(
            &self.bridge,
            commands::UPDATE_SECTION,
            json!({ "uuid": id, "name": name }),
        )
        .await
    }

    pub async fn delete_section(&self, id: &str) -> Result<(), Error> {
        invoke(&self.bridge, commands::DELETE_SECTION, json!({ "id": id })).await
    }

    pub async fn has_sections(&self) -> Result<bool, Error> {
        invoke(&self.bridge, commands::HAS_SECTIONS, no_args()).await
    }

    // ── Items ────────────────────────────────────────────────────────

    pub async fn list_items(&self, section_id: &str) -> Result<Vec<Item>, Error> {
        invoke(
            &self.bridge,
            commands::LIST_ITEMS,
            json!({ "sectionId": section_id }),
        )
        .await
    }

    pub async fn get_item(&self, id: &str) -> Result<Option<Item>, Error> {
        invoke(&self.bridge, commands::GET_ITEM, json!({ "id": id })).await
    }

    pub async fn create_item(&self, fields: &ItemFields) -> Result<(), Error> {
        debug!(code = %fields.code, "creating item");
        invoke(&self.bridge, commands::CREATE_ITEM, to_args(fields)?).await
    }

    pub async fn update_item(&self, id: &str, fields: &ItemFields) -> Result<(), Error> {
        let args = to_args(&UpdateItemArgs { id, fields })?;
        invoke(&self.bridge, commands::UPDATE_ITEM, args).await
    }

    pub async fn delete_item(&self, id: &str) -> Result<(), Error> {
        invoke(&self.bridge, commands::DELETE_ITEM, json!({ "id": id })).await
    }

    pub async fn has_items(&self) -> Result<bool, Error> {
        invoke(&self.bridge, commands::HAS_ITEMS, no_args()).await
    }

    // ── Infos ────────────────────────────────────────────────────────

    pub async fn list_infos(&self, item_code: &str) -> Result<Vec<Info>, Error> {
        invoke(
            &self.bridge,
            commands::LIST_INFOS,
            json!({ "itemCode": item_code }),
        )
        .await
    }

    pub async fn create_info(&self, info: &Info) -> Result<(), Error> {
        invoke(
            &self.bridge,
            commands::CREATE_INFO,
            to_args(&InfoArgs::from(info))?,
        )
        .await
    }

    pub async fn update_info(&self, info: &Info) -> Result<(), Error> {
        invoke(
            &self.bridge,
            commands::UPDATE_INFO,
            to_args(&InfoArgs::from(info))?,
        )
        .await
    }

    pub async fn delete_info(&self, id: &str) -> Result<(), Error> {
        invoke(&self.bridge, commands::DELETE_INFO, json!({ "id": id })).await
    }

    // ── Images ───────────────────────────────────────────────────────

    /// Upload image bytes for an item code. Returns the stored image path.
    ///
    /// The backend expects the bytes as a plain JSON number array.
    pub async fn save_image(&self, image: &[u8], code: &str) -> Result<String, Error> {
        debug!(code, bytes = image.len(), "uploading image");
        invoke(
            &self.bridge,
            commands::SAVE_IMAGE,
            json!({ "image": image, "code": code }),
        )
        .await
    }
}
