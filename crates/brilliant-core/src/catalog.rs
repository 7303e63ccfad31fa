// ── Catalog service ──
//
// Validated catalog operations over the bridge. Input is checked before any
// backend call; bridge errors come back as `CoreError`.

use brilliant_bridge::{CatalogClient, CommandBridge, Info, Item, ItemFields, Section};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::CoreError;

/// Longest section name accepted, in characters.
pub const MAX_SECTION_NAME_LEN: usize = 50;

/// Trim, bound and lowercase a section name.
pub fn normalize_section_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(invalid("section name", "must not be empty"));
    }
    if trimmed.chars().count() > MAX_SECTION_NAME_LEN {
        return Err(invalid(
            "section name",
            format!("must be at most {MAX_SECTION_NAME_LEN} characters"),
        ));
    }
    Ok(trimmed.to_lowercase())
}

/// One name/value attribute entered alongside a new item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// The "new item" form: everything needed to create an item with its image
/// and attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub code: String,
    pub description: String,
    /// Section *name*, resolved to an id on submit.
    pub section: String,
    pub image: Vec<u8>,
    pub attributes: Vec<Attribute>,
}

impl NewItem {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.code.trim().is_empty() {
            return Err(invalid("code", "must not be empty"));
        }
        if self.section.trim().is_empty() {
            return Err(invalid("section", "must not be empty"));
        }
        if self.image.is_empty() {
            return Err(invalid("image", "an image is required"));
        }
        if self.attributes.is_empty() {
            return Err(invalid("attributes", "at least one attribute is required"));
        }
        for (idx, attr) in self.attributes.iter().enumerate() {
            if attr.name.trim().is_empty() || attr.value.trim().is_empty() {
                return Err(invalid(
                    "attributes",
                    format!("attribute {} needs both a name and a value", idx + 1),
                ));
            }
        }
        Ok(())
    }
}

/// An attribute on the edit form. `id` is set for attributes already stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditAttribute {
    pub id: Option<String>,
    pub name: String,
    pub value: String,
}

/// The "edit item" form.
///
/// Listed attributes with an id are updated, the rest created; `removed`
/// names stored attributes to delete. Attributes not mentioned are left as
/// they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditItem {
    pub code: String,
    pub description: String,
    /// Section *name*, resolved to an id on submit.
    pub section: String,
    /// Replacement image; `None` keeps the stored one.
    pub image: Option<Vec<u8>>,
    pub attributes: Vec<EditAttribute>,
    pub removed: Vec<String>,
}

impl EditItem {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.code.trim().is_empty() {
            return Err(invalid("code", "must not be empty"));
        }
        if self.section.trim().is_empty() {
            return Err(invalid("section", "must not be empty"));
        }
        if self.image.as_ref().is_some_and(Vec::is_empty) {
            return Err(invalid("image", "the replacement image is empty"));
        }
        for (idx, attr) in self.attributes.iter().enumerate() {
            if attr.name.trim().is_empty() || attr.value.trim().is_empty() {
                return Err(invalid(
                    "attributes",
                    format!("attribute {} needs both a name and a value", idx + 1),
                ));
            }
            if attr.id.as_deref().is_some_and(|id| self.removed.iter().any(|r| r == id)) {
                return Err(invalid(
                    "attributes",
                    format!("attribute {} is both edited and removed", idx + 1),
                ));
            }
        }
        if self.removed.iter().any(|id| id.trim().is_empty()) {
            return Err(invalid("removed", "attribute ids must not be empty"));
        }
        Ok(())
    }
}

/// Result of [`Catalog::create_item`] or [`Catalog::edit_item`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedItem {
    pub fields: ItemFields,
    /// Attributes written by this submit.
    pub infos: Vec<Info>,
    /// Attribute ids deleted by this submit.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<String>,
}

/// Whether the catalog has any content yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    pub has_sections: bool,
    pub has_items: bool,
}

/// Validated catalog operations.
#[derive(Debug, Clone)]
pub struct Catalog<B> {
    client: CatalogClient<B>,
}

impl<B: CommandBridge> Catalog<B> {
    pub fn new(bridge: B) -> Self {
        Self {
            client: CatalogClient::new(bridge),
        }
    }

    // ── Sections ─────────────────────────────────────────────────────

    pub async fn sections(&self) -> Result<Vec<Section>, CoreError> {
        Ok(self.client.list_sections().await?)
    }

    pub async fn section(&self, id: &str) -> Result<Section, CoreError> {
        self.client
            .get_section(id)
            .await?
            .ok_or_else(|| not_found("Section", id))
    }

    pub async fn section_by_name(&self, name: &str) -> Result<Section, CoreError> {
        let name = normalize_section_name(name)?;
        self.client
            .get_section_by_name(&name)
            .await?
            .ok_or_else(|| not_found("Section", &name))
    }

    /// Create a section. Returns the stored (normalized) name.
    pub async fn create_section(&self, name: &str) -> Result<String, CoreError> {
        let name = normalize_section_name(name)?;
        if self.client.get_section_by_name(&name).await?.is_some() {
            return Err(invalid("section name", format!("'{name}' already exists")));
        }
        self.client.create_section(&name).await?;
        info!(section = %name, "section created");
        Ok(name)
    }

    pub async fn rename_section(&self, id: &str, name: &str) -> Result<String, CoreError> {
        let name = normalize_section_name(name)?;
        self.section(id).await?;
        self.client.update_section(id, &name).await?;
        info!(id, section = %name, "section renamed");
        Ok(name)
    }

    pub async fn delete_section(&self, id: &str) -> Result<(), CoreError> {
        self.client.delete_section(id).await?;
        info!(id, "section deleted");
        Ok(())
    }

    pub async fn has_sections(&self) -> Result<bool, CoreError> {
        Ok(self.client.has_sections().await?)
    }

    // ── Items ────────────────────────────────────────────────────────

    pub async fn items(&self, section_id: &str) -> Result<Vec<Item>, CoreError> {
        Ok(self.client.list_items(section_id).await?)
    }

    pub async fn item(&self, id: &str) -> Result<Item, CoreError> {
        self.client
            .get_item(id)
            .await?
            .ok_or_else(|| not_found("Item", id))
    }

    /// Submit the new-item form.
    ///
    /// Resolves the section by name, uploads the image, creates the item,
    /// then one info per attribute. A failure part-way leaves the earlier
    /// steps in place.
    pub async fn create_item(&self, form: &NewItem) -> Result<SavedItem, CoreError> {
        form.validate()?;
        let code = form.code.trim();

        let section = self.section_by_name(&form.section).await?;
        let image_path = self.client.save_image(&form.image, code).await?;
        debug!(code, image_path = %image_path, "image stored");

        let fields = ItemFields {
            code: code.to_owned(),
            description: form.description.trim().to_owned(),
            section_id: section.id,
            image_path,
        };
        self.client.create_item(&fields).await?;

        let mut infos = Vec::with_capacity(form.attributes.len());
        for attr in &form.attributes {
            let info = Info {
                id: Uuid::new_v4().to_string(),
                item_code: code.to_owned(),
                name: attr.name.trim().to_owned(),
                details: attr.value.trim().to_owned(),
            };
            self.client.create_info(&info).await?;
            infos.push(info);
        }

        info!(code, infos = infos.len(), "item created");
        Ok(SavedItem {
            fields,
            infos,
            removed: Vec::new(),
        })
    }

    /// Submit the edit-item form for item `id`.
    ///
    /// Resolves the section by name, uploads a replacement image if one was
    /// given, updates the item, then updates, creates and deletes its infos.
    /// Every written info carries the submitted code.
    pub async fn edit_item(&self, id: &str, form: &EditItem) -> Result<SavedItem, CoreError> {
        form.validate()?;
        let code = form.code.trim();

        let current = self.item(id).await?;
        let section = self.section_by_name(&form.section).await?;
        let image_path = match &form.image {
            Some(image) => {
                let path = self.client.save_image(image, code).await?;
                debug!(code, image_path = %path, "replacement image stored");
                path
            }
            None => current.image_path,
        };

        let fields = ItemFields {
            code: code.to_owned(),
            description: form.description.trim().to_owned(),
            section_id: section.id,
            image_path,
        };
        self.client.update_item(id, &fields).await?;

        let mut infos = Vec::with_capacity(form.attributes.len());
        for attr in &form.attributes {
            let info = Info {
                id: attr
                    .id
                    .clone()
                    .unwrap_or_else(|| Uuid::new_v4().to_string()),
                item_code: code.to_owned(),
                name: attr.name.trim().to_owned(),
                details: attr.value.trim().to_owned(),
            };
            if attr.id.is_some() {
                self.client.update_info(&info).await?;
            } else {
                self.client.create_info(&info).await?;
            }
            infos.push(info);
        }

        for info_id in &form.removed {
            self.client.delete_info(info_id).await?;
        }

        info!(
            id,
            code,
            infos = infos.len(),
            removed = form.removed.len(),
            "item updated"
        );
        Ok(SavedItem {
            fields,
            infos,
            removed: form.removed.clone(),
        })
    }

    pub async fn delete_item(&self, id: &str) -> Result<(), CoreError> {
        self.client.delete_item(id).await?;
        info!(id, "item deleted");
        Ok(())
    }

    pub async fn has_items(&self) -> Result<bool, CoreError> {
        Ok(self.client.has_items().await?)
    }

    /// Both emptiness checks at once.
    pub async fn summary(&self) -> Result<CatalogSummary, CoreError> {
        Ok(CatalogSummary {
            has_sections: self.has_sections().await?,
            has_items: self.has_items().await?,
        })
    }

    // ── Infos ────────────────────────────────────────────────────────

    pub async fn infos(&self, item_code: &str) -> Result<Vec<Info>, CoreError> {
        Ok(self.client.list_infos(item_code).await?)
    }

    pub async fn update_info(&self, info: &Info) -> Result<(), CoreError> {
        if info.item_code.trim().is_empty() {
            return Err(invalid("item code", "must not be empty"));
        }
        if info.name.trim().is_empty() || info.details.trim().is_empty() {
            return Err(invalid("info", "needs both a name and a value"));
        }
        Ok(self.client.update_info(info).await?)
    }

    pub async fn delete_info(&self, id: &str) -> Result<(), CoreError> {
        self.client.delete_info(id).await?;
        info!(id, "info deleted");
        Ok(())
    }
}

fn invalid(field: &str, message: impl Into<String>) -> CoreError {
    CoreError::ValidationFailed {
        field: field.into(),
        message: message.into(),
    }
}

fn not_found(entity_type: &str, identifier: &str) -> CoreError {
    CoreError::NotFound {
        entity_type: entity_type.into(),
        identifier: identifier.into(),
    }
}
