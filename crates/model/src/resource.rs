//! Resource kinds exposed by the service.

use serde::{Deserialize, Serialize};

/// A remote resource type with its wire naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Entity,
    Invoice,
    Item,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::Entity, Resource::Invoice, Resource::Item];

    /// Element name wrapping a single record in requests and responses.
    pub fn element_name(self) -> &'static str {
        match self {
            Resource::Entity => "entity",
            Resource::Invoice => "invoice",
            Resource::Item => "item",
        }
    }

    /// Collection name wrapping list responses.
    pub fn collection_name(self) -> &'static str {
        match self {
            Resource::Entity => "entities",
            Resource::Invoice => "invoices",
            Resource::Item => "items",
        }
    }

    /// Key under which the service reports the record identifier.
    pub fn id_key(self) -> &'static str {
        match self {
            Resource::Entity => "entity_id",
            Resource::Invoice => "invoice_id",
            Resource::Item => "item_id",
        }
    }
}

impl core::fmt::Display for Resource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.element_name())
    }
}
