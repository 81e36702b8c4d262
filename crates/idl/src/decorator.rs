//! Typed metadata tags attached to IDL nodes.
//!
//! Decorators are transported by the conversion engine and interpreted by
//! collaborators (the schema service's persistence layer, mostly). The wire
//! form is `{"type": "<discriminator>", ...payload}`.

use serde::{Deserialize, Serialize};

/// A metadata tag attached to an [`crate::IdlNode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Decorator {
    /// Marks the ID field of an entity; the ID is generated by the service.
    AutoGeneratedId,
    /// Marks an object node as a persistable entity.
    Entity {
        #[serde(rename = "multiTenancyType", default)]
        multi_tenancy_type: MultiTenancyType,
    },
    /// The field must be present and non-null when an item is stored.
    NotNull,
    /// Marks a caller-supplied identity field.
    Id,
}

impl Decorator {
    /// Wire discriminator of this decorator.
    pub fn kind(&self) -> &'static str {
        match self {
            Decorator::AutoGeneratedId => "AutoGeneratedId",
            Decorator::Entity { .. } => "Entity",
            Decorator::NotNull => "NotNull",
            Decorator::Id => "Id",
        }
    }
}

/// Whether an entity's storage is shared across tenants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MultiTenancyType {
    #[default]
    Shared,
    None,
}
