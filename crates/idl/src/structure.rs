//! The schema service's stored record for one entity.

use serde::{Deserialize, Serialize};

use crate::node::IdlNode;

/// Canonical identifier for an entity: lowercase `namespace.name`.
pub fn structure_id(namespace: &str, name: &str) -> String {
    format!("{namespace}.{name}").to_lowercase()
}

/// One entity definition as stored and versioned by the schema service.
///
/// Timestamps are epoch milliseconds and are managed by the service; clients
/// send them as zero and never update them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureRecord {
    pub id: String,
    pub namespace: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub updated: i64,
    #[serde(default)]
    pub published_timestamp: i64,
    pub item_definition: IdlNode,
}

impl StructureRecord {
    /// Build a fresh record for an entity root produced by conversion.
    ///
    /// Returns `None` when the node carries no `(namespace, name)` identity.
    pub fn from_entity(node: &IdlNode) -> Option<Self> {
        let crate::IdlKind::Object {
            namespace: Some(namespace),
            name: Some(name),
            ..
        } = &node.kind
        else {
            return None;
        };
        Some(Self {
            id: structure_id(namespace, name),
            namespace: namespace.clone(),
            name: name.clone(),
            description: None,
            published: false,
            created: 0,
            updated: 0,
            published_timestamp: 0,
            item_definition: node.clone(),
        })
    }
}
