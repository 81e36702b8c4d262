//! The IDL schema tree.
//!
//! Every node is a kind discriminator plus an optional decorator list. On the
//! wire the discriminator is inlined as `"type"`, so a string primitive
//! serializes as `{"type":"string"}` and an object as
//! `{"type":"object","properties":{...}}`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::decorator::Decorator;

/// One node of the intermediate schema tree.
///
/// The tree is acyclic by construction (child nodes are owned), and property
/// names within one object node are unique. Decorators are transported, not
/// interpreted; at most one decorator of a given discriminator is meaningful
/// per node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdlNode {
    #[serde(flatten)]
    pub kind: IdlKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decorators: Vec<Decorator>,
}

/// Kind discriminator for [`IdlNode`], tagged as `"type"` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum IdlKind {
    Object {
        /// Entity identity, present only on entity-level roots.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        namespace: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        properties: IndexMap<String, IdlNode>,
    },
    Array {
        contains: Box<IdlNode>,
    },
    Enum {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        values: Vec<String>,
    },
    Union {
        of: Vec<IdlNode>,
    },
    String,
    Int,
    Long,
    Short,
    Float,
    Double,
    Boolean,
    Byte,
    Char,
    Date,
}

impl IdlNode {
    /// Create a node of the given kind with no decorators.
    pub fn new(kind: IdlKind) -> Self {
        Self {
            kind,
            decorators: Vec::new(),
        }
    }

    /// Create an empty object node with no identity.
    pub fn object() -> Self {
        Self::new(IdlKind::Object {
            namespace: None,
            name: None,
            properties: IndexMap::new(),
        })
    }

    /// Create an array node wrapping `contains`.
    pub fn array(contains: IdlNode) -> Self {
        Self::new(IdlKind::Array {
            contains: Box::new(contains),
        })
    }

    /// Create a union node over the given alternatives.
    pub fn union(of: Vec<IdlNode>) -> Self {
        Self::new(IdlKind::Union { of })
    }

    /// Wire name of this node's kind ("object", "array", "string", ...).
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            IdlKind::Object { .. } => "object",
            IdlKind::Array { .. } => "array",
            IdlKind::Enum { .. } => "enum",
            IdlKind::Union { .. } => "union",
            IdlKind::String => "string",
            IdlKind::Int => "int",
            IdlKind::Long => "long",
            IdlKind::Short => "short",
            IdlKind::Float => "float",
            IdlKind::Double => "double",
            IdlKind::Boolean => "boolean",
            IdlKind::Byte => "byte",
            IdlKind::Char => "char",
            IdlKind::Date => "date",
        }
    }

    /// Set the `(namespace, name)` identity on an object node.
    ///
    /// Has no effect on non-object nodes.
    pub fn set_identity(&mut self, ns: impl Into<String>, n: impl Into<String>) {
        if let IdlKind::Object {
            namespace, name, ..
        } = &mut self.kind
        {
            *namespace = Some(ns.into());
            *name = Some(n.into());
        }
    }

    /// Add a property to an object node, preserving insertion order.
    ///
    /// Returns `false` when the node is not an object or the property name is
    /// already taken; the existing child is left untouched in that case.
    pub fn add_property(&mut self, prop_name: impl Into<String>, node: IdlNode) -> bool {
        let IdlKind::Object { properties, .. } = &mut self.kind else {
            return false;
        };
        let prop_name = prop_name.into();
        if properties.contains_key(&prop_name) {
            return false;
        }
        properties.insert(prop_name, node);
        true
    }

    /// Look up a property on an object node.
    pub fn property(&self, prop_name: &str) -> Option<&IdlNode> {
        match &self.kind {
            IdlKind::Object { properties, .. } => properties.get(prop_name),
            _ => None,
        }
    }

    /// Iterate the properties of an object node in insertion order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &IdlNode)> {
        let props = match &self.kind {
            IdlKind::Object { properties, .. } => Some(properties),
            _ => None,
        };
        props
            .into_iter()
            .flat_map(|p| p.iter().map(|(k, v)| (k.as_str(), v)))
    }

    pub fn add_decorator(&mut self, decorator: Decorator) {
        self.decorators.push(decorator);
    }

    pub fn has_decorators(&self) -> bool {
        !self.decorators.is_empty()
    }

    /// First decorator with the given wire discriminator, if any.
    pub fn decorator(&self, kind: &str) -> Option<&Decorator> {
        self.decorators.iter().find(|d| d.kind() == kind)
    }

    /// Lowercase `namespace.name` identifier, available on entity-level roots.
    pub fn entity_id(&self) -> Option<String> {
        match &self.kind {
            IdlKind::Object {
                namespace: Some(ns),
                name: Some(n),
                ..
            } => Some(crate::structure_id(ns, n)),
            _ => None,
        }
    }
}
