//! Conversion domain: IDL trees to generated mapping statements.
//!
//! This strategy reuses the engine with converters keyed on IDL node kind
//! instead of declaration kind. Two flavors ship: assignment mappers
//! (field-by-field copies between a source and a target value) and validation
//! mappers (presence/kind checks). Both thread a dot-delimited field path
//! through the run state, extending it before each object-member recursion and
//! restoring it afterwards.

use std::fmt;

use lattice_idl::{IdlKind, IdlNode};

use crate::convert::{ConversionContext, ConverterStrategy, TypeConverter};
use crate::error::{Error, Result};

/// One generated mapping instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Copy one field: `target := source`.
    Assign { target: String, source: String },
    /// Check one field against the expected IDL kind.
    Validate { path: String, expected: String },
    /// Statements for one object node, one entry per property.
    Group(Vec<Statement>),
}

impl Statement {
    /// Leaf statements in emission order, flattening nested groups.
    pub fn leaves(&self) -> Vec<&Statement> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Statement>) {
        match self {
            Statement::Group(children) => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
            leaf => out.push(leaf),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Assign { target, source } => write!(f, "{target} := {source}"),
            Statement::Validate { path, expected } => {
                write!(f, "require {path} : {expected}")
            }
            Statement::Group(_) => {
                let rendered: Vec<String> =
                    self.leaves().iter().map(|s| s.to_string()).collect();
                write!(f, "{}", rendered.join("\n"))
            }
        }
    }
}

/// Run state for statement generation.
#[derive(Debug, Clone)]
pub struct StatementState {
    pub source_name: String,
    pub target_name: String,
    /// Accumulated dot-delimited field path; empty at the root.
    pub path: String,
}

impl StatementState {
    /// Path rooted at `base`, e.g. `entity.address.street`.
    fn rooted(&self, base: &str) -> String {
        if self.path.is_empty() {
            base.to_string()
        } else {
            format!("{base}.{}", self.path)
        }
    }

    fn source_path(&self) -> String {
        self.rooted(&self.source_name)
    }

    fn target_path(&self) -> String {
        self.rooted(&self.target_name)
    }

    /// Extend the path with one member segment, returning the previous value
    /// for the caller to restore after recursion.
    fn push_segment(&mut self, segment: &str) -> String {
        let previous = std::mem::take(&mut self.path);
        self.path = if previous.is_empty() {
            segment.to_string()
        } else {
            format!("{previous}.{segment}")
        };
        previous
    }
}

type StatementConverter = Box<dyn TypeConverter<IdlNode, Statement, StatementState>>;

/// Which statement flavor a strategy emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapperMode {
    Assignment,
    Validation,
}

/// Strategy generating mapping statements from a completed IDL tree.
pub struct StatementMapperStrategy {
    mode: MapperMode,
    source_name: String,
    target_name: String,
    converters: Vec<StatementConverter>,
}

impl StatementMapperStrategy {
    /// Assignment mappers: leaf copies between `source_name` and
    /// `target_name` paths.
    pub fn assignment(source_name: impl Into<String>, target_name: impl Into<String>) -> Self {
        Self {
            mode: MapperMode::Assignment,
            source_name: source_name.into(),
            target_name: target_name.into(),
            // Objects first; the leaf converter claims every remaining kind.
            converters: vec![Box::new(ObjectToStatement), Box::new(LeafToAssignment)],
        }
    }

    /// Validation mappers: presence/kind checks on every leaf path.
    pub fn validation(source_name: impl Into<String>) -> Self {
        let source_name = source_name.into();
        Self {
            mode: MapperMode::Validation,
            target_name: source_name.clone(),
            source_name,
            converters: vec![Box::new(ObjectToStatement), Box::new(LeafToValidation)],
        }
    }

    pub fn mode(&self) -> MapperMode {
        self.mode
    }
}

impl ConverterStrategy<IdlNode, Statement, StatementState> for StatementMapperStrategy {
    fn name(&self) -> &'static str {
        match self.mode {
            MapperMode::Assignment => "idl-to-assignment",
            MapperMode::Validation => "idl-to-validation",
        }
    }

    fn converters(&self) -> &[StatementConverter] {
        &self.converters
    }

    fn initial_state(&self) -> StatementState {
        StatementState {
            source_name: self.source_name.clone(),
            target_name: self.target_name.clone(),
            path: String::new(),
        }
    }

    fn render_value(&self, value: &IdlNode) -> String {
        value.kind_name().to_string()
    }
}

/// Recurses per property, extending and restoring the field path around each
/// child. Must precede the leaf converters in every statement strategy.
struct ObjectToStatement;

impl TypeConverter<IdlNode, Statement, StatementState> for ObjectToStatement {
    fn supports(&self, value: &IdlNode, _state: &StatementState) -> bool {
        matches!(value.kind, IdlKind::Object { .. })
    }

    fn convert(
        &self,
        value: &IdlNode,
        ctx: &mut ConversionContext<'_, IdlNode, Statement, StatementState>,
    ) -> Result<Statement> {
        let IdlKind::Object { properties, .. } = &value.kind else {
            return Err(Error::conversion("object converter got a non-object"));
        };
        let mut statements = Vec::with_capacity(properties.len());
        for (property_name, child) in properties {
            let previous = ctx.state_mut().push_segment(property_name);
            let result = ctx.convert(child);
            // Restore before propagating so sibling branches never see this
            // member's segment.
            ctx.state_mut().path = previous;
            statements.push(result?);
        }
        Ok(Statement::Group(statements))
    }
}

/// Terminal assignment for every non-object kind: primitives and enums copy
/// one field; arrays and unions copy the whole value at the current path.
struct LeafToAssignment;

impl TypeConverter<IdlNode, Statement, StatementState> for LeafToAssignment {
    fn supports(&self, _value: &IdlNode, _state: &StatementState) -> bool {
        true
    }

    fn convert(
        &self,
        _value: &IdlNode,
        ctx: &mut ConversionContext<'_, IdlNode, Statement, StatementState>,
    ) -> Result<Statement> {
        let state = ctx.state();
        Ok(Statement::Assign {
            target: state.target_path(),
            source: state.source_path(),
        })
    }
}

/// Terminal kind check for every non-object kind.
struct LeafToValidation;

impl TypeConverter<IdlNode, Statement, StatementState> for LeafToValidation {
    fn supports(&self, _value: &IdlNode, _state: &StatementState) -> bool {
        true
    }

    fn convert(
        &self,
        value: &IdlNode,
        ctx: &mut ConversionContext<'_, IdlNode, Statement, StatementState>,
    ) -> Result<Statement> {
        Ok(Statement::Validate {
            path: ctx.state().source_path(),
            expected: value.kind_name().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use lattice_idl::IdlKind;

    fn person_idl() -> IdlNode {
        let mut address = IdlNode::object();
        for field in ["street", "city", "state", "zip"] {
            address.add_property(field, IdlNode::new(IdlKind::String));
        }
        let mut person = IdlNode::object();
        person.set_identity("org.acme", "Person");
        person.add_property("id", IdlNode::new(IdlKind::String));
        person.add_property("firstName", IdlNode::new(IdlKind::String));
        person.add_property("lastName", IdlNode::new(IdlKind::String));
        person.add_property("age", IdlNode::new(IdlKind::Int));
        person.add_property("address", address);
        person
    }

    fn assignments(node: &IdlNode) -> Vec<String> {
        let strategy = StatementMapperStrategy::assignment("entity", "ret");
        let root = ConversionContext::new(&strategy).convert(node).unwrap();
        root.leaves().iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_person_assignment_statements() {
        let statements = assignments(&person_idl());

        // One leaf per primitive: 4 top-level fields + 4 nested address fields.
        assert_eq!(statements.len(), 8);
        assert!(statements.contains(&"ret.id := entity.id".to_string()));
        assert!(statements.contains(&"ret.age := entity.age".to_string()));
        assert!(
            statements.contains(&"ret.address.street := entity.address.street".to_string())
        );
        assert!(statements.contains(&"ret.address.zip := entity.address.zip".to_string()));
    }

    #[test]
    fn test_group_has_one_entry_per_property() {
        let strategy = StatementMapperStrategy::assignment("entity", "ret");
        let root = ConversionContext::new(&strategy)
            .convert(&person_idl())
            .unwrap();
        let Statement::Group(children) = &root else {
            unreachable!("object node must produce a group");
        };
        assert_eq!(children.len(), 5);
    }

    #[test]
    fn test_path_restored_between_sibling_branches() {
        // A sibling declared after the nested object must not inherit its
        // path segments.
        let mut nested = IdlNode::object();
        nested.add_property("inner", IdlNode::new(IdlKind::String));
        let mut root = IdlNode::object();
        root.add_property("nested", nested);
        root.add_property("after", IdlNode::new(IdlKind::Int));

        let statements = assignments(&root);
        assert_eq!(
            statements,
            vec![
                "ret.nested.inner := entity.nested.inner".to_string(),
                "ret.after := entity.after".to_string(),
            ]
        );
    }

    #[test]
    fn test_array_and_union_assigned_whole() {
        let mut root = IdlNode::object();
        root.add_property("tags", IdlNode::array(IdlNode::new(IdlKind::String)));
        root.add_property(
            "extra",
            IdlNode::union(vec![
                IdlNode::new(IdlKind::String),
                IdlNode::new(IdlKind::Int),
            ]),
        );
        let statements = assignments(&root);
        assert_eq!(
            statements,
            vec![
                "ret.tags := entity.tags".to_string(),
                "ret.extra := entity.extra".to_string(),
            ]
        );
    }

    #[test]
    fn test_bare_primitive_assigns_root_names() {
        let statements = assignments(&IdlNode::new(IdlKind::String));
        assert_eq!(statements, vec!["ret := entity".to_string()]);
    }

    #[test]
    fn test_validation_statements() {
        let strategy = StatementMapperStrategy::validation("entity");
        let root = ConversionContext::new(&strategy)
            .convert(&person_idl())
            .unwrap();
        let leaves: Vec<String> = root.leaves().iter().map(|s| s.to_string()).collect();
        assert_eq!(leaves.len(), 8);
        assert!(leaves.contains(&"require entity.age : int".to_string()));
        assert!(leaves.contains(&"require entity.address.city : string".to_string()));
    }

    #[test]
    fn test_object_converter_precedes_greedy_leaf() {
        // The leaf converter claims everything; ordering is what routes
        // object nodes into recursion instead of a single opaque assignment.
        let statements = assignments(&person_idl());
        assert!(statements.iter().all(|s| s != "ret := entity"));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let node = person_idl();
        assert_eq!(assignments(&node), assignments(&node));
    }
}
