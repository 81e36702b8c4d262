//! Conversion domain: source type declarations to IDL trees.
//!
//! One converter per declaration kind. Ordering in
//! [`IdlConverterStrategy::new`] is most-specific-first: array- and
//! enum-shaped declarations are claimed before the record and union
//! converters get a look.

use tracing::warn;

use lattice_idl::{Decorator, IdlKind, IdlNode, MultiTenancyType};

use crate::convert::{ConversionContext, ConverterStrategy, TypeConverter};
use crate::declaration::{MemberDeclaration, PrimitiveKind, Tag, TypeDeclaration};
use crate::error::{Error, Result};

/// Run state for one declaration-to-IDL conversion.
#[derive(Debug, Clone)]
pub struct IdlConversionState {
    /// Namespace assigned to the entity-level root.
    pub namespace: String,
}

type IdlConverter = Box<dyn TypeConverter<TypeDeclaration, IdlNode, IdlConversionState>>;

/// Strategy for converting declarations into IDL trees within one namespace.
pub struct IdlConverterStrategy {
    namespace: String,
    converters: Vec<IdlConverter>,
}

impl IdlConverterStrategy {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            // Order matters: specific shapes before the broader record and
            // union converters.
            converters: vec![
                Box::new(PrimitiveToIdl),
                Box::new(ArrayToIdl),
                Box::new(EnumToIdl),
                Box::new(RecordToIdl),
                Box::new(UnionToIdl),
            ],
        }
    }
}

impl ConverterStrategy<TypeDeclaration, IdlNode, IdlConversionState> for IdlConverterStrategy {
    fn name(&self) -> &'static str {
        "declaration-to-idl"
    }

    fn converters(&self) -> &[IdlConverter] {
        &self.converters
    }

    fn initial_state(&self) -> IdlConversionState {
        IdlConversionState {
            namespace: self.namespace.clone(),
        }
    }

    fn render_value(&self, value: &TypeDeclaration) -> String {
        value.describe()
    }
}

/// Resolve a declarative tag into a decorator.
///
/// Unknown tags yield `None` and are skipped by the caller; a recognized tag
/// with a malformed argument is an error.
pub fn decorator_from_tag(tag: &Tag) -> Result<Option<Decorator>> {
    match tag.name.as_str() {
        "Entity" => Ok(Some(Decorator::Entity {
            multi_tenancy_type: multi_tenancy_from_argument(tag.argument.as_deref())?,
        })),
        "AutoGeneratedId" => Ok(Some(Decorator::AutoGeneratedId)),
        "NotNull" => Ok(Some(Decorator::NotNull)),
        "Id" => Ok(Some(Decorator::Id)),
        _ => Ok(None),
    }
}

/// Parse the `Entity` tag's optional multi-tenancy argument.
///
/// Accepts the bare value (`SHARED`) and the qualified source form
/// (`MultiTenancyType.SHARED`); absence defaults to SHARED.
pub fn multi_tenancy_from_argument(argument: Option<&str>) -> Result<MultiTenancyType> {
    let Some(argument) = argument else {
        return Ok(MultiTenancyType::default());
    };
    let bare = argument.strip_prefix("MultiTenancyType.").unwrap_or(argument);
    match bare {
        "SHARED" => Ok(MultiTenancyType::Shared),
        "NONE" => Ok(MultiTenancyType::None),
        other => Err(Error::conversion(format!(
            "unsupported multi-tenancy type {other:?}"
        ))),
    }
}

fn apply_tags(node: &mut IdlNode, tags: &[Tag], allow_entity: bool) -> Result<()> {
    for tag in tags {
        if tag.name == "Entity" && !allow_entity {
            // Entity is a declaration-level concern handled by the batch
            // driver; on members it is meaningless.
            warn!("ignoring Entity tag on a non-root position");
            continue;
        }
        match decorator_from_tag(tag)? {
            Some(decorator) => node.add_decorator(decorator),
            None => warn!("ignoring unrecognized tag {:?}", tag.name),
        }
    }
    Ok(())
}

struct PrimitiveToIdl;

impl TypeConverter<TypeDeclaration, IdlNode, IdlConversionState> for PrimitiveToIdl {
    fn supports(&self, value: &TypeDeclaration, _state: &IdlConversionState) -> bool {
        matches!(value, TypeDeclaration::Primitive { .. })
    }

    fn convert(
        &self,
        value: &TypeDeclaration,
        _ctx: &mut ConversionContext<'_, TypeDeclaration, IdlNode, IdlConversionState>,
    ) -> Result<IdlNode> {
        let TypeDeclaration::Primitive { primitive } = value else {
            return Err(Error::conversion("primitive converter got a non-primitive"));
        };
        Ok(IdlNode::new(primitive_kind(*primitive)))
    }
}

fn primitive_kind(primitive: PrimitiveKind) -> IdlKind {
    match primitive {
        PrimitiveKind::String => IdlKind::String,
        PrimitiveKind::Int => IdlKind::Int,
        PrimitiveKind::Long => IdlKind::Long,
        PrimitiveKind::Short => IdlKind::Short,
        PrimitiveKind::Float => IdlKind::Float,
        PrimitiveKind::Double => IdlKind::Double,
        PrimitiveKind::Boolean => IdlKind::Boolean,
        PrimitiveKind::Byte => IdlKind::Byte,
        PrimitiveKind::Char => IdlKind::Char,
        PrimitiveKind::Date => IdlKind::Date,
    }
}

struct ArrayToIdl;

impl TypeConverter<TypeDeclaration, IdlNode, IdlConversionState> for ArrayToIdl {
    fn supports(&self, value: &TypeDeclaration, _state: &IdlConversionState) -> bool {
        matches!(value, TypeDeclaration::Array { .. })
    }

    fn convert(
        &self,
        value: &TypeDeclaration,
        ctx: &mut ConversionContext<'_, TypeDeclaration, IdlNode, IdlConversionState>,
    ) -> Result<IdlNode> {
        let TypeDeclaration::Array { element } = value else {
            return Err(Error::conversion("array converter got a non-array"));
        };
        let contains = ctx.convert(element)?;
        Ok(IdlNode::array(contains))
    }
}

struct EnumToIdl;

impl TypeConverter<TypeDeclaration, IdlNode, IdlConversionState> for EnumToIdl {
    fn supports(&self, value: &TypeDeclaration, _state: &IdlConversionState) -> bool {
        matches!(value, TypeDeclaration::Enum { .. })
    }

    fn convert(
        &self,
        value: &TypeDeclaration,
        _ctx: &mut ConversionContext<'_, TypeDeclaration, IdlNode, IdlConversionState>,
    ) -> Result<IdlNode> {
        let TypeDeclaration::Enum { name, values, tags } = value else {
            return Err(Error::conversion("enum converter got a non-enum"));
        };
        let mut node = IdlNode::new(IdlKind::Enum {
            name: Some(name.clone()),
            values: values.clone(),
        });
        apply_tags(&mut node, tags, false)?;
        Ok(node)
    }
}

struct RecordToIdl;

impl TypeConverter<TypeDeclaration, IdlNode, IdlConversionState> for RecordToIdl {
    fn supports(&self, value: &TypeDeclaration, _state: &IdlConversionState) -> bool {
        matches!(value, TypeDeclaration::Record { .. })
    }

    fn convert(
        &self,
        value: &TypeDeclaration,
        ctx: &mut ConversionContext<'_, TypeDeclaration, IdlNode, IdlConversionState>,
    ) -> Result<IdlNode> {
        let TypeDeclaration::Record {
            name,
            members,
            tags,
        } = value
        else {
            return Err(Error::conversion("record converter got a non-record"));
        };

        let mut node = IdlNode::object();
        // Identity only at the entity level, i.e. the root of this run.
        if ctx.depth() == 1 {
            let namespace = ctx.state().namespace.clone();
            node.set_identity(namespace, name.clone());
        }

        for member in members {
            let child = convert_member(member, ctx)?;
            if !node.add_property(member.name.clone(), child) {
                return Err(Error::conversion(format!(
                    "duplicate member name {:?} in record {name}",
                    member.name
                )));
            }
        }

        apply_tags(&mut node, tags, false)?;
        Ok(node)
    }
}

fn convert_member(
    member: &MemberDeclaration,
    ctx: &mut ConversionContext<'_, TypeDeclaration, IdlNode, IdlConversionState>,
) -> Result<IdlNode> {
    let mut child = ctx.convert(&member.declaration)?;
    apply_tags(&mut child, &member.tags, false)?;
    Ok(child)
}

struct UnionToIdl;

impl TypeConverter<TypeDeclaration, IdlNode, IdlConversionState> for UnionToIdl {
    fn supports(&self, value: &TypeDeclaration, _state: &IdlConversionState) -> bool {
        matches!(value, TypeDeclaration::Union { .. })
    }

    fn convert(
        &self,
        value: &TypeDeclaration,
        ctx: &mut ConversionContext<'_, TypeDeclaration, IdlNode, IdlConversionState>,
    ) -> Result<IdlNode> {
        let TypeDeclaration::Union { alternatives } = value else {
            return Err(Error::conversion("union converter got a non-union"));
        };
        let mut of = Vec::with_capacity(alternatives.len());
        for alternative in alternatives {
            of.push(ctx.convert(alternative)?);
        }
        Ok(IdlNode::union(of))
    }
}
