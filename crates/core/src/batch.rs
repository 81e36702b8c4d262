//! Batch conversion of top-level declarations.
//!
//! Each declaration converts independently in a fresh context; one failure is
//! logged by the engine, recorded here, and never aborts the siblings. Only
//! declarations carrying the `Entity` tag are attempted — everything else is
//! skipped silently.

use tracing::debug;

use lattice_idl::{Decorator, IdlNode};

use crate::convert::ConversionContext;
use crate::convert::idl::{IdlConverterStrategy, multi_tenancy_from_argument};
use crate::declaration::TypeDeclaration;
use crate::error::Result;

/// Outcome of one batch run.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Successfully converted entity roots, in input order.
    pub entities: Vec<IdlNode>,
    /// Declarations without an `Entity` tag.
    pub skipped: usize,
    /// Per-item failures; siblings were still processed.
    pub failed: Vec<BatchFailure>,
}

/// One failed batch item. The engine already logged the aggregated error
/// path; `report` carries it for callers that surface summaries.
#[derive(Debug)]
pub struct BatchFailure {
    pub name: String,
    pub message: String,
    pub report: Option<String>,
}

/// Convert every entity-tagged declaration in `declarations` into an IDL
/// tree rooted in `namespace`.
pub fn convert_declarations(namespace: &str, declarations: &[TypeDeclaration]) -> BatchOutcome {
    let strategy = IdlConverterStrategy::new(namespace);
    let mut outcome = BatchOutcome::default();

    for declaration in declarations {
        if declaration.tag("Entity").is_none() {
            debug!(
                "skipping {} (no Entity tag)",
                declaration.name().unwrap_or("<anonymous>")
            );
            outcome.skipped += 1;
            continue;
        }

        // Fresh context per declaration: depth stack and run state must not
        // leak between independent conversions.
        let mut ctx = ConversionContext::new(&strategy);
        match convert_entity(declaration, &mut ctx) {
            Ok(node) => outcome.entities.push(node),
            Err(err) => outcome.failed.push(BatchFailure {
                name: declaration.name().unwrap_or("<anonymous>").to_string(),
                message: err.to_string(),
                report: ctx.take_failure_report(),
            }),
        }
    }

    outcome
}

fn convert_entity(
    declaration: &TypeDeclaration,
    ctx: &mut ConversionContext<'_, TypeDeclaration, IdlNode, crate::convert::idl::IdlConversionState>,
) -> Result<IdlNode> {
    let mut node = ctx.convert(declaration)?;

    // The Entity tag itself becomes the root's entity decorator; its optional
    // argument selects the multi-tenancy mode.
    let argument = declaration
        .tag("Entity")
        .and_then(|tag| tag.argument.as_deref());
    node.add_decorator(Decorator::Entity {
        multi_tenancy_type: multi_tenancy_from_argument(argument)?,
    });
    Ok(node)
}
