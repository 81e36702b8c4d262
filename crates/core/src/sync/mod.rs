//! Remote synchronization of converted entities with the schema service.
//!
//! Sync runs strictly after conversion, sequentially per entity. A failure
//! abandons the affected entity's remaining steps and moves on to the next
//! one; there are no retries. Unpublishing an already-published structure
//! drops its stored items, so that step is gated behind a confirmation.

mod client;

pub use client::SchemaServiceClient;

use tracing::{info, warn};

use lattice_idl::{IdlNode, StructureRecord};

use crate::error::{Error, Result};

/// Confirmation hook for destructive sync steps.
///
/// The CLI backs this with an interactive prompt; tests and `--yes` runs use
/// [`AlwaysConfirm`].
pub trait ConfirmAction: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Confirms every prompt without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl ConfirmAction for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Options for one sync run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Publish each entity after creating or saving it.
    pub publish: bool,
}

/// Summary of one sync run.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Entity ids created or saved.
    pub synced: Vec<String>,
    /// Entity ids skipped (declined confirmation, or no identity).
    pub skipped: Vec<String>,
    /// Entity ids that failed, with the error message.
    pub failed: Vec<(String, String)>,
}

/// Synchronize converted entities against the schema service, one at a time.
pub async fn sync_entities(
    client: &SchemaServiceClient,
    entities: &[IdlNode],
    confirm: &dyn ConfirmAction,
    options: SyncOptions,
) -> SyncReport {
    let mut report = SyncReport::default();

    for entity in entities {
        let Some(id) = entity.entity_id() else {
            warn!("skipping entity without (namespace, name) identity");
            report.skipped.push("<unidentified>".to_string());
            continue;
        };

        match sync_one(client, entity, &id, confirm, options).await {
            Ok(true) => report.synced.push(id),
            Ok(false) => report.skipped.push(id),
            Err(err) => {
                warn!("sync failed for {id}: {err}");
                report.failed.push((id, err.to_string()));
            }
        }
    }

    report
}

/// Sync one entity. `Ok(false)` means the operator declined a destructive
/// step and the entity was left untouched.
async fn sync_one(
    client: &SchemaServiceClient,
    entity: &IdlNode,
    id: &str,
    confirm: &dyn ConfirmAction,
    options: SyncOptions,
) -> Result<bool> {
    let record = StructureRecord::from_entity(entity)
        .ok_or_else(|| Error::sync("entity root has no identity"))?;

    match client.find_by_id(id).await? {
        None => {
            info!("creating structure {id}");
            client.create(&record).await?;
        }
        Some(existing) => {
            if existing.published {
                let prompt = format!(
                    "Structure {id} is published; unpublishing it will drop its stored \
                     items. Continue?"
                );
                if !confirm.confirm(&prompt) {
                    info!("leaving published structure {id} untouched");
                    return Ok(false);
                }
                info!("unpublishing structure {id}");
                client.unpublish(id).await?;
            }
            info!("saving structure {id}");
            client.save(&record).await?;
        }
    }

    if options.publish {
        info!("publishing structure {id}");
        client.publish(id).await?;
    }

    Ok(true)
}
