use std::path::PathBuf;

use clap::Args;
use console::style;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use lattice_core::batch::convert_declarations;
use lattice_core::config::ProjectConfig;
use lattice_core::declaration::load_declaration_dir;
use lattice_core::sync::{AlwaysConfirm, ConfirmAction, SchemaServiceClient, SyncOptions, sync_entities};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::commands::run_cli_async;

#[derive(Args, Debug, Clone)]
pub struct SynchronizeArgs {
    #[arg(
        value_name = "NAMESPACE",
        help = "Namespace for the converted entities. Defaults to the configured project namespace"
    )]
    pub namespace: Option<String>,
    #[arg(
        long,
        short = 'e',
        help = "Directory containing entity declaration JSON files"
    )]
    pub entities: Option<PathBuf>,
    #[arg(long, help = "Base URL of the schema service")]
    pub server: Option<String>,
    #[arg(long, help = "Convert and print entities without contacting the server")]
    pub dry_run: bool,
    #[arg(long, help = "Publish each structure after it is saved")]
    pub publish: bool,
    #[arg(
        long,
        short = 'y',
        help = "Answer yes to all prompts, including unpublish confirmations"
    )]
    pub yes: bool,
}

pub async fn run(args: SynchronizeArgs) -> i32 {
    run_cli_async(|| run_inner(args)).await
}

async fn run_inner(args: SynchronizeArgs) -> Result<(), String> {
    let cwd = std::env::current_dir().map_err(|err| format!("Failed to resolve cwd: {err}"))?;
    let config = if ProjectConfig::exists(&cwd) {
        Some(ProjectConfig::read(&cwd).map_err(|err| format!("Failed to read lattice.toml: {err}"))?)
    } else {
        None
    };

    let namespace = args
        .namespace
        .or_else(|| config.as_ref().map(|cfg| cfg.namespace.clone()))
        .ok_or_else(|| {
            "No namespace given. Pass one as an argument or set [project].namespace in lattice.toml"
                .to_string()
        })?;
    let entities_dir = args
        .entities
        .or_else(|| config.as_ref().map(|cfg| cfg.entities_dir.clone()))
        .unwrap_or_else(|| cwd.join("entities"));

    let declarations = load_declaration_dir(&entities_dir)
        .map_err(|err| format!("Failed to load declarations from {}: {err}", entities_dir.display()))?;
    if declarations.is_empty() {
        return Err(format!(
            "No declaration files found under {}",
            entities_dir.display()
        ));
    }
    debug!(count = declarations.len(), "loaded declarations");

    let outcome = convert_declarations(&namespace, &declarations);
    let failed_count = if outcome.failed.is_empty() {
        style(outcome.failed.len()).dim()
    } else {
        style(outcome.failed.len()).red()
    };
    println!(
        "Converted {} entities ({} skipped, {} failed)",
        style(outcome.entities.len()).green(),
        outcome.skipped,
        failed_count
    );
    for failure in &outcome.failed {
        eprintln!("{} {}: {}", style("error").red().bold(), failure.name, failure.message);
        if let Some(report) = &failure.report {
            eprintln!("{report}");
        }
    }
    if !outcome.failed.is_empty() {
        return Err("Conversion failed for one or more declarations".to_string());
    }

    if args.dry_run {
        for entity in &outcome.entities {
            let rendered = serde_json::to_string_pretty(entity)
                .map_err(|err| format!("Failed to render entity: {err}"))?;
            println!("{rendered}");
        }
        return Ok(());
    }

    let server = args
        .server
        .or_else(|| {
            config
                .as_ref()
                .and_then(|cfg| cfg.server_url.as_ref())
                .map(Url::to_string)
        })
        .ok_or_else(|| {
            "No server given. Pass --server or set [server].url in lattice.toml".to_string()
        })?;
    let base_url =
        Url::parse(&server).map_err(|err| format!("Invalid server URL {server}: {err}"))?;
    let client = SchemaServiceClient::new(base_url)
        .map_err(|err| format!("Failed to build schema service client: {err}"))?;

    let confirm: Box<dyn ConfirmAction> = if args.yes {
        Box::new(AlwaysConfirm)
    } else {
        Box::new(PromptConfirm)
    };

    let spinner = spinner(&format!("Synchronizing {} entities...", outcome.entities.len()));
    let report = sync_entities(
        &client,
        &outcome.entities,
        confirm.as_ref(),
        SyncOptions { publish: args.publish },
    )
    .await;
    spinner.finish_and_clear();

    println!(
        "Synchronized {} structures ({} skipped)",
        style(report.synced.len()).green(),
        report.skipped.len()
    );
    for (id, message) in &report.failed {
        eprintln!("{} {id}: {message}", style("error").red().bold());
    }
    if report.failed.is_empty() {
        Ok(())
    } else {
        Err("Synchronization failed for one or more structures".to_string())
    }
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());
    spinner
}

/// Prompts on the terminal before unpublishing a live structure.
struct PromptConfirm;

impl ConfirmAction for PromptConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}
