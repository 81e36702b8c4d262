//! The `lattice` command line interface.

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub mod commands;

#[derive(Parser)]
#[command(
    name = "lattice",
    version,
    about = "Keep locally authored entity declarations in sync with a schema service"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert entity declarations and synchronize them with the server
    Synchronize(commands::synchronize::SynchronizeArgs),
    /// Generate mapping statements from an IDL document
    Generate(commands::generate::GenerateArgs),
}

/// Parse `args` and run the selected command, returning a process exit code.
pub async fn run_cli(args: Vec<String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.command {
            Some(Commands::Synchronize(args)) => commands::synchronize::run(args).await,
            Some(Commands::Generate(args)) => commands::generate::run(args).await,
            None => {
                let mut cmd = Cli::command();
                let _ = cmd.print_help();
                println!();
                0
            }
        },
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

/// Initialize the tracing subscriber.
///
/// `LATTICE_LOG` controls the log level: "trace", "debug", "info", "warn",
/// "error", or a full tracing filter spec like "lattice_core=debug".
pub fn init_tracing() {
    let filter = match std::env::var("LATTICE_LOG") {
        Ok(level) if is_plain_level(&level) => {
            format!("lattice_core={level},lattice_cli={level}")
        }
        Ok(spec) => spec,
        Err(_) => "lattice_core=info,lattice_cli=info".to_string(),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
