use std::path::PathBuf;

use clap::{Args, ValueEnum};
use lattice_core::convert::ConversionContext;
use lattice_core::convert::statement::StatementMapperStrategy;
use lattice_idl::IdlNode;

use crate::commands::run_cli_async;

#[derive(ValueEnum, Clone, Copy, Debug)]
#[value(rename_all = "lower")]
pub enum Mode {
    Assign,
    Validate,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(value_name = "IDL_FILE", help = "Path to an IDL tree JSON file")]
    pub input: PathBuf,
    #[arg(
        long,
        value_enum,
        default_value = "assign",
        help = "Kind of statements to generate"
    )]
    pub mode: Mode,
    #[arg(
        long,
        default_value = "entity",
        help = "Variable name the statements read from"
    )]
    pub source: String,
    #[arg(
        long,
        default_value = "ret",
        help = "Variable name assignments write to"
    )]
    pub target: String,
}

pub async fn run(args: GenerateArgs) -> i32 {
    run_cli_async(|| run_inner(args)).await
}

async fn run_inner(args: GenerateArgs) -> Result<(), String> {
    let raw = std::fs::read_to_string(&args.input)
        .map_err(|err| format!("Failed to read {}: {err}", args.input.display()))?;
    let node: IdlNode = serde_json::from_str(&raw)
        .map_err(|err| format!("Failed to parse {}: {err}", args.input.display()))?;

    let strategy = match args.mode {
        Mode::Assign => StatementMapperStrategy::assignment(&args.source, &args.target),
        Mode::Validate => StatementMapperStrategy::validation(&args.source),
    };

    let mut ctx = ConversionContext::new(&strategy);
    let statement = match ctx.convert(&node) {
        Ok(statement) => statement,
        Err(err) => {
            if let Some(report) = ctx.take_failure_report() {
                eprintln!("{report}");
            }
            return Err(format!("Statement generation failed: {err}"));
        }
    };

    for leaf in statement.leaves() {
        println!("{leaf}");
    }
    Ok(())
}
