//! ontoc CLI
//!
//! Command-line front end for the ontology DSL compiler: reads a DSL file,
//! compiles it, and writes the generated Cypher to stdout or a file.
//! All diagnostics go to stderr so stdout stays clean for the output.

mod error;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use error::CliError;

/// Compiles ontology ETL DSL files to Cypher queries.
#[derive(Parser)]
#[command(name = "ontoc")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Input DSL file path.
    input: PathBuf,

    /// Output file path (stdout if not given).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// What to emit.
    #[arg(long, value_enum, default_value_t = Emit::Cypher)]
    emit: Emit,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

/// Selectable compiler outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Generated Cypher query text.
    Cypher,
    /// The parsed program as JSON, for debugging.
    Ast,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let source = std::fs::read_to_string(&cli.input).map_err(|source| CliError::ReadInput {
        path: cli.input.clone(),
        source,
    })?;

    info!("Parsing {}...", cli.input.display());
    let program = ontoc_core::parse(&source).map_err(CliError::Compile)?;
    info!("Parsed {} statements", program.statements.len());

    let rendered = match cli.emit {
        Emit::Cypher => {
            info!("Generating Cypher code...");
            ontoc_core::generate(&program)
        }
        Emit::Ast => serde_json::to_string_pretty(&program).map_err(CliError::Serialization)?,
    };

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &rendered).map_err(|source| CliError::WriteOutput {
                path: path.clone(),
                source,
            })?;
            info!("Written to {}", path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}
