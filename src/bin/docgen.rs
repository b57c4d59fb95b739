//! Design-Schema Documentation CLI
//!
//! Renders the design schema as a Markdown document, one bullet per
//! property at its nesting depth.

use std::path::PathBuf;

use clap::Parser;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use lwc_design::{DocGenerator, SchemaDocument};

#[derive(Parser)]
#[command(name = "design-doc")]
#[command(about = "Render the design schema as Markdown documentation")]
struct Cli {
    /// Schema document overriding the built-in one
    #[arg(long)]
    schema_file: Option<PathBuf>,

    /// Output file
    #[arg(long, default_value = "lwc_design_doc.md")]
    output: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let schema_value: Value = match &cli.schema_file {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => serde_json::from_str(lwc_design::DEFAULT_SCHEMA)?,
    };
    let schema = SchemaDocument::prepare(&schema_value)?;

    let markdown = DocGenerator::new(&schema).generate()?;
    std::fs::write(&cli.output, markdown)?;
    println!("✅ Documentation written to {}", cli.output.display());

    Ok(())
}
