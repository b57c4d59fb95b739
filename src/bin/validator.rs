//! Design-File Validator CLI
//!
//! Validates an LWC design file, injects schema defaults, checks semantic
//! invariants, and optionally re-serializes the document.

use std::path::PathBuf;

use clap::Parser;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use lwc_design::{
    check_invariants, check_source_paths, format, inject_defaults, validate, DesignCheckConfig,
    SchemaDocument,
};

#[derive(Parser)]
#[command(name = "design-validator")]
#[command(about = "Validate LWC design files against the design schema")]
struct Cli {
    /// Path to the design file (.json, .toml, or .yaml)
    design_file: PathBuf,

    /// Schema document overriding the built-in one
    #[arg(long)]
    schema_file: Option<PathBuf>,

    /// Write the validated, defaulted document as JSON
    #[arg(long)]
    write_json: Option<PathBuf>,

    /// Write the validated, defaulted document as YAML
    #[arg(long)]
    write_yaml: Option<PathBuf>,

    /// Write the validated, defaulted document as TOML
    #[arg(long)]
    write_toml: Option<PathBuf>,

    /// Check that every listed RTL/testbench path names an existing file
    #[arg(long)]
    check_paths: bool,

    /// Dump the defaulted document to the console
    #[arg(long)]
    verbose: bool,

    /// Explicit configuration file
    #[arg(long)]
    config: Option<String>,
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
    let config = DesignCheckConfig::load_from(cli.config.as_deref())?;

    let schema_source = cli.schema_file.or(config.schema.file);
    let schema_value: Value = match &schema_source {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => serde_json::from_str(lwc_design::DEFAULT_SCHEMA)?,
    };
    let schema = SchemaDocument::prepare(&schema_value)?;

    let mut design = format::load_design(&cli.design_file)?;
    inject_defaults(&schema, &mut design)?;

    let issues = validate(&schema, &design)?;
    if !issues.is_empty() {
        for issue in &issues {
            println!("{issue}");
        }
        println!("Design file is INVALID");
        std::process::exit(1);
    }

    check_invariants(&design)?;

    if cli.check_paths || config.check.paths {
        check_source_paths(&design)?;
    }

    if cli.verbose || config.output.verbose {
        dump(&design)?;
    }

    println!("Design file is VALID");

    if let Some(path) = &cli.write_json {
        format::write_json(&design, path)?;
    }
    if let Some(path) = &cli.write_yaml {
        format::write_yaml(&design, path)?;
    }
    if let Some(path) = &cli.write_toml {
        format::write_toml(&design, path)?;
    }

    Ok(())
}

/// Print the full defaulted document plus each section's parameters
/// sub-map as formatted JSON.
fn dump(design: &Value) -> anyhow::Result<()> {
    println!("{}", format::to_json_string(design)?);
    for section in ["rtl", "tb"] {
        if let Some(parameters) = design.get(section).and_then(|s| s.get("parameters")) {
            println!("{section}.parameters = {}", format::to_json_string(parameters)?);
        }
    }
    Ok(())
}
