use std::fs::read;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use confidential_args::{SchemaRegistry, deserialize_registry};

#[derive(Parser, Debug)]
struct Args {
    #[arg(short, long)]
    registry_path: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let bytes = read(&args.registry_path)
        .map_err(|e| anyhow!("failed to read registry file '{}': {e}", args.registry_path))?;
    let schemas = deserialize_registry(&bytes)
        .map_err(|e| anyhow!("failed to parse registry file '{}': {e}", args.registry_path))?;
    let registry = SchemaRegistry::from_schemas(schemas)
        .with_context(|| format!("invalid registry file '{}'", args.registry_path))?;

    for schema in registry.schemas() {
        println!(
            "{}: {} parameters, {} argument tags, {} outputs",
            schema.computation(),
            schema.parameters().len(),
            schema.total_arity(),
            schema.outputs().len()
        );
    }

    Ok(())
}
