//! Registry and account snapshot loading.

use std::path::Path;

use anyhow::{Context, Result};
use confidential_args::{
    InMemoryAccounts, SchemaRegistry, banking::banking_registry, deserialize_accounts_payload,
    deserialize_registry_payload,
};
use log::info;

use crate::io::{InputKind, read_input};

/// Load a registry file, or the built-in banking computations when no path is given.
pub(crate) fn load_registry(registry_path: Option<&Path>) -> Result<SchemaRegistry> {
    let Some(path) = registry_path else {
        info!("No registry file given, using the banking computations");
        return banking_registry().context("failed to publish banking computations");
    };

    let input = read_input(InputKind::Registry, Some(path))?;
    let schemas = deserialize_registry_payload(&input.bytes, input.version)
        .with_context(|| format!("failed to deserialize registry from '{}'", input.source))?;
    let registry = SchemaRegistry::from_schemas(schemas)
        .with_context(|| format!("failed to publish schemas from '{}'", input.source))?;
    info!(
        "Loaded {} computations from registry file '{}'",
        registry.len(),
        input.source
    );
    Ok(registry)
}

/// Load an account snapshot.
pub(crate) fn load_accounts(accounts_path: &Path) -> Result<InMemoryAccounts> {
    let input = read_input(InputKind::Accounts, Some(accounts_path))?;
    deserialize_accounts_payload(&input.bytes, input.version)
        .with_context(|| format!("failed to deserialize accounts from '{}'", input.source))
}
