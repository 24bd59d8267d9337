mod cli;
mod io;
mod loader;

use anyhow::{Context, Result};
use clap::Parser;
use confidential_args::{
    DecodedValue, decode_invocation, deserialize_invocation_payload, serialize_decoded,
};
use log::info;

use crate::cli::Args;
use crate::io::{InputKind, read_input, write_output};
use crate::loader::{load_accounts, load_registry};

fn describe(value: &DecodedValue) -> String {
    match value {
        DecodedValue::Scalar { bit_width, value } => format!("{bit_width} {value}"),
        DecodedValue::OwnedCiphertext {
            nonce, ciphertext, ..
        } => format!(
            "owned ciphertext of {} bytes, nonce {nonce:#x}",
            ciphertext.len()
        ),
        DecodedValue::SharedCiphertext {
            owner,
            nonce,
            ciphertext,
            ..
        } => format!(
            "shared ciphertext of {} bytes for {owner}, nonce {nonce:#x}",
            ciphertext.len()
        ),
        DecodedValue::SharedContext { recipient, nonce } => {
            format!("output context for {recipient}, nonce {nonce:#x}")
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let registry = load_registry(args.registry.as_deref())?;
    let accounts = load_accounts(&args.accounts)?;
    info!(
        "Loaded {} accounts from '{}'",
        accounts.len(),
        args.accounts.display()
    );

    let input = read_input(InputKind::Invocation, args.invocation.as_deref())?;
    let source = input.source;
    let invocation = deserialize_invocation_payload(&input.bytes, input.version)
        .with_context(|| format!("failed to deserialize invocation from '{source}'"))?;
    info!(
        "Read invocation of '{}' with {} argument tags from '{source}'",
        invocation.computation,
        invocation.arguments.len()
    );

    let decoded = decode_invocation(&registry, &invocation, &accounts).with_context(|| {
        format!(
            "failed to decode arguments of '{}' from '{source}'",
            invocation.computation
        )
    })?;
    for param in &decoded {
        info!("Parameter '{}': {}", param.name, describe(&param.value));
    }

    let output_bytes =
        serialize_decoded(&decoded).context("failed to serialize decoded arguments")?;
    write_output(args.output.as_deref(), &output_bytes)?;

    Ok(())
}
