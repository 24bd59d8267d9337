//! Reading framed inputs and writing the decoded report.
//!
//! Invocations, registry files and account snapshots share one framing, so a
//! single reader checks the header of each before the payload is touched.

use std::{
    fmt,
    fs::{File, write},
    io::{self, BufReader, Read, Write},
    path::Path,
};

use anyhow::{Context, Result};
use confidential_args::{
    HEADER_SIZE, PeekError, peek_accounts_version, peek_invocation_version,
    peek_registry_version,
};

/// Which framed payload an input is expected to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputKind {
    Invocation,
    Registry,
    Accounts,
}

impl InputKind {
    fn peek(self, header: &[u8]) -> Result<u32, PeekError> {
        match self {
            InputKind::Invocation => peek_invocation_version(header),
            InputKind::Registry => peek_registry_version(header),
            InputKind::Accounts => peek_accounts_version(header),
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InputKind::Invocation => "invocation",
            InputKind::Registry => "registry",
            InputKind::Accounts => "accounts",
        })
    }
}

/// A framed input whose header has been validated.
#[derive(Debug)]
pub(crate) struct FramedInput {
    /// Header and payload.
    pub bytes: Vec<u8>,
    /// File path, or "stdin".
    pub source: String,
    pub version: u32,
}

fn read_framed(
    mut reader: impl Read,
    kind: InputKind,
    source: String,
    capacity: usize,
) -> Result<FramedInput> {
    let mut header = [0u8; HEADER_SIZE];
    reader
        .read_exact(&mut header)
        .with_context(|| format!("{kind} input '{source}' is shorter than its header"))?;
    let version = kind
        .peek(&header)
        .with_context(|| format!("invalid {kind} header in '{source}'"))?;

    let mut bytes = Vec::with_capacity(capacity.max(HEADER_SIZE));
    bytes.extend_from_slice(&header);
    reader
        .read_to_end(&mut bytes)
        .with_context(|| format!("failed to read {kind} payload from '{source}'"))?;
    Ok(FramedInput {
        bytes,
        source,
        version,
    })
}

/// Read a framed input from `path`, or from stdin when no path is given.
pub(crate) fn read_input(kind: InputKind, path: Option<&Path>) -> Result<FramedInput> {
    let Some(path) = path else {
        return read_framed(io::stdin().lock(), kind, "stdin".to_string(), 0);
    };

    let file = File::open(path)
        .with_context(|| format!("failed to read {kind} file '{}'", path.display()))?;
    // Capacity hint only.
    let capacity = file.metadata().map_or(0, |m| m.len() as usize);
    read_framed(
        BufReader::new(file),
        kind,
        path.display().to_string(),
        capacity,
    )
}

/// Write output bytes to a file or stdout.
pub(crate) fn write_output(output_path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match output_path {
        Some(path) => {
            write(path, bytes)
                .with_context(|| format!("failed to write output file '{}'", path.display()))?;
        }
        None => {
            io::stdout()
                .write_all(bytes)
                .context("failed to write to stdout")?;
        }
    }
    Ok(())
}
