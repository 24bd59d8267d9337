//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

/// Decode a transported invocation against its published schema.
#[derive(Parser, Debug)]
pub(crate) struct Args {
    /// Invocation file. If not specified, reads from stdin.
    #[arg(short, long)]
    pub invocation: Option<PathBuf>,

    /// Account snapshot used to resolve ciphertext references.
    #[arg(short, long)]
    pub accounts: PathBuf,

    /// Registry file. If not specified, the banking computations are used.
    #[arg(short, long)]
    pub registry: Option<PathBuf>,

    /// Output file. If not specified, writes to stdout.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}
