#![forbid(unsafe_code)]
//! Print the BillHash (or SHA-256) digest of a string or a file.

use blockfund::cli::init_logging;
use blockfund::hashing::HashAlgorithm;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The string to hash
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    input: Option<String>,
    /// Hash the contents of this file instead
    #[arg(long)]
    file: Option<PathBuf>,
    /// bill or sha256
    #[arg(long, short, default_value_t = HashAlgorithm::Bill)]
    algorithm: HashAlgorithm,
    /// Log debug output to stderr
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let data = match (&cli.input, &cli.file) {
        (_, Some(path)) => std::fs::read(path)?,
        (Some(input), None) => input.as_bytes().to_vec(),
        (None, None) => return Err("nothing to hash".into()),
    };

    tracing::debug!(algorithm = %cli.algorithm, bytes = data.len(), "hashing input");
    println!("Hash value: {}", cli.algorithm.digest_hex(&data));

    Ok(())
}
