#![forbid(unsafe_code)]
//! Toy RSA: generate a key pair, sign a message, verify a signature.

use blockfund::cli::init_logging;
use blockfund::config::load_config;
use blockfund::crypto::{generate_key_pair_below, sign_message, verify_signature};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Configuration file (defaults to ./blockfund.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a public/private key pair
    Generate,
    /// Sign a message with a private key
    Sign {
        message: String,
        private_key_modulus: u32,
        private_key_exponent: u32,
    },
    /// Verify a signature against a message and public key
    Verify {
        message: String,
        signature: u32,
        public_key_modulus: u32,
        public_key_exponent: u32,
    },
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate => {
            let config = load_config(cli.config.as_deref())?;
            let mut rng = rand::thread_rng();
            let key_pair = generate_key_pair_below(&mut rng, config.keys.max_key_value)?;
            println!("{}", key_pair);
        }
        Commands::Sign {
            message,
            private_key_modulus,
            private_key_exponent,
        } => {
            let signature = sign_message(&message, private_key_modulus, private_key_exponent)?;
            println!("Signature: {}", signature);
        }
        Commands::Verify {
            message,
            signature,
            public_key_modulus,
            public_key_exponent,
        } => {
            if verify_signature(&message, signature, public_key_modulus, public_key_exponent)? {
                println!("{}", "Signature verified!".bright_green());
            } else {
                println!("{}", "SIGNATURE INVALID!".bright_red().bold());
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
