#![forbid(unsafe_code)]
//! Billcoin ledger: verify a chain file, or build a chain from stdin.

use blockfund::blockchain::{make_blockchain, pretty_print, read_blockchain_file, to_csv, verify_blockchain};
use blockfund::cli::{balance_lines, balances_table, init_logging};
use clap::Parser;
use colored::*;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Chain file to verify. Without it, blocks are read interactively and
    /// the chain is printed as CSV.
    file: Option<PathBuf>,
    /// Show balances as a table instead of one line per account
    #[arg(long)]
    table: bool,
    /// Log debug output to stderr
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(path) = cli.file else {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        let chain = make_blockchain(&mut input, &mut output)?;
        print!("{}", to_csv(&chain)?);
        return Ok(ExitCode::SUCCESS);
    };

    let chain = read_blockchain_file(&path)?;
    for line in pretty_print(&chain) {
        println!("{}", line);
    }

    match verify_blockchain(&chain) {
        Ok(balances) => {
            if cli.table {
                println!("{}", balances_table(&balances));
            } else {
                for line in balance_lines(&balances) {
                    println!("{}", line);
                }
            }
            println!("{}", "Blockchain valid!".bright_green());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("{} {}", "Blockchain invalid:".bright_red(), e);
            Ok(ExitCode::FAILURE)
        }
    }
}
