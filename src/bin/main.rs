#![forbid(unsafe_code)]

use colored::*;

fn main() {
    println!("{}", "Blockchain Fundamentals".bright_cyan().bold());
    println!("{}", "-----------------------".bright_cyan());
    println!();
    println!(
        "{}",
        "Each course topic has its own binary.".yellow()
    );
    println!(
        "{}",
        "Use 'cargo run --bin <binary_name> -- --help' to see a tool's options.".yellow()
    );
    println!();
    println!("{}", "Available binaries:".bright_green().underline());
    println!("  - {}  {}", "blockfund-keys".bright_white(), "toy RSA keys, signing, verification");
    println!("  - {}  {}", "blockfund-hash".bright_white(), "BillHash (or SHA-256) of a string or file");
    println!("  - {}  {}", "blockfund-ledger".bright_white(), "verify or build a Billcoin chain");
    println!("  - {}  {}", "blockfund-course".bright_white(), "list and check exercise/solution topics");
    println!();
    println!("{}", "Example:".bright_green().underline());
    println!("{}", "  cargo run --bin blockfund-hash -- bill".italic());
}
