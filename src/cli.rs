//! Helpers shared by the blockfund binaries

use crate::blockchain::{funded_accounts, Balances};
use crate::config::{load_config, Config};
use crate::course::{Course, Topic};
use crate::error::Result;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "blockfund=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A second init (e.g. from tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load configuration, optionally overriding the course root.
pub fn load_config_with_root(config_path: Option<&Path>, root: Option<PathBuf>) -> Result<Config> {
    let mut config = load_config(config_path)?;
    if let Some(root) = root {
        config.course.root = root;
    }
    Ok(config)
}

pub fn load_course(config_path: Option<&Path>, root: Option<PathBuf>) -> Result<Course> {
    let config = load_config_with_root(config_path, root)?;
    Course::discover(&config.course)
}

/// Funded accounts as `0x... : N billcoins` lines, in address order. This is
/// the layout of the course's sample output.
pub fn balance_lines(balances: &Balances) -> Vec<String> {
    funded_accounts(balances)
        .map(|(address, amount)| format!("{:#016x} : {} billcoins", address, amount))
        .collect()
}

/// Funded accounts as a table, in address order.
pub fn balances_table(balances: &Balances) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Address", "Billcoins"]);
    for (address, amount) in funded_accounts(balances) {
        table.add_row(vec![format!("{:#016x}", address), amount.to_string()]);
    }
    table
}

pub fn topics_table(topics: &[Topic]) -> Table {
    let mark = |present: bool| if present { "yes" } else { "missing" };

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Topic", "Exercise", "Solution"]);
    for topic in topics {
        table.add_row(vec![
            topic.ordinal.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string()),
            topic.name.clone(),
            mark(topic.exercise.is_some()).to_string(),
            mark(topic.solution.is_some()).to_string(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_lines_match_sample_output() {
        let mut balances = Balances::new();
        balances.insert(0, 0);
        balances.insert(0xB, 25);
        balances.insert(0xA, 60);
        balances.insert(0xC, 0);

        assert_eq!(
            balance_lines(&balances),
            vec![
                "0x0000000000000a : 60 billcoins".to_string(),
                "0x0000000000000b : 25 billcoins".to_string(),
            ]
        );
    }

    #[test]
    fn test_balances_table_lists_funded_accounts_only() {
        let mut balances = Balances::new();
        balances.insert(0, 0);
        balances.insert(0xA, 60);
        balances.insert(0xB, 0);

        let rendered = balances_table(&balances).to_string();
        assert!(rendered.contains("0x0000000000000a"));
        assert!(rendered.contains("60"));
        assert!(!rendered.contains("0x0000000000000b"));
    }
}
