use crate::error::{ChainError, Result};

use super::chain::{Block, Digest, SOURCE_ADDRESS};
use super::state::{Balances, LedgerState};

/// Verify a chain and return the resulting balances.
///
/// Each block is checked in this order: the sender can cover the amount,
/// the recipient is not the source address, and `prev_hash` matches the hash
/// of the previous block (0 for the first). The first failure is returned.
pub fn verify_blockchain(blockchain: &[Block]) -> Result<Balances> {
    let mut state = LedgerState::new();
    let mut expected_prev_hash: Digest = 0;

    for (j, b) in blockchain.iter().enumerate() {
        state.ensure_funds(j, b)?;

        if b.to_addr == SOURCE_ADDRESS {
            return Err(ChainError::InvalidBlock(format!(
                "Line {}: Account {:#016x} tried to send to address {:#016x}",
                j, b.from_addr, SOURCE_ADDRESS
            )));
        }

        if b.prev_hash != expected_prev_hash {
            return Err(ChainError::InvalidBlock(format!(
                "Line {}: Prev hash was expected to be {:#016x}, not {:#016x}",
                j, expected_prev_hash, b.prev_hash
            )));
        }

        expected_prev_hash = b.hash();
        state.transfer(j, b)?;
        tracing::debug!(block = j, from = b.from_addr, to = b.to_addr, amount = b.amount, "block accepted");
    }

    tracing::info!(blocks = blockchain.len(), accounts = state.balances.len(), "blockchain verified");
    Ok(state.into_balances())
}
