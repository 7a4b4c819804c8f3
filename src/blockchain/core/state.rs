use crate::error::{ChainError, Result};
use std::collections::BTreeMap;

use super::chain::{Address, Amount, Block, SOURCE_ADDRESS};

/// Billcoins held per address, ordered by address.
pub type Balances = BTreeMap<Address, Amount>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerState {
    pub balances: Balances,
}

impl LedgerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, address: Address) -> Amount {
        self.balances.get(&address).copied().unwrap_or(0)
    }

    /// Check that the sender of block `index` can cover its amount. The
    /// source address always can.
    pub fn ensure_funds(&self, index: usize, block: &Block) -> Result<()> {
        if block.from_addr == SOURCE_ADDRESS {
            return Ok(());
        }

        match self.balances.get(&block.from_addr) {
            None => Err(ChainError::InvalidBlock(format!(
                "Line {}: Account {:#016x} has 0 billcoins; it cannot send {}",
                index, block.from_addr, block.amount
            ))),
            Some(&held) if held < block.amount => Err(ChainError::InvalidBlock(format!(
                "Line {}: Account {:#016x} only has {} billcoins; it cannot send {}",
                index, block.from_addr, held, block.amount
            ))),
            Some(_) => Ok(()),
        }
    }

    /// Move the block's amount from sender to recipient. Nothing is ever
    /// debited from the source address.
    ///
    /// Both balances are read before either is written, so a block sending
    /// from an address to itself credits the amount once more.
    pub fn transfer(&mut self, index: usize, block: &Block) -> Result<()> {
        self.ensure_funds(index, block)?;

        let old_from = self.balance(block.from_addr);
        let old_to = self.balance(block.to_addr);

        let new_to = old_to.checked_add(block.amount).ok_or_else(|| {
            ChainError::InvalidBlock(format!(
                "Line {}: Account {:#016x} cannot hold {} more billcoins",
                index, block.to_addr, block.amount
            ))
        })?;

        if block.from_addr != SOURCE_ADDRESS {
            self.balances.insert(block.from_addr, old_from - block.amount);
        }
        self.balances.insert(block.to_addr, new_to);

        Ok(())
    }

    pub fn into_balances(self) -> Balances {
        self.balances
    }
}

/// Balances worth showing: everything except the source address and empty accounts.
pub fn funded_accounts(balances: &Balances) -> impl Iterator<Item = (Address, Amount)> + '_ {
    balances
        .iter()
        .map(|(&address, &amount)| (address, amount))
        .filter(|&(address, amount)| address != SOURCE_ADDRESS && amount != 0)
}
