// core.rs splits the ledger into chain layout, balance state and verification.
pub mod chain;
pub mod state;
pub mod validation;

pub use chain::*;
pub use state::*;
pub use validation::*;
