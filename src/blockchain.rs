//! Billcoin: a minimal blockchain with one transaction per block, no
//! signatures and a plain 64-bit hash linking each block to the one before.
//!
//! Address `0x0` is the magic source every coin comes from. The
//! implementation lives in `blockchain/core.rs`.

pub mod core;
pub use self::core::*;
