//! blockfund - toolkit for the Blockchain Fundamentals course
//!
//! # Architecture
//!
//! ## Topics
//! - [`hashing`] - BillHash, a teaching Merkle–Damgård hash (plus SHA-256 for comparison)
//! - [`crypto`] - Toy RSA key generation, signing and verification
//! - [`blockchain`] - Billcoin ledger: parsing, verification and interactive building
//!
//! ## Course tooling
//! - [`course`] - Exercise/solution pairing and TODO ordering checks
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//! - [`cli`] - Shared CLI helpers

#![forbid(unsafe_code)]

// ============================================================================
// Topics
// ============================================================================
pub mod blockchain;
pub mod crypto;
pub mod hashing;

// ============================================================================
// Course Tooling
// ============================================================================
pub mod course;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod cli;
pub mod config;
pub mod error;
