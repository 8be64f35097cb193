//! proofchain - a minimal proof-of-work ledger with signed transactions
//!
//! # Architecture
//!
//! ## Core Ledger
//! - [`blockchain`] - Blocks, the ledger, balance replay and chain validation
//! - [`transaction`] - Reward and transfer transactions, signing and validation
//!
//! ## Consensus
//! - [`miner`] - Proof-of-work search, including a cancellable worker
//!
//! ## Cryptography
//! - [`crypto`] - SHA-256 digests and secp256k1 signatures
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod blockchain;
pub mod transaction;

// ============================================================================
// Consensus & Mining
// ============================================================================
pub mod miner;

// ============================================================================
// Cryptography
// ============================================================================
pub mod crypto;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;

pub use blockchain::{Balance, Block, Ledger};
pub use crypto::{Address, KeyPair};
pub use error::{ChainError, Result};
pub use transaction::Transaction;
