// Thin re-export module: implementation is in `blockchain/core.rs`, split
// into blocks, the ledger, balance replay and chain validation.

pub mod core;
pub use self::core::*;
