// core.rs splits ledger responsibilities into submodules.
pub mod block;
pub mod chain;
pub mod state;
pub mod validation;

pub use block::*;
pub use chain::*;
pub use state::*;
