/// Validation logic for transactions separated from type definitions
use crate::error::ChainError;
use crate::transaction::types::{Transaction, TransferTx};
use tracing::debug;

impl Transaction {
    /// Rewards are minted by the ledger itself and always pass.
    /// Transfers must carry a signature that verifies against their sender.
    pub fn is_valid(&self) -> Result<bool, ChainError> {
        match self {
            Transaction::Reward(_) => Ok(true),
            Transaction::Transfer(tx) => tx.is_valid(),
        }
    }
}

impl TransferTx {
    /// `Err(MissingSignature)` when unsigned. A malformed signature or sender
    /// key is reported as `Ok(false)`, the same as a signature that does not
    /// verify.
    pub fn is_valid(&self) -> Result<bool, ChainError> {
        let signature_hex = match self.signature.as_deref() {
            Some(sig) if !sig.is_empty() => sig,
            _ => return Err(ChainError::MissingSignature),
        };

        let signature = match hex::decode(signature_hex) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!("Transfer from {} has non-hex signature: {}", self.sender, e);
                return Ok(false);
            }
        };

        match crate::crypto::verify_digest(self.sender.as_str(), &self.hash(), &signature) {
            Ok(()) => Ok(true),
            Err(e) => {
                debug!("Transfer from {} failed verification: {}", self.sender, e);
                Ok(false)
            }
        }
    }
}
