/// Transaction types for proofchain
use crate::crypto::{Address, KeyPair, Sha256Hash};
use crate::error::ChainError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Whole-unit amount moved or minted by a transaction.
pub type Amount = u64;

const TRANSFER_TAG: &[u8] = b"transfer";
const REWARD_TAG: &[u8] = b"reward";

/// Variable-length fields are length-prefixed so that no two distinct
/// (kind, sender, receiver) triples feed the hasher the same bytes.
fn content_hash(kind: &[u8], sender: &[u8], receiver: &Address, amount: Amount) -> Sha256Hash {
    let mut hasher = Sha256::new();
    update_prefixed(&mut hasher, kind);
    update_prefixed(&mut hasher, sender);
    update_prefixed(&mut hasher, receiver.as_str().as_bytes());
    hasher.update(amount.to_le_bytes());
    hasher.finalize().into()
}

pub(crate) fn update_prefixed(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

/// A transaction that can occur in a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transaction {
    Transfer(TransferTx),
    Reward(RewardTx),
}

impl Transaction {
    pub fn transfer(
        sender: impl Into<Address>,
        receiver: impl Into<Address>,
        amount: Amount,
    ) -> Self {
        Transaction::Transfer(TransferTx::new(sender.into(), receiver.into(), amount))
    }

    pub fn reward(receiver: impl Into<Address>, amount: Amount) -> Self {
        Transaction::Reward(RewardTx {
            receiver: receiver.into(),
            amount,
        })
    }

    /// Rewards have no sender.
    pub fn sender(&self) -> Option<&Address> {
        match self {
            Transaction::Transfer(tx) => Some(&tx.sender),
            Transaction::Reward(_) => None,
        }
    }

    pub fn receiver(&self) -> &Address {
        match self {
            Transaction::Transfer(tx) => &tx.receiver,
            Transaction::Reward(tx) => &tx.receiver,
        }
    }

    pub fn amount(&self) -> Amount {
        match self {
            Transaction::Transfer(tx) => tx.amount,
            Transaction::Reward(tx) => tx.amount,
        }
    }

    pub fn is_reward(&self) -> bool {
        matches!(self, Transaction::Reward(_))
    }

    pub fn signature(&self) -> Option<&str> {
        match self {
            Transaction::Transfer(tx) => tx.signature.as_deref(),
            Transaction::Reward(_) => None,
        }
    }

    /// Content hash over (sender, receiver, amount). Recomputed on every call.
    pub fn hash(&self) -> Sha256Hash {
        match self {
            Transaction::Transfer(tx) => tx.hash(),
            Transaction::Reward(tx) => content_hash(REWARD_TAG, &[], &tx.receiver, tx.amount),
        }
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash())
    }

    /// Signs a transfer with the sender's key. Rewards cannot be signed.
    pub fn sign(&mut self, keypair: &KeyPair) -> Result<(), ChainError> {
        match self {
            Transaction::Transfer(tx) => tx.sign(keypair),
            Transaction::Reward(_) => Err(ChainError::Authorization(
                "Reward transactions have no sender to sign for".to_string(),
            )),
        }
    }
}

/// Reward transaction: value minted for the producer of a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardTx {
    pub receiver: Address,
    pub amount: Amount,
}

/// Transfer transaction: moves value from one account to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferTx {
    pub sender: Address,
    pub receiver: Address,
    pub amount: Amount,
    /// Hex DER signature over the content hash.
    #[serde(default)]
    pub signature: Option<String>,
}

impl TransferTx {
    pub fn new(sender: Address, receiver: Address, amount: Amount) -> Self {
        TransferTx {
            sender,
            receiver,
            amount,
            signature: None,
        }
    }

    pub fn hash(&self) -> Sha256Hash {
        content_hash(
            TRANSFER_TAG,
            self.sender.as_str().as_bytes(),
            &self.receiver,
            self.amount,
        )
    }

    pub fn sign(&mut self, keypair: &KeyPair) -> Result<(), ChainError> {
        let signer = keypair.address();
        if signer != self.sender {
            return Err(ChainError::Authorization(format!(
                "Cannot sign a transfer from {} with the key for {}",
                self.sender, signer
            )));
        }

        let signature = keypair.sign_digest(&self.hash());
        self.signature = Some(hex::encode(signature));
        Ok(())
    }
}
