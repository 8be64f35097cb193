use crate::crypto::Sha256Hash;
use crate::miner;
use crate::transaction::types::update_prefixed;
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Longest prefix a hex SHA-256 digest can have; higher difficulties never finish.
pub const MAX_DIFFICULTY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub transactions: Vec<Transaction>,
    pub previous_hash: String,
    pub nonce: u64,
    pub hash: String,
}

impl Block {
    /// Builds an unmined block at nonce 0 with its hash already computed.
    pub fn new(
        timestamp: u64,
        transactions: Vec<Transaction>,
        previous_hash: impl Into<String>,
    ) -> Self {
        let mut block = Block {
            timestamp,
            transactions,
            previous_hash: previous_hash.into(),
            nonce: 0,
            hash: String::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// Hex SHA-256 binding the timestamp, every transaction (content hash and
    /// signature), the previous hash and the nonce.
    pub fn compute_hash(&self) -> String {
        hex::encode(self.digest())
    }

    fn digest(&self) -> Sha256Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.timestamp.to_le_bytes());
        update_prefixed(&mut hasher, self.previous_hash.as_bytes());
        hasher.update((self.transactions.len() as u64).to_le_bytes());
        for tx in &self.transactions {
            hasher.update(tx.hash());
            update_prefixed(&mut hasher, tx.signature().unwrap_or_default().as_bytes());
        }
        hasher.update(self.nonce.to_le_bytes());
        hasher.finalize().into()
    }

    /// True when the stored hash starts with `difficulty` hex zeros.
    pub fn meets_difficulty(&self, difficulty: usize) -> bool {
        hash_meets_difficulty(&self.hash, difficulty)
    }

    /// Proof-of-work search. Runs until a nonce satisfies `difficulty`; there
    /// is no timeout, and difficulties above [`MAX_DIFFICULTY`] never return.
    pub fn mine(&mut self, difficulty: usize) {
        let attempts = miner::search(self, difficulty, None);
        debug!(
            "Mined block with nonce {} after {} attempts: {}",
            self.nonce, attempts, self.hash
        );
    }

    /// False on a stale hash or on any transaction that does not validate.
    pub fn is_valid(&self) -> bool {
        if self.compute_hash() != self.hash {
            debug!("Block {} does not match its contents", self.hash);
            return false;
        }

        for tx in &self.transactions {
            match tx.is_valid() {
                Ok(true) => {}
                Ok(false) => {
                    debug!(
                        "Block {} holds transaction {} with a bad signature",
                        self.hash,
                        tx.hash_hex()
                    );
                    return false;
                }
                Err(e) => {
                    debug!(
                        "Block {} holds invalid transaction {}: {}",
                        self.hash,
                        tx.hash_hex(),
                        e
                    );
                    return false;
                }
            }
        }

        true
    }
}

pub fn hash_meets_difficulty(hash: &str, difficulty: usize) -> bool {
    hash.len() >= difficulty && hash.bytes().take(difficulty).all(|b| b == b'0')
}
