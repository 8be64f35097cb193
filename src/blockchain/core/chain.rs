use crate::config::LedgerConfig;
use crate::crypto::Address;
use crate::error::ChainError;
use crate::transaction::{Amount, Transaction};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::miner::mine_block;

use super::block::{Block, MAX_DIFFICULTY};

/// Previous-hash sentinel carried by the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";
/// 2024-01-01T00:00:00Z in milliseconds.
pub const GENESIS_TIMESTAMP: u64 = 1_704_067_200_000;
pub const DEFAULT_DIFFICULTY: usize = 5;
pub const DEFAULT_MINING_REWARD: Amount = 50;

/// Append-only chain of mined blocks plus the pool of transactions waiting
/// for the next one.
///
/// A `Ledger` has a single writer. `add_transaction` and `mine_pending` both
/// mutate the pool, so callers sharing one across threads must serialize
/// access themselves.
///
/// `chain` is never empty: it starts at genesis and only grows. The pool is
/// private so `add_transaction` stays the only way into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub difficulty: usize,
    chain: Vec<Block>,
    pending_transactions: Vec<Transaction>,
    pub mining_reward: Amount,
}

impl Ledger {
    /// Creates a ledger holding only its genesis block, mined at `difficulty`.
    pub fn new(difficulty: usize, mining_reward: Amount) -> Result<Self, ChainError> {
        Self::with_genesis_timestamp(difficulty, mining_reward, GENESIS_TIMESTAMP)
    }

    pub fn from_config(config: &LedgerConfig) -> Result<Self, ChainError> {
        Self::with_genesis_timestamp(
            config.difficulty,
            config.mining_reward,
            config.genesis_timestamp,
        )
    }

    fn with_genesis_timestamp(
        difficulty: usize,
        mining_reward: Amount,
        genesis_timestamp: u64,
    ) -> Result<Self, ChainError> {
        if difficulty > MAX_DIFFICULTY {
            return Err(ChainError::Config(format!(
                "Difficulty {} exceeds maximum {}",
                difficulty, MAX_DIFFICULTY
            )));
        }

        let genesis = Self::create_genesis(genesis_timestamp, difficulty);
        info!(
            "Created ledger with genesis {} (difficulty {})",
            genesis.hash, difficulty
        );

        Ok(Ledger {
            difficulty,
            chain: vec![genesis],
            pending_transactions: Vec::new(),
            mining_reward,
        })
    }

    /// Fixed first block: no transactions, sentinel previous hash, fixed time.
    pub fn create_genesis(timestamp: u64, difficulty: usize) -> Block {
        mine_block(
            Block::new(timestamp, Vec::new(), GENESIS_PREVIOUS_HASH),
            difficulty,
        )
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    /// Blocks can be edited in place but not added or removed, so the chain
    /// keeps its genesis. Edits show up as `is_valid() == false`.
    pub fn chain_mut(&mut self) -> &mut [Block] {
        &mut self.chain
    }

    pub fn pending_transactions(&self) -> &[Transaction] {
        &self.pending_transactions
    }

    pub fn latest_block(&self) -> &Block {
        // Non-empty by construction and by the `from_json` check.
        &self.chain[self.chain.len() - 1]
    }

    /// Number of blocks mined on top of genesis.
    pub fn height(&self) -> usize {
        self.chain.len().saturating_sub(1)
    }

    /// Queues a signed transfer for the next block.
    ///
    /// Rewards are refused here because they have no sender; only
    /// `mine_pending` mints them.
    pub fn add_transaction(&mut self, tx: Transaction) -> Result<(), ChainError> {
        let has_sender = tx.sender().is_some_and(|sender| !sender.is_empty());
        if !has_sender || tx.receiver().is_empty() {
            warn!("Rejected transaction {}: missing sender or receiver", tx.hash_hex());
            return Err(ChainError::Validation(
                "Transaction must have sender and receiver addresses".to_string(),
            ));
        }

        if !tx.is_valid()? {
            warn!("Rejected transaction {}: signature does not verify", tx.hash_hex());
            return Err(ChainError::Validation(
                "Transaction must be valid to add it to the chain".to_string(),
            ));
        }

        self.pending_transactions.push(tx);
        Ok(())
    }

    /// Seals the pending pool into a new block.
    ///
    /// The reward for `reward_address` is pushed onto the pool before the
    /// snapshot, so it lands in the block it pays for.
    pub fn mine_pending(&mut self, reward_address: impl Into<Address>) -> &Block {
        let reward = Transaction::reward(reward_address, self.mining_reward);
        self.pending_transactions.push(reward);

        let transactions = std::mem::take(&mut self.pending_transactions);
        let timestamp = chrono::Utc::now().timestamp_millis() as u64;
        let block = mine_block(
            Block::new(timestamp, transactions, self.latest_block().hash.clone()),
            self.difficulty,
        );

        info!(
            "Block {} mined at height {} with {} transactions",
            block.hash,
            self.chain.len(),
            block.transactions.len()
        );
        self.chain.push(block);
        self.latest_block()
    }

    /// Writes the ledger as JSON. Blocks read back through
    /// [`Ledger::from_json`] are not trusted until `is_valid` says so.
    pub fn to_json(&self) -> Result<String, ChainError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restores a ledger snapshot. Pending transactions are replayed through
    /// `add_transaction`, so a snapshot whose pool holds an unsigned or
    /// forged transfer is rejected with that error.
    pub fn from_json(json: &str) -> Result<Self, ChainError> {
        let mut ledger: Ledger = serde_json::from_str(json)?;
        if ledger.chain.is_empty() {
            return Err(ChainError::Serialization(
                "Ledger snapshot has no genesis block".to_string(),
            ));
        }
        if ledger.difficulty > MAX_DIFFICULTY {
            return Err(ChainError::Serialization(format!(
                "Ledger snapshot difficulty {} exceeds maximum {}",
                ledger.difficulty, MAX_DIFFICULTY
            )));
        }

        for tx in std::mem::take(&mut ledger.pending_transactions) {
            ledger.add_transaction(tx)?;
        }
        Ok(ledger)
    }
}
