//! Proof-of-work search, in-thread or on a dedicated worker
//!
//! [`Block::mine`] blocks its caller until a nonce is found. When mining has
//! to share a process with other work, [`spawn_miner`] moves the search onto
//! its own thread and hands back a [`MinerHandle`] that can stop it.

use crate::blockchain::Block;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info};

/// Nonces tried between checks of the stop flag.
const CANCEL_CHECK_INTERVAL: u64 = 4096;

/// Walks nonces from the block's current one until its hash meets
/// `difficulty` or `stop` is raised. Returns the number of hashes computed.
pub(crate) fn search(block: &mut Block, difficulty: usize, stop: Option<&AtomicBool>) -> u64 {
    block.hash = block.compute_hash();
    let mut attempts = 1;

    while !block.meets_difficulty(difficulty) {
        if attempts % CANCEL_CHECK_INTERVAL == 0 {
            if let Some(stop) = stop {
                if stop.load(Ordering::Relaxed) {
                    break;
                }
            }
        }
        block.nonce = block.nonce.wrapping_add(1);
        block.hash = block.compute_hash();
        attempts += 1;
    }
    attempts
}

/// Mines an owned block and returns it sealed.
pub fn mine_block(mut block: Block, difficulty: usize) -> Block {
    block.mine(difficulty);
    block
}

/// Mines until the hash meets `difficulty`, or returns `None` once `stop` is set.
pub fn mine_cancellable(mut block: Block, difficulty: usize, stop: &AtomicBool) -> Option<Block> {
    let attempts = search(&mut block, difficulty, Some(stop));
    if block.meets_difficulty(difficulty) {
        debug!("Worker found nonce {} after {} attempts", block.nonce, attempts);
        Some(block)
    } else {
        info!("Mining cancelled after {} attempts", attempts);
        None
    }
}

pub struct MinerHandle {
    stop: Arc<AtomicBool>,
    worker: JoinHandle<Option<Block>>,
}

impl MinerHandle {
    /// Asks the worker to give up; `join` then yields `None` unless it had
    /// already found a nonce.
    pub fn cancel(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Waits for the worker. A panicked worker is reported as `None`.
    pub fn join(self) -> Option<Block> {
        self.worker.join().ok().flatten()
    }
}

/// Runs the search for `block` on a new thread.
pub fn spawn_miner(block: Block, difficulty: usize) -> MinerHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let worker_stop = Arc::clone(&stop);
    let worker = thread::spawn(move || mine_cancellable(block, difficulty, &worker_stop));
    MinerHandle { stop, worker }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::MAX_DIFFICULTY;
    use crate::transaction::Transaction;

    fn reward_block() -> Block {
        Block::new(42, vec![Transaction::reward("miner", 50)], "0")
    }

    #[test]
    fn test_mine_block_returns_sealed_block() {
        let block = mine_block(reward_block(), 2);
        assert!(block.hash.starts_with("00"));
        assert!(block.is_valid());
    }

    #[test]
    fn test_mine_cancellable_without_cancel_succeeds() {
        let stop = AtomicBool::new(false);
        let block = mine_cancellable(reward_block(), 1, &stop).unwrap();
        assert!(block.meets_difficulty(1));
    }

    #[test]
    fn test_mine_cancellable_stops_when_flag_is_set() {
        let stop = AtomicBool::new(true);
        assert!(mine_cancellable(reward_block(), MAX_DIFFICULTY, &stop).is_none());
    }

    #[test]
    fn test_spawned_miner_finds_nonce() {
        let handle = spawn_miner(reward_block(), 2);
        let block = handle.join().unwrap();
        assert!(block.hash.starts_with("00"));
        assert_eq!(block.hash, block.compute_hash());
    }

    #[test]
    fn test_spawned_miner_can_be_cancelled() {
        let handle = spawn_miner(reward_block(), MAX_DIFFICULTY);
        handle.cancel();
        assert!(handle.join().is_none());
    }
}
