use tracing::warn;

use super::chain::Ledger;

impl Ledger {
    /// Replays the chain from the first non-genesis block, checking each
    /// link and each block's own hash and transactions. Genesis itself is
    /// taken as given.
    pub fn is_valid(&self) -> bool {
        for (index, pair) in self.chain().windows(2).enumerate() {
            let (previous, current) = (&pair[0], &pair[1]);

            if current.previous_hash != previous.hash {
                warn!(
                    "Chain broken at height {}: expected previous hash {}, found {}",
                    index + 1,
                    previous.hash,
                    current.previous_hash
                );
                return false;
            }

            if !current.is_valid() {
                warn!("Block at height {} failed validation", index + 1);
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;
    use crate::transaction::Transaction;

    fn two_block_ledger() -> Ledger {
        let mut ledger = Ledger::new(1, 50).unwrap();
        let keypair = KeyPair::generate();
        let mut tx = Transaction::transfer(keypair.address(), "bob", 10);
        tx.sign(&keypair).unwrap();
        ledger.add_transaction(tx).unwrap();
        ledger.mine_pending("miner");
        ledger.mine_pending("miner");
        ledger
    }

    #[test]
    fn test_fresh_chain_is_valid() {
        assert!(Ledger::new(1, 50).unwrap().is_valid());
        assert!(two_block_ledger().is_valid());
    }

    #[test]
    fn test_broken_link_detected() {
        let mut ledger = two_block_ledger();
        ledger.chain_mut()[2].previous_hash = "f".repeat(64);
        assert!(!ledger.is_valid());
    }

    #[test]
    fn test_remined_block_still_breaks_successor_link() {
        let mut ledger = two_block_ledger();
        ledger.chain_mut()[1].transactions[1] = Transaction::reward("thief", 50);
        ledger.chain_mut()[1].mine(1);
        assert!(ledger.chain()[1].is_valid());
        assert!(!ledger.is_valid());
    }

    #[test]
    fn test_tampered_reward_amount_detected() {
        let mut ledger = two_block_ledger();
        if let Transaction::Reward(reward) = &mut ledger.chain_mut()[2].transactions[0] {
            reward.amount = 1_000_000;
        }
        assert!(!ledger.is_valid());
    }

    #[test]
    fn test_genesis_internals_not_rechecked() {
        let mut ledger = two_block_ledger();
        ledger.chain_mut()[0].nonce += 1;
        assert!(!ledger.chain()[0].is_valid());
        assert!(ledger.is_valid());
    }
}
