//! Balances derived by replaying the chain
//!
//! Nothing is cached: each query walks every transaction from genesis to the
//! tip, so cost grows with the total number of transactions ever mined.

use crate::crypto::Address;
use std::collections::HashMap;

use super::chain::Ledger;

/// Signed so that spending without prior income shows up as a debt.
pub type Balance = i128;

impl Ledger {
    /// Net of everything `address` received minus everything it sent.
    pub fn balance_of(&self, address: &Address) -> Balance {
        let mut balance: Balance = 0;

        for block in self.chain() {
            for tx in &block.transactions {
                if tx.sender() == Some(address) {
                    balance -= Balance::from(tx.amount());
                }
                if tx.receiver() == address {
                    balance += Balance::from(tx.amount());
                }
            }
        }

        balance
    }

    /// Every address that appears in the chain with its replayed balance.
    pub fn balances(&self) -> HashMap<Address, Balance> {
        let mut balances: HashMap<Address, Balance> = HashMap::new();

        for tx in self.chain().iter().flat_map(|block| &block.transactions) {
            if let Some(sender) = tx.sender() {
                *balances.entry(sender.clone()).or_insert(0) -= Balance::from(tx.amount());
            }
            *balances.entry(tx.receiver().clone()).or_insert(0) += Balance::from(tx.amount());
        }

        balances
    }

    /// Sum of all balances. Transfers cancel out, so this is the value minted
    /// by rewards.
    pub fn total_supply(&self) -> Balance {
        self.balances().values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;
    use crate::transaction::Transaction;

    #[test]
    fn test_unknown_address_has_zero_balance() {
        let ledger = Ledger::new(1, 50).unwrap();
        assert_eq!(ledger.balance_of(&Address::from("nobody")), 0);
        assert!(ledger.balances().is_empty());
    }

    #[test]
    fn test_pending_transactions_do_not_count() {
        let mut ledger = Ledger::new(1, 50).unwrap();
        let keypair = KeyPair::generate();
        let mut tx = Transaction::transfer(keypair.address(), "bob", 10);
        tx.sign(&keypair).unwrap();
        ledger.add_transaction(tx).unwrap();

        assert_eq!(ledger.balance_of(&Address::from("bob")), 0);
    }

    #[test]
    fn test_self_transfer_nets_to_zero() {
        let mut ledger = Ledger::new(1, 50).unwrap();
        let keypair = KeyPair::generate();
        let address = keypair.address();
        let mut tx = Transaction::transfer(address.clone(), address.clone(), 10);
        tx.sign(&keypair).unwrap();
        ledger.add_transaction(tx).unwrap();
        ledger.mine_pending("miner");

        assert_eq!(ledger.balance_of(&address), 0);
    }

    #[test]
    fn test_supply_grows_by_reward_per_block() {
        let mut ledger = Ledger::new(1, 50).unwrap();
        let keypair = KeyPair::generate();

        for round in 1..=3 {
            let mut tx = Transaction::transfer(keypair.address(), "bob", 7);
            tx.sign(&keypair).unwrap();
            ledger.add_transaction(tx).unwrap();
            ledger.mine_pending(format!("miner-{}", round));
            assert_eq!(ledger.total_supply(), 50 * round as Balance);
        }

        let balances = ledger.balances();
        assert_eq!(balances[&keypair.address()], -21);
        assert_eq!(balances[&Address::from("bob")], 21);
        assert_eq!(balances.len(), 5);
    }
}
