//! Blocks. Deliberately minimal: a block is its previous hash, a coinbase
//! transaction and an ordered list of ordinary transactions. Wire encoding, proof of
//! work and Merkle-root commitments are out of scope — this crate only needs enough
//! of a `Block` for the tree to reason about fork structure.

use crate::hash::Hash;
use crate::tx::Transaction;

#[derive(Clone, Debug)]
pub struct Block {
    pub prev_hash: Option<Hash>,
    pub coinbase: Transaction,
    pub transactions: Vec<Transaction>,
    id: Hash,
}

impl Block {
    pub fn new(prev_hash: Option<Hash>, coinbase: Transaction, transactions: Vec<Transaction>) -> Self {
        assert!(coinbase.is_coinbase(), "coinbase transaction must have no inputs");
        assert_eq!(coinbase.outputs().len(), 1, "coinbase transaction must have exactly one output");
        let mut block = Self { prev_hash, coinbase, transactions, id: Hash::ZERO };
        block.finalize();
        block
    }

    fn finalize(&mut self) {
        let mut buf = Vec::new();
        if let Some(prev) = self.prev_hash {
            buf.extend_from_slice(prev.as_bytes());
        }
        buf.extend_from_slice(self.coinbase.id().as_bytes());
        for tx in &self.transactions {
            buf.extend_from_slice(tx.id().as_bytes());
        }
        self.id = Hash::digest(&buf);
    }

    pub fn id(&self) -> Hash {
        self.id
    }

    pub fn prev_hash(&self) -> Option<Hash> {
        self.prev_hash
    }

    pub fn coinbase(&self) -> &Transaction {
        &self.coinbase
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn is_genesis(&self) -> bool {
        self.prev_hash.is_none()
    }
}
