//! A thin pass-through mempool: pending transactions keyed by id, with no
//! validation of its own. The tree and the handler are the only places transaction
//! rules live; this crate just remembers what a caller has offered and forgets what
//! has been admitted into a block.
//!
//! The mempool does not reorganize itself on a fork switch — if a block is later
//! orphaned, resubmitting its transactions is the caller's responsibility.

use std::collections::HashMap;

use ledger_core::{Transaction, TransactionId};

#[derive(Default)]
pub struct Mempool {
    pending: HashMap<TransactionId, Transaction>,
}

impl Mempool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remembers `tx` under its id, overwriting any existing entry with the same
    /// id. No validation: a caller wanting accept/reject semantics runs the
    /// transaction through a `Handler` first.
    pub fn add(&mut self, tx: Transaction) {
        log::debug!("mempool: adding {:?}", tx.id());
        self.pending.insert(tx.id(), tx);
    }

    /// Drops `id` from the pending set, if present. Returns the removed
    /// transaction, if any.
    pub fn remove(&mut self, id: &TransactionId) -> Option<Transaction> {
        let removed = self.pending.remove(id);
        if removed.is_some() {
            log::debug!("mempool: removing {id:?}");
        }
        removed
    }

    pub fn contains(&self, id: &TransactionId) -> bool {
        self.pending.contains_key(id)
    }

    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.pending.get(id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.pending.values()
    }

    /// Drops every transaction id present in `accepted` from the pending set. The
    /// caller invokes this after a successful `Tree::add_block` with the block's
    /// transaction ids; the mempool itself has no notion of blocks.
    pub fn remove_all(&mut self, accepted: impl IntoIterator<Item = TransactionId>) {
        for id in accepted {
            self.remove(&id);
        }
    }
}
