//! The candidate dependency graph used by [`crate::handler::Handler::handle_txs`]
//! to resolve intra-batch dependencies and double-spend conflicts.
//!
//! Removal is an explicit worklist rather than recursion: depth is bounded by the
//! number of candidates, not by the call stack, while still visiting a transaction
//! before its dependents so that removal stays idempotent under repeated calls.

use std::collections::{HashMap, HashSet};

use ledger_core::{Transaction, TransactionId};

/// One candidate's bookkeeping: the transaction itself, and the ids of every other
/// *candidate in this batch* whose input consumes one of this transaction's
/// outputs.
struct TxRecord {
    tx: Transaction,
    dependents: HashSet<TransactionId>,
}

/// A mutable index of "still alive" candidates plus the dependency edges between
/// them. Entries are removed as phases 1 and 2 disqualify candidates; removal walks
/// the `dependents` edges so that a dropped transaction takes its dependents with
/// it.
pub(crate) struct DependencyIndex {
    records: HashMap<TransactionId, TxRecord>,
}

impl DependencyIndex {
    /// Builds the index from an unordered batch of candidates. Candidates sharing
    /// an id are collapsed to the last one seen; duplicate ids within one batch are
    /// not a case any caller relies on.
    pub(crate) fn build(candidates: Vec<Transaction>) -> Self {
        let mut records: HashMap<TransactionId, TxRecord> =
            candidates.into_iter().map(|tx| (tx.id(), TxRecord { tx, dependents: HashSet::new() })).collect();

        let ids: Vec<TransactionId> = records.keys().copied().collect();
        for &id in &ids {
            let producers: Vec<TransactionId> = records[&id]
                .tx
                .inputs()
                .iter()
                .map(|input| input.previous_outpoint.transaction_id)
                .filter(|producer| records.contains_key(producer))
                .collect();
            for producer in producers {
                records.get_mut(&producer).unwrap().dependents.insert(id);
            }
        }

        Self { records }
    }

    pub(crate) fn is_alive(&self, id: &TransactionId) -> bool {
        self.records.contains_key(id)
    }

    pub(crate) fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.records.get(id).map(|r| &r.tx)
    }

    pub(crate) fn ids(&self) -> Vec<TransactionId> {
        self.records.keys().copied().collect()
    }

    /// Drops `root` (if still alive) and every candidate transitively reachable from
    /// it via `dependents`, using an explicit stack rather than recursion. A no-op,
    /// idempotently, if `root` was already removed.
    pub(crate) fn remove_with_dependents(&mut self, root: TransactionId) {
        let mut worklist = vec![root];
        while let Some(id) = worklist.pop() {
            if let Some(record) = self.records.remove(&id) {
                worklist.extend(record.dependents);
            }
        }
    }

    /// All candidates transitively reachable from `root` via `dependents`, not
    /// including `root` itself. Read-only: used by the double-spend
    /// dependency-collapse step to decide what *would* be dragged down without yet
    /// removing anything.
    pub(crate) fn transitive_dependents(&self, root: TransactionId) -> HashSet<TransactionId> {
        let mut seen = HashSet::new();
        let mut worklist: Vec<TransactionId> = self.records.get(&root).map(|r| r.dependents.iter().copied().collect()).unwrap_or_default();
        while let Some(id) = worklist.pop() {
            if seen.insert(id) {
                if let Some(record) = self.records.get(&id) {
                    worklist.extend(record.dependents.iter().copied());
                }
            }
        }
        seen
    }

    /// Consumes the index, returning the surviving transactions in ascending id
    /// order. The order is an arbitrary but stable choice; callers that care about
    /// acceptance should compare the result as a set.
    pub(crate) fn into_survivors(self) -> Vec<Transaction> {
        let mut survivors: Vec<Transaction> = self.records.into_values().map(|r| r.tx).collect();
        survivors.sort_by_key(|tx| tx.id());
        survivors
    }
}
