//! The epoch transaction handler: validates individual transactions against a live
//! unspent-output pool, and resolves an unordered batch of candidates into the
//! largest mutually-consistent accepted subset.

use std::collections::HashMap;
use std::sync::Arc;

use itertools::Itertools;
use ledger_core::{SignatureVerifier, Transaction, TransactionOutpoint, TxResult, TxRuleError, UtxoCollection, UtxoCollectionExt};

use crate::graph::DependencyIndex;

/// Owns one unspent-output pool and the signature scheme used to validate spends
/// against it. A `Handler` never touches any pool other than its own — the tree
/// hands each branch a fresh `Handler` seeded with that branch's snapshot.
pub struct Handler {
    utxo: UtxoCollection,
    verifier: Arc<dyn SignatureVerifier>,
}

impl Handler {
    pub fn new(utxo: UtxoCollection, verifier: Arc<dyn SignatureVerifier>) -> Self {
        Self { utxo, verifier }
    }

    pub fn utxo(&self) -> &UtxoCollection {
        &self.utxo
    }

    pub fn into_utxo(self) -> UtxoCollection {
        self.utxo
    }

    /// Returns true iff `tx` is valid against the live pool. The typed reason for a
    /// rejection is available via [`Self::validate_tx`] for callers (tests,
    /// diagnostics) that need it; the public predicate collapses it to a bool.
    pub fn is_valid_tx(&self, tx: &Transaction) -> bool {
        self.validate_tx(tx, &self.utxo).is_ok()
    }

    fn validate_tx(&self, tx: &Transaction, pool: &UtxoCollection) -> TxResult<()> {
        let mut claimed = std::collections::HashSet::with_capacity(tx.inputs().len());
        let mut input_sum: u64 = 0;

        for (index, input) in tx.inputs().iter().enumerate() {
            if !claimed.insert(input.previous_outpoint) {
                return Err(TxRuleError::DuplicateInput(input.previous_outpoint));
            }

            let entry = pool.get(&input.previous_outpoint);
            let message = tx.raw_data_to_sign(index);
            let address = entry.map(|e| &e.address);
            if !self.verifier.verify(address, &message, &input.signature) {
                return match entry {
                    Some(_) => Err(TxRuleError::SignatureInvalid(input.previous_outpoint)),
                    None => Err(TxRuleError::MissingUtxoEntry(input.previous_outpoint)),
                };
            }

            let entry = entry.expect("verified above: entry is Some when verify can succeed");
            input_sum = input_sum.checked_add(entry.value).ok_or(TxRuleError::ValueOverflow)?;
        }

        let mut output_sum: u64 = 0;
        for output in tx.outputs() {
            output_sum = output_sum.checked_add(output.value).ok_or(TxRuleError::ValueOverflow)?;
        }

        if input_sum < output_sum {
            return Err(TxRuleError::InsufficientInputValue { input: input_sum, output: output_sum });
        }

        Ok(())
    }

    /// Resolves `candidates` into the largest mutually-consistent subset and commits
    /// it to the live pool. Never panics on malformed input; rejected candidates are
    /// silently dropped, never surfaced as an error.
    pub fn handle_txs(&mut self, candidates: Vec<Transaction>) -> Vec<Transaction> {
        log::debug!("handle_txs: {} candidates submitted", candidates.len());

        let mut index = DependencyIndex::build(candidates);

        let hypothetical = self.hypothetical_pool(&index);
        self.remove_self_inconsistent(&mut index, &hypothetical);
        log::debug!("handle_txs: {} candidates survive self-consistency", index.ids().len());

        self.resolve_double_spends(&mut index);
        log::debug!("handle_txs: {} candidates survive double-spend resolution", index.ids().len());

        let accepted = index.into_survivors();
        self.commit(&accepted);
        accepted
    }

    /// The live pool plus every output of every original candidate, regardless of
    /// that candidate's own validity — a producer's outputs must be visible to a
    /// dependent's individual validity check even before the producer itself has
    /// been judged.
    fn hypothetical_pool(&self, index: &DependencyIndex) -> UtxoCollection {
        let mut pool = self.utxo.clone();
        for id in index.ids() {
            let tx = index.get(&id).expect("id came from index.ids()");
            for (i, output) in tx.outputs().iter().enumerate() {
                pool.insert(TransactionOutpoint::new(id, i as u32), *output);
            }
        }
        pool
    }

    fn remove_self_inconsistent(&self, index: &mut DependencyIndex, hypothetical: &UtxoCollection) {
        for id in index.ids() {
            let Some(tx) = index.get(&id) else { continue };
            if self.validate_tx(tx, hypothetical).is_err() {
                index.remove_with_dependents(id);
            }
        }
    }

    fn resolve_double_spends(&self, index: &mut DependencyIndex) {
        let spender_groups: HashMap<TransactionOutpoint, Vec<ledger_core::TransactionId>> = index
            .ids()
            .into_iter()
            .flat_map(|id| {
                let tx = index.get(&id).expect("id came from index.ids()");
                tx.inputs().iter().map(|input| (input.previous_outpoint, id)).collect::<Vec<_>>()
            })
            .into_group_map();

        for group in spender_groups.into_values() {
            let mut alive: Vec<_> = group.iter().filter(|id| index.is_alive(id)).copied().collect();
            if alive.len() <= 1 {
                continue;
            }

            // Dependency-collapse: a conflict group member that is also a
            // dependent of another member cannot coexist with it regardless of the
            // tiebreak, so it is dropped up front.
            let mut changed = true;
            while changed {
                changed = false;
                for h in alive.clone() {
                    if !index.is_alive(&h) {
                        continue;
                    }
                    let dependents = index.transitive_dependents(h);
                    for d in dependents {
                        if index.is_alive(&d) && alive.contains(&d) {
                            index.remove_with_dependents(d);
                            changed = true;
                        }
                    }
                }
                alive.retain(|id| index.is_alive(id));
            }

            // Tiebreak: the remaining choice of survivor is implementation-defined.
            while alive.len() > 1 {
                let victim = alive.pop().expect("alive.len() > 1");
                index.remove_with_dependents(victim);
                alive.retain(|id| index.is_alive(id));
            }
        }
    }

    fn commit(&mut self, accepted: &[Transaction]) {
        for tx in accepted {
            for (i, output) in tx.outputs().iter().enumerate() {
                self.utxo.insert(TransactionOutpoint::new(tx.id(), i as u32), *output);
            }
        }
        for tx in accepted {
            for input in tx.inputs() {
                self.utxo.remove(&input.previous_outpoint);
            }
        }
    }
}
