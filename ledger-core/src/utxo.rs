//! The unspent-output pool (UOP): a plain `HashMap` from outpoint to output, plus an
//! extension trait for the bulk operations the handler and tree need.

use std::collections::HashMap;

use crate::tx::{TransactionOutpoint, TransactionOutput};

pub type UtxoCollection = HashMap<TransactionOutpoint, TransactionOutput>;

pub trait UtxoCollectionExt {
    fn contains_outpoint(&self, outpoint: &TransactionOutpoint) -> bool;

    /// Adds all entries from `other`. Entries already present in `self` are
    /// overwritten.
    fn add_many(&mut self, other: &Self);

    /// Removes every key present in `other`. Equivalent to `self - other`.
    fn remove_many(&mut self, other: &Self);
}

impl UtxoCollectionExt for UtxoCollection {
    fn contains_outpoint(&self, outpoint: &TransactionOutpoint) -> bool {
        self.contains_key(outpoint)
    }

    fn add_many(&mut self, other: &Self) {
        for (k, v) in other.iter() {
            self.insert(*k, *v);
        }
    }

    fn remove_many(&mut self, other: &Self) {
        for k in other.keys() {
            self.remove(k);
        }
    }
}
