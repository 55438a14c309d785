//! Transactions, outpoints and outputs.
//!
//! A plain-data `TransactionOutpoint`/`TransactionOutput`/`TransactionInput` trio, a
//! `Transaction` that caches its own content hash, and the canonical-bytes-to-sign
//! helper that the handler and the signer both call.

use std::fmt;

use crate::crypto::Address;
use crate::hash::Hash;

pub type TransactionId = Hash;

/// Unspent Output Reference: `(producingTxHash, outputIndex)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransactionOutpoint {
    pub transaction_id: TransactionId,
    pub index: u32,
}

impl TransactionOutpoint {
    pub fn new(transaction_id: TransactionId, index: u32) -> Self {
        Self { transaction_id, index }
    }
}

impl fmt::Debug for TransactionOutpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.transaction_id, self.index)
    }
}

/// A spendable output: a value and the address that may spend it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransactionOutput {
    pub value: u64,
    pub address: Address,
}

impl TransactionOutput {
    pub fn new(value: u64, address: Address) -> Self {
        Self { value, address }
    }
}

/// A reference to an output, plus the signature that claims it.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransactionInput {
    pub previous_outpoint: TransactionOutpoint,
    pub signature: Vec<u8>,
}

impl TransactionInput {
    pub fn new(previous_outpoint: TransactionOutpoint, signature: Vec<u8>) -> Self {
        Self { previous_outpoint, signature }
    }
}

/// A transaction: inputs, outputs, and a cached content hash.
///
/// The hash is a function of the inputs' outpoints (never their signatures) and the
/// outputs. Two transactions that differ only in a signature share an id, which is
/// exactly what makes `raw_data_to_sign` commit to the input's position: without
/// that, a signature for input 0 could be replayed for input 1.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transaction {
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    id: TransactionId,
}

impl Transaction {
    /// Builds and finalizes a transaction in one step (the common case).
    pub fn new(inputs: Vec<TransactionInput>, outputs: Vec<TransactionOutput>) -> Self {
        let mut tx = Self::new_non_finalized(inputs, outputs);
        tx.finalize();
        tx
    }

    /// Builds a transaction without computing its id yet, for callers that need to
    /// mutate inputs (e.g. attach signatures) before the id is fixed. `signature`
    /// fields do not affect the id, so mutating only `signature` after
    /// [`finalize`](Self::finalize) is also safe and does not require refinalizing.
    pub fn new_non_finalized(inputs: Vec<TransactionInput>, outputs: Vec<TransactionOutput>) -> Self {
        Self { inputs, outputs, id: TransactionId::default() }
    }

    pub fn finalize(&mut self) {
        self.id = hash_transaction(&self.inputs, &self.outputs);
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn inputs(&self) -> &[TransactionInput] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TransactionOutput] {
        &self.outputs
    }

    pub fn is_coinbase(&self) -> bool {
        self.inputs.is_empty()
    }

    /// The canonical bytes that input `index`'s signature must cover: the
    /// transaction's own id (already excludes all signatures) concatenated with the
    /// input's position. Distinct inputs of the same transaction always get distinct
    /// messages even when they claim outputs with the same payee.
    pub fn raw_data_to_sign(&self, index: usize) -> [u8; 32] {
        let mut buf = Vec::with_capacity(36);
        buf.extend_from_slice(self.id.as_bytes());
        buf.extend_from_slice(&(index as u32).to_le_bytes());
        *Hash::digest(&buf).as_bytes()
    }
}

fn hash_transaction(inputs: &[TransactionInput], outputs: &[TransactionOutput]) -> TransactionId {
    let mut buf = Vec::new();
    for input in inputs {
        buf.extend_from_slice(input.previous_outpoint.transaction_id.as_bytes());
        buf.extend_from_slice(&input.previous_outpoint.index.to_le_bytes());
    }
    for output in outputs {
        buf.extend_from_slice(&output.value.to_le_bytes());
        buf.extend_from_slice(output.address.as_bytes());
    }
    Hash::digest(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keypair_from_seed;

    fn output(value: u64, seed: u64) -> TransactionOutput {
        let (_, address) = keypair_from_seed(seed);
        TransactionOutput::new(value, address)
    }

    #[test]
    fn id_ignores_signatures() {
        let outpoint = TransactionOutpoint::new(TransactionId::digest(b"parent"), 0);
        let tx_a = Transaction::new(vec![TransactionInput::new(outpoint, vec![1, 2, 3])], vec![output(10, 1)]);
        let tx_b = Transaction::new(vec![TransactionInput::new(outpoint, vec![9, 9, 9])], vec![output(10, 1)]);
        assert_eq!(tx_a.id(), tx_b.id());
    }

    #[test]
    fn id_depends_on_outputs_and_inputs() {
        let outpoint = TransactionOutpoint::new(TransactionId::digest(b"parent"), 0);
        let tx_a = Transaction::new(vec![TransactionInput::new(outpoint, vec![])], vec![output(10, 1)]);
        let tx_b = Transaction::new(vec![TransactionInput::new(outpoint, vec![])], vec![output(11, 1)]);
        assert_ne!(tx_a.id(), tx_b.id());
    }

    #[test]
    fn raw_data_to_sign_differs_per_input_position() {
        let outpoint = TransactionOutpoint::new(TransactionId::digest(b"parent"), 0);
        let tx = Transaction::new(
            vec![TransactionInput::new(outpoint, vec![]), TransactionInput::new(outpoint, vec![])],
            vec![output(5, 1)],
        );
        assert_ne!(tx.raw_data_to_sign(0), tx.raw_data_to_sign(1));
    }

    #[test]
    fn coinbase_has_no_inputs() {
        let tx = Transaction::new(vec![], vec![output(50, 1)]);
        assert!(tx.is_coinbase());
    }
}
