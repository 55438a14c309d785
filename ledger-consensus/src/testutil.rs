//! Deterministic fixtures for scenario tests: keypairs, a genesis builder and a
//! signed-transaction builder, so a test reads as a sequence of ledger actions
//! rather than key-management plumbing. Not part of the public consensus API in
//! spirit — downstream integration tests are the only intended caller.

use std::sync::Arc;

use ledger_core::crypto::{keypair_from_seed, sign};
use ledger_core::{
    Address, Block, Hash, SignatureVerifier, Secp256k1Verifier, Transaction, TransactionInput, TransactionOutpoint,
    TransactionOutput,
};
use secp256k1::Keypair;

/// A named actor in a test scenario: a keypair and the address derived from it.
pub struct Actor {
    pub keypair: Keypair,
    pub address: Address,
}

/// Derives a deterministic actor from `seed`. Distinct seeds always yield distinct
/// addresses.
pub fn actor(seed: u64) -> Actor {
    let (keypair, address) = keypair_from_seed(seed);
    Actor { keypair, address }
}

/// The production signature scheme, shared by every test that builds a `Handler` or
/// `Tree` directly rather than through a mock.
pub fn verifier() -> Arc<dyn SignatureVerifier> {
    Arc::new(Secp256k1Verifier)
}

/// Builds a genesis block whose sole coinbase output pays `actor`.
pub fn genesis_block(actor: &Actor, value: u64) -> Block {
    let coinbase = Transaction::new(vec![], vec![TransactionOutput::new(value, actor.address)]);
    Block::new(None, coinbase, vec![])
}

/// Builds a block extending `parent`, with its own coinbase paying `coinbase_actor`
/// and carrying `transactions` as its ordinary transaction list.
pub fn extend_block(parent: &Block, coinbase_actor: &Actor, coinbase_value: u64, transactions: Vec<Transaction>) -> Block {
    let coinbase = Transaction::new(vec![], vec![TransactionOutput::new(coinbase_value, coinbase_actor.address)]);
    Block::new(Some(parent.id()), coinbase, transactions)
}

/// Builds and signs a single-input transaction spending `outpoint` (owned by
/// `spender`) to `outputs`.
pub fn signed_spend(spender: &Actor, outpoint: TransactionOutpoint, outputs: Vec<TransactionOutput>) -> Transaction {
    let mut tx = Transaction::new_non_finalized(vec![TransactionInput::new(outpoint, vec![])], outputs);
    tx.finalize();
    tx.inputs[0].signature = sign(&spender.keypair, &tx.raw_data_to_sign(0));
    tx
}

/// Builds and signs a transaction spending several outpoints (all owned by
/// `spender`) in the given order to `outputs`.
pub fn signed_multi_spend(spender: &Actor, outpoints: Vec<TransactionOutpoint>, outputs: Vec<TransactionOutput>) -> Transaction {
    let inputs = outpoints.iter().map(|o| TransactionInput::new(*o, vec![])).collect();
    let mut tx = Transaction::new_non_finalized(inputs, outputs);
    tx.finalize();
    for i in 0..tx.inputs.len() {
        let sig = sign(&spender.keypair, &tx.raw_data_to_sign(i));
        tx.inputs[i].signature = sig;
    }
    tx
}

/// The outpoint for a coinbase transaction's (only) output.
pub fn coinbase_outpoint(block: &Block) -> TransactionOutpoint {
    TransactionOutpoint::new(block.coinbase().id(), 0)
}

/// A deterministic, obviously-invalid outpoint — no transaction ever produces it.
pub fn unknown_outpoint(label: &str) -> TransactionOutpoint {
    TransactionOutpoint::new(Hash::digest(label.as_bytes()), 0)
}
