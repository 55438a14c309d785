//! Core data types for a simplified UTXO ledger: transactions, blocks, the
//! unspent-output collection and the signing/hashing primitives they rest on.
//!
//! This crate has no business logic of its own — acceptance and fork-tree
//! management live in `ledger-consensus`. It is the part of the system every other
//! crate depends on, and which itself depends on nothing beyond a signature scheme
//! and a hash function.

pub mod block;
pub mod crypto;
pub mod errors;
pub mod hash;
pub mod tx;
pub mod utxo;

pub use block::Block;
pub use crypto::{Address, Secp256k1Verifier, SignatureVerifier};
pub use errors::{BlockRuleError, BlockResult, TxResult, TxRuleError};
pub use hash::Hash;
pub use tx::{Transaction, TransactionId, TransactionInput, TransactionOutpoint, TransactionOutput};
pub use utxo::{UtxoCollection, UtxoCollectionExt};
