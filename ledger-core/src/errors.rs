//! Error taxonomy. These are used internally to decide accept/reject and are never
//! surfaced as exceptions — `is_valid_tx`/`handle_txs`/`add_block` all collapse them
//! to booleans or omission from an accepted list. They exist as a typed enum (rather
//! than `bool` reasons inline) purely so that tests and diagnostics can assert *why*
//! a transaction was rejected.

use thiserror::Error;

use crate::tx::TransactionOutpoint;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TxRuleError {
    #[error("input claims outpoint {0:?} which is not in the utxo pool")]
    MissingUtxoEntry(TransactionOutpoint),

    #[error("signature for input claiming {0:?} does not verify")]
    SignatureInvalid(TransactionOutpoint),

    #[error("transaction claims outpoint {0:?} more than once")]
    DuplicateInput(TransactionOutpoint),

    #[error("summing input or output values overflowed u64")]
    ValueOverflow,

    #[error("total input value {input} is less than total output value {output}")]
    InsufficientInputValue { input: u64, output: u64 },
}

pub type TxResult<T> = std::result::Result<T, TxRuleError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockRuleError {
    #[error("block has no parent hash (a second genesis is not allowed)")]
    SecondGenesis,

    #[error("parent block is unknown or has been pruned below the cut-off")]
    UnknownParent,

    #[error("block contains {submitted} transactions but only {accepted} were simultaneously valid")]
    TransactionsRejected { submitted: usize, accepted: usize },
}

pub type BlockResult<T> = std::result::Result<T, BlockRuleError>;
