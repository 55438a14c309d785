//! The transaction batch handler and the fork-aware block tree: the two pieces of
//! business logic built on top of `ledger-core`'s plain data types.

pub mod constants;
pub mod handler;
pub mod logging;
pub mod testutil;
pub mod tree;

mod graph;

pub use handler::Handler;
pub use tree::Tree;
