//! The fork-aware block tree: an append-only structure rooted at genesis, pruned by
//! a cut-off depth, with one unspent-output snapshot per live leaf and a canonical
//! tip chosen by height with an age-based tiebreak.

use std::collections::HashMap;
use std::sync::Arc;

use ledger_core::{Block, BlockResult, BlockRuleError, Hash, SignatureVerifier, TransactionOutpoint, UtxoCollection};

use crate::constants::CUT_OFF_AGE;
use crate::handler::Handler;

struct Node {
    block: Block,
    utxo: UtxoCollection,
    height: u64,
}

/// A branch tip: which block it points at, how tall the branch is, and when it was
/// last extended. Leaves are kept sorted by height descending, ties broken by
/// `last_updated` descending, so the first element is always the canonical tip.
#[derive(Clone, Debug)]
struct Leaf {
    tip_hash: Hash,
    tip_height: u64,
    last_updated: u64,
}

fn leaf_cmp(a: &Leaf, b: &Leaf) -> std::cmp::Ordering {
    b.tip_height.cmp(&a.tip_height).then_with(|| b.last_updated.cmp(&a.last_updated))
}

pub struct Tree {
    nodes: HashMap<Hash, Node>,
    leaves: Vec<Leaf>,
    clock: u64,
    verifier: Arc<dyn SignatureVerifier>,
}

impl Tree {
    /// Seeds the tree with a genesis block. The genesis coinbase's output is the
    /// only entry in its snapshot.
    pub fn new(genesis: Block, verifier: Arc<dyn SignatureVerifier>) -> Self {
        assert!(genesis.prev_hash().is_none(), "genesis must have no parent");
        let mut utxo = UtxoCollection::new();
        let coinbase = genesis.coinbase();
        utxo.insert(
            ledger_core::TransactionOutpoint::new(coinbase.id(), 0),
            coinbase.outputs()[0],
        );

        let id = genesis.id();
        let mut nodes = HashMap::new();
        nodes.insert(id, Node { block: genesis, utxo, height: crate::constants::GENESIS_HEIGHT });

        Self {
            nodes,
            leaves: vec![Leaf { tip_hash: id, tip_height: crate::constants::GENESIS_HEIGHT, last_updated: 0 }],
            clock: 1,
            verifier,
        }
    }

    fn tip_leaf(&self) -> &Leaf {
        debug_assert!(!self.leaves.is_empty(), "a tree always has at least the genesis leaf");
        self.leaves.first().expect("a tree always has at least the genesis leaf")
    }

    pub fn max_height_block(&self) -> &Block {
        let tip = self.tip_leaf();
        debug_assert!(self.nodes.contains_key(&tip.tip_hash), "leaf must reference a live node");
        &self.nodes.get(&tip.tip_hash).expect("leaf must reference a live node").block
    }

    pub fn max_height_utxo(&self) -> UtxoCollection {
        let tip = self.tip_leaf();
        debug_assert!(self.nodes.contains_key(&tip.tip_hash), "leaf must reference a live node");
        self.nodes.get(&tip.tip_hash).expect("leaf must reference a live node").utxo.clone()
    }

    pub fn max_height(&self) -> u64 {
        self.tip_leaf().tip_height
    }

    /// Attempts to admit `block`. Returns true iff admitted; on rejection the tree
    /// is left entirely unchanged. The typed reason is available from
    /// [`Self::try_add_block`]; this predicate collapses it to a bool.
    pub fn add_block(&mut self, block: Block) -> bool {
        self.try_add_block(block).is_ok()
    }

    fn try_add_block(&mut self, block: Block) -> BlockResult<()> {
        let prev_hash = block.prev_hash().ok_or(BlockRuleError::SecondGenesis)?;
        let parent = self.nodes.get(&prev_hash).ok_or(BlockRuleError::UnknownParent)?;

        let submitted = block.transactions().len();
        let mut handler = Handler::new(parent.utxo.clone(), self.verifier.clone());
        let accepted = handler.handle_txs(block.transactions().to_vec());
        if accepted.len() != submitted {
            log::debug!("add_block: rejected, {}/{submitted} transactions simultaneously valid", accepted.len());
            return Err(BlockRuleError::TransactionsRejected { submitted, accepted: accepted.len() });
        }

        let mut utxo = handler.into_utxo();
        let coinbase = block.coinbase();
        utxo.insert(TransactionOutpoint::new(coinbase.id(), 0), coinbase.outputs()[0]);

        let height = parent.height + 1;
        let id = block.id();
        self.nodes.insert(id, Node { block, utxo, height });

        self.clock += 1;
        let last_updated = self.clock;
        if let Some(leaf) = self.leaves.iter_mut().find(|l| l.tip_hash == prev_hash) {
            leaf.tip_hash = id;
            leaf.tip_height = height;
            leaf.last_updated = last_updated;
        } else {
            self.leaves.push(Leaf { tip_hash: id, tip_height: height, last_updated });
        }
        self.leaves.sort_by(leaf_cmp);

        self.prune();
        log::info!("add_block: admitted block at height {height}, tip now height {}", self.max_height());
        Ok(())
    }

    /// Drops every Node that can no longer satisfy `height + CUT_OFF_AGE >=
    /// max_height`, i.e. every Node strictly below `max_height - CUT_OFF_AGE`. A
    /// Node exactly at the threshold is retained — it is still a legal parent for
    /// one more block before it, in turn, falls below the cutoff.
    fn prune(&mut self) {
        let max_height = self.max_height();
        let cutoff = max_height.saturating_sub(CUT_OFF_AGE);
        let before = self.nodes.len();
        self.nodes.retain(|_, node| node.height >= cutoff);
        if self.nodes.len() != before {
            log::debug!("prune: dropped {} node(s) below height {cutoff}", before - self.nodes.len());
        }
        self.leaves.retain(|leaf| self.nodes.contains_key(&leaf.tip_hash));
    }
}
