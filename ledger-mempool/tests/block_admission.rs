//! Scenario F: admitting a block removes exactly the transactions it carries from
//! the mempool, leaving everything else pending. The mempool has no knowledge of
//! the tree; this test wires the two together the way a caller would.

use ledger_consensus::testutil::{actor, coinbase_outpoint, extend_block, genesis_block, signed_spend, verifier};
use ledger_consensus::Tree;
use ledger_mempool::Mempool;

#[test]
fn admitting_a_block_removes_only_its_own_transactions_from_the_mempool() {
    let miner = actor(1);
    let sender = actor(2);
    let receiver_a = actor(3);
    let receiver_b = actor(4);

    let genesis = genesis_block(&miner, 100);
    let mut tree = Tree::new(genesis.clone(), verifier());

    let funding = extend_block(&genesis, &sender, 0, vec![]);
    assert!(tree.add_block(funding.clone()));

    let a = signed_spend(
        &miner,
        coinbase_outpoint(&genesis),
        vec![ledger_core::TransactionOutput::new(100, receiver_a.address)],
    );
    let b = signed_spend(
        &sender,
        coinbase_outpoint(&funding),
        vec![ledger_core::TransactionOutput::new(0, receiver_b.address)],
    );

    let mut mempool = Mempool::new();
    mempool.add(a.clone());
    mempool.add(b.clone());
    assert_eq!(mempool.len(), 2);

    let block = extend_block(&funding, &receiver_a, 1, vec![a.clone()]);
    assert!(tree.add_block(block.clone()));

    let accepted_ids: Vec<_> = block.transactions().iter().map(|tx| tx.id()).collect();
    mempool.remove_all(accepted_ids);

    assert!(!mempool.contains(&a.id()));
    assert!(mempool.contains(&b.id()));
}
