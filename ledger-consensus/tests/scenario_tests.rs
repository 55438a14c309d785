//! End-to-end scenarios exercising `Tree` and `Handler` together, matching the
//! reference scenarios used to validate this ledger's acceptance rules.

use ledger_consensus::constants::CUT_OFF_AGE;
use ledger_consensus::testutil::{actor, coinbase_outpoint, extend_block, genesis_block, signed_spend, unknown_outpoint, verifier};
use ledger_consensus::{Handler, Tree};
use ledger_core::{TransactionOutpoint, TransactionOutput, UtxoCollection};

#[test]
fn simple_valid_transfer_becomes_the_new_tip() {
    // Arrange: genesis coinbase pays K value 10.
    let k = actor(1);
    let l = actor(2);
    let genesis = genesis_block(&k, 10);
    let mut tree = Tree::new(genesis.clone(), verifier());

    // Act: block 2 spends the genesis coinbase entirely to L.
    let transfer = signed_spend(&k, coinbase_outpoint(&genesis), vec![TransactionOutput::new(10, l.address)]);
    let miner = actor(3);
    let block2 = extend_block(&genesis, &miner, 1, vec![transfer.clone()]);
    let block2_id = block2.id();
    assert!(tree.add_block(block2));

    // Assert: block 2 is the tip and its utxo holds exactly the transfer's output
    // plus block 2's own coinbase.
    assert_eq!(tree.max_height_block().id(), block2_id);
    let utxo = tree.max_height_utxo();
    assert_eq!(utxo.len(), 2);
    assert!(utxo.contains_key(&TransactionOutpoint::new(transfer.id(), 0)));
    assert_eq!(utxo.get(&TransactionOutpoint::new(transfer.id(), 0)).unwrap().value, 10);
}

#[test]
fn dependent_intra_batch_transactions_are_both_accepted() {
    // Arrange: t1 spends the genesis coinbase into an intermediate output O1; t2
    // spends O1 in the same batch.
    let k = actor(1);
    let l = actor(2);
    let m = actor(3);
    let genesis = genesis_block(&k, 10);
    let mut tree = Tree::new(genesis.clone(), verifier());

    let t1 = signed_spend(&k, coinbase_outpoint(&genesis), vec![TransactionOutput::new(10, l.address)]);
    let t1_output = TransactionOutpoint::new(t1.id(), 0);
    let t2 = signed_spend(&l, t1_output, vec![TransactionOutput::new(10, m.address)]);

    let miner = actor(4);
    let block2 = extend_block(&genesis, &miner, 1, vec![t1.clone(), t2.clone()]);

    // Act
    assert!(tree.add_block(block2));

    // Assert: the utxo holds t2's output, not the intermediate O1.
    let utxo = tree.max_height_utxo();
    assert!(!utxo.contains_key(&t1_output));
    assert!(utxo.contains_key(&TransactionOutpoint::new(t2.id(), 0)));
}

#[test]
fn double_spend_accepts_exactly_one_of_the_conflicting_spenders() {
    // Arrange: t1 and t2 both spend the genesis coinbase's only output.
    let k = actor(1);
    let l = actor(2);
    let m = actor(3);
    let genesis = genesis_block(&k, 10);
    let mut tree = Tree::new(genesis.clone(), verifier());

    let t1 = signed_spend(&k, coinbase_outpoint(&genesis), vec![TransactionOutput::new(10, l.address)]);
    let t2 = signed_spend(&k, coinbase_outpoint(&genesis), vec![TransactionOutput::new(10, m.address)]);

    let miner = actor(4);
    let block2 = extend_block(&genesis, &miner, 1, vec![t1.clone(), t2.clone()]);

    // Act: the whole block is rejected, since both transactions in it cannot be
    // simultaneously accepted (§4.2 add_block is strict: every transaction in a
    // block must be simultaneously valid).
    assert!(!tree.add_block(block2));
    assert_eq!(tree.max_height_block().id(), genesis.id());
}

#[test]
fn double_spend_dependent_survives_iff_its_own_producer_does() {
    // Arrange: t1 and t2 both spend u; t3 spends O1, t1's own output, so t3's fate
    // is tied to t1's, not to the u-conflict directly.
    let k = actor(1);
    let l = actor(2);
    let m = actor(3);
    let n = actor(4);
    let u = unknown_outpoint("u");

    let mut utxo = UtxoCollection::new();
    utxo.insert(u, TransactionOutput::new(10, k.address));

    let t1 = signed_spend(&k, u, vec![TransactionOutput::new(10, l.address)]);
    let t2 = signed_spend(&k, u, vec![TransactionOutput::new(10, m.address)]);
    let t1_output = TransactionOutpoint::new(t1.id(), 0);
    let t3 = signed_spend(&l, t1_output, vec![TransactionOutput::new(10, n.address)]);

    // Act
    let mut handler = Handler::new(utxo, verifier());
    let accepted = handler.handle_txs(vec![t1.clone(), t2.clone(), t3.clone()]);

    // Assert: exactly one of {t1, t2} survives, and t3 is accepted iff t1 is.
    let t1_in = accepted.contains(&t1);
    let t2_in = accepted.contains(&t2);
    assert_ne!(t1_in, t2_in, "exactly one spender of u must survive");
    assert_eq!(accepted.contains(&t3), t1_in, "t3 survives iff its producer t1 does");
}

#[test]
fn cut_off_boundary_is_exact() {
    // Arrange: extend genesis linearly to max_height = CUT_OFF_AGE + 1 (10
    // successive blocks past genesis). At this point genesis sits exactly at the
    // cut-off threshold (height 1 == max_height - CUT_OFF_AGE) and must still be a
    // legal parent.
    let k = actor(1);
    let genesis = genesis_block(&k, 10);
    let genesis_id = genesis.id();
    let mut tree = Tree::new(genesis.clone(), verifier());

    let mut tip = genesis;
    for i in 0..CUT_OFF_AGE {
        let miner = actor(100 + i);
        let next = extend_block(&tip, &miner, 1, vec![]);
        assert!(tree.add_block(next.clone()));
        tip = next;
    }
    assert_eq!(tree.max_height(), CUT_OFF_AGE + 1);

    let sibling_of_child = |seed: u64| {
        let miner = actor(seed);
        let coinbase = ledger_core::Transaction::new(vec![], vec![TransactionOutput::new(1, miner.address)]);
        ledger_core::Block::new(Some(genesis_id), coinbase, vec![])
    };

    // Act + Assert: at max_height == CUT_OFF_AGE + 1, genesis (height 1) is still
    // present — a sibling of genesis's child is still admissible.
    assert!(tree.add_block(sibling_of_child(900)));

    // One more admission pushes max_height to CUT_OFF_AGE + 2, at which point
    // genesis drops below the cut-off and is pruned.
    let miner = actor(200);
    let next = extend_block(&tip, &miner, 1, vec![]);
    assert!(tree.add_block(next));
    assert_eq!(tree.max_height(), CUT_OFF_AGE + 2);

    assert!(!tree.add_block(sibling_of_child(901)));
}

#[test]
fn fork_tip_is_selected_by_height_then_recency() {
    // Arrange: branch X reaches height 5 first (stamps consumed 1..4), then branch
    // Y reaches height 5 (stamps 5..8).
    let k = actor(1);
    let genesis = genesis_block(&k, 10);
    let mut tree = Tree::new(genesis.clone(), verifier());

    let mut tip_x = genesis.clone();
    for i in 0..4 {
        let miner = actor(10 + i);
        let next = extend_block(&tip_x, &miner, 1, vec![]);
        assert!(tree.add_block(next.clone()));
        tip_x = next;
    }
    assert_eq!(tree.max_height_block().id(), tip_x.id());

    let mut tip_y = genesis;
    for i in 0..4 {
        let miner = actor(20 + i);
        let next = extend_block(&tip_y, &miner, 1, vec![]);
        assert!(tree.add_block(next.clone()));
        tip_y = next;
    }

    // Assert: Y's tip wins the tie on recency.
    assert_eq!(tree.max_height_block().id(), tip_y.id());
    assert_eq!(tree.max_height(), 5);
}
