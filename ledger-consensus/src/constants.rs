/// Depth, measured from the deepest leaf, beyond which a block becomes eligible for
/// pruning. A block at height `h` is pruned once the tip height exceeds
/// `h + CUT_OFF_AGE`; a block exactly `CUT_OFF_AGE` blocks behind the tip is still
/// retained.
pub const CUT_OFF_AGE: u64 = 10;

/// The height assigned to the genesis block.
pub const GENESIS_HEIGHT: u64 = 1;
