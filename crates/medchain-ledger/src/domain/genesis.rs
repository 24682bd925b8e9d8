//! Genesis Block Creation
//!
//! Block 0 anchors the chain. It is never mined; its hash is computed at
//! nonce 0 regardless of the configured difficulty.

use super::entities::{Block, RecordChange};
use crate::error::Result;

/// Message carried by the genesis payload
pub const GENESIS_MESSAGE: &str = "Genesis Block";

/// Sentinel previous hash of the genesis block
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Creates the genesis block stamped with `timestamp`
pub fn create_genesis_block(timestamp: String) -> Result<Block> {
    Block::new(
        0,
        timestamp,
        RecordChange::Genesis {
            message: GENESIS_MESSAGE.to_string(),
        },
        GENESIS_PREVIOUS_HASH.to_string(),
    )
}

/// Check that `block` has the shape of a genesis block and a correct hash
pub fn is_valid_genesis(block: &Block) -> bool {
    let shape_ok = block.index == 0
        && block.previous_hash == GENESIS_PREVIOUS_HASH
        && matches!(&block.payload, RecordChange::Genesis { message } if message == GENESIS_MESSAGE);

    shape_ok
        && block
            .calculate_hash()
            .map(|hash| hash == block.hash)
            .unwrap_or(false)
}
