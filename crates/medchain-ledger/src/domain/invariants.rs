//! Invariant checkers for the chain
//!
//! These functions enforce the rules that MUST hold for every block after
//! genesis:
//! 1. Self hash: the stored hash recomputes from the block's own fields
//! 2. Linkage: `previous_hash` equals the preceding block's stored hash
//! 3. Position: `index` equals the block's position in the chain

use super::entities::{Block, FaultKind};
use crate::error::{LedgerError, Result};

/// INVARIANT-1: Self hash
pub fn check_block_hash(block: &Block) -> std::result::Result<(), FaultKind> {
    match block.calculate_hash() {
        Ok(hash) if hash == block.hash => Ok(()),
        Ok(_) => Err(FaultKind::HashMismatch),
        Err(_) => Err(FaultKind::Unhashable),
    }
}

/// INVARIANT-2: Linkage
pub fn check_linkage(previous: &Block, block: &Block) -> std::result::Result<(), FaultKind> {
    if block.previous_hash != previous.hash {
        return Err(FaultKind::BrokenLink);
    }
    Ok(())
}

/// All invariants for a block about to be pushed after `tip`
pub fn check_append(tip: &Block, block: &Block) -> Result<()> {
    let expected = tip.index.checked_add(1).ok_or_else(|| LedgerError::InvalidBlock {
        index: block.index,
        reason: format!("chain tip index {} has no successor", tip.index),
    })?;
    if block.index != expected {
        return Err(LedgerError::InvalidBlock {
            index: block.index,
            reason: format!("expected index {}", expected),
        });
    }

    check_linkage(tip, block).map_err(|_| LedgerError::InvalidBlock {
        index: block.index,
        reason: "previous hash does not match chain tip".to_string(),
    })?;

    check_block_hash(block).map_err(|kind| LedgerError::InvalidBlock {
        index: block.index,
        reason: format!("{:?}", kind),
    })
}
