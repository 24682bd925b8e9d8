//! Append-only block sequence and its integrity check

use super::entities::{Block, ChainFault, FaultKind};
use super::genesis::{create_genesis_block, is_valid_genesis};
use super::invariants::{check_append, check_block_hash, check_linkage};
use crate::error::{LedgerError, Result};

/// Ordered blocks from genesis to tip.
///
/// Blocks are only added at the tail and are never handed out mutably.
#[derive(Debug, Clone)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// Start a chain holding only a genesis block stamped `timestamp`
    pub fn new(timestamp: String) -> Result<Self> {
        Ok(Self {
            blocks: vec![create_genesis_block(timestamp)?],
        })
    }

    /// Adopt an existing block sequence without checking it.
    ///
    /// Run [`Chain::verify`] to find out whether the sequence holds together.
    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self> {
        if blocks.is_empty() {
            return Err(LedgerError::InvalidBlock {
                index: 0,
                reason: "chain must contain a genesis block".to_string(),
            });
        }
        Ok(Self { blocks })
    }

    /// Block 0
    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    /// Most recently appended block
    pub fn tip(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    /// Number of blocks, genesis included
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false: a chain holds at least its genesis block
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Block at `position`
    pub fn get(&self, position: usize) -> Option<&Block> {
        self.blocks.get(position)
    }

    /// All blocks in chain order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Push a mined block at the tail, returning its position.
    ///
    /// The block must extend the current tip and carry a correct hash.
    pub fn append(&mut self, block: Block) -> Result<usize> {
        check_append(self.tip(), &block)?;
        self.blocks.push(block);
        Ok(self.blocks.len() - 1)
    }

    /// Walk the chain and report the first broken block, if any.
    ///
    /// Genesis is checked for shape and self hash; every later block for self
    /// hash, then linkage to its predecessor.
    pub fn verify(&self) -> Option<ChainFault> {
        if !is_valid_genesis(self.genesis()) {
            return Some(ChainFault {
                index: 0,
                kind: FaultKind::BadGenesis,
            });
        }

        self.blocks.windows(2).enumerate().find_map(|(i, pair)| {
            let (previous, current) = (&pair[0], &pair[1]);
            check_block_hash(current)
                .and_then(|_| check_linkage(previous, current))
                .err()
                .map(|kind| ChainFault {
                    index: (i + 1) as u64,
                    kind,
                })
        })
    }

    /// Every non-genesis block whose payload names `patient_id`, in chain order.
    ///
    /// Tombstones are included.
    pub fn history(&self, patient_id: &str) -> Vec<&Block> {
        self.blocks
            .iter()
            .skip(1)
            .filter(|block| block.patient_id() == Some(patient_id))
            .collect()
    }
}
