//! Proof-of-work nonce search
//!
//! Difficulty is an artificial delay knob: the ledger has a single writer and
//! no network, so the work secures nothing beyond making rewrites costly.

use super::entities::Block;
use crate::error::Result;
use crate::utils::hashing::meets_difficulty;
use std::time::{Duration, Instant};

/// Outcome of a completed search
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MiningStats {
    /// Winning nonce
    pub nonce: u64,
    /// Hashes computed, including the winning one
    pub attempts: u64,
    /// Wall time spent searching
    pub elapsed: Duration,
}

/// Sequential nonce search against a leading-zero target
#[derive(Clone, Debug)]
pub struct PoWMiner {
    difficulty: usize,
}

impl PoWMiner {
    /// Create a miner requiring `difficulty` leading `'0'` hex characters
    pub fn new(difficulty: usize) -> Self {
        Self { difficulty }
    }

    /// Configured difficulty
    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    /// Search nonces from 0 upwards until the block hash meets the target.
    ///
    /// Sets `nonce` and `hash` on the block. There is no iteration cap and no
    /// cancellation; the search runs to completion on the caller's thread.
    #[tracing::instrument(skip(self, block), fields(index = block.index, difficulty = self.difficulty))]
    pub fn mine(&self, block: &mut Block) -> Result<MiningStats> {
        let started = Instant::now();
        let material = block.hash_material()?;

        tracing::debug!("Starting PoW search for block {}", block.index);

        let mut nonce = 0u64;
        let mut hash = material.digest(nonce);
        let mut attempts = 1u64;

        while !meets_difficulty(&hash, self.difficulty) {
            nonce += 1;
            hash = material.digest(nonce);
            attempts += 1;
        }

        block.nonce = nonce;
        block.hash = hash;

        Ok(MiningStats {
            nonce,
            attempts,
            elapsed: started.elapsed(),
        })
    }
}
