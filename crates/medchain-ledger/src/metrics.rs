//! Metrics collection for the ledger

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector for the ledger
#[derive(Debug, Default)]
pub struct Metrics {
    /// Total blocks appended after genesis
    pub blocks_appended: AtomicU64,

    /// Total hashes computed while mining
    pub hash_attempts: AtomicU64,

    /// Total PoW mining time (milliseconds)
    pub mining_time_ms: AtomicU64,

    /// Total chain validations run
    pub validations_run: AtomicU64,

    /// Update/delete requests rejected for lack of an active record
    pub rejected_mutations: AtomicU64,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an appended block and the work it took
    pub fn record_block_appended(&self, attempts: u64, mining_ms: u64) {
        self.blocks_appended.fetch_add(1, Ordering::Relaxed);
        self.hash_attempts.fetch_add(attempts, Ordering::Relaxed);
        self.mining_time_ms.fetch_add(mining_ms, Ordering::Relaxed);
    }

    /// Record a validation pass
    pub fn record_validation(&self) {
        self.validations_run.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rejected update or delete
    pub fn record_rejected_mutation(&self) {
        self.rejected_mutations.fetch_add(1, Ordering::Relaxed);
    }

    /// Get blocks appended
    pub fn get_blocks_appended(&self) -> u64 {
        self.blocks_appended.load(Ordering::Relaxed)
    }

    /// Get rejected mutations
    pub fn get_rejected_mutations(&self) -> u64 {
        self.rejected_mutations.load(Ordering::Relaxed)
    }

    /// Get validations run
    pub fn get_validations_run(&self) -> u64 {
        self.validations_run.load(Ordering::Relaxed)
    }

    /// Get average hash attempts per block
    pub fn get_avg_attempts_per_block(&self) -> f64 {
        let blocks = self.blocks_appended.load(Ordering::Relaxed);
        if blocks == 0 {
            return 0.0;
        }
        let attempts = self.hash_attempts.load(Ordering::Relaxed);
        attempts as f64 / blocks as f64
    }
}
