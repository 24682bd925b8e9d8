//! Concrete Medical Ledger Service Implementation
//!
//! This module provides the ledger object the serving layer owns. It
//! implements [`MedicalRecordsApi`] over a single chain and patient index.
//!
//! ## Locking
//!
//! Chain and index sit behind one `RwLock`. An append holds the write lock
//! from reading the tip until the index is updated, so mining never runs
//! against a stale tip and readers never see a block without its index
//! entry. Reads share the lock.

use crate::{
    adapters::SystemTimeSource,
    config::LedgerConfig,
    domain::{
        Block, BlockHash, Chain, ChainInfo, ChainValidation, CreateReceipt, CreateRecord,
        DeleteRecord, IdentifierGenerator, LedgerHealth, PatientIndex, PoWMiner, RecordChange,
        RecordFields, RecordView, UpdateRecord,
    },
    error::{LedgerError, Result},
    metrics::Metrics,
    ports::{MedicalRecordsApi, TimeSource},
};
use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, warn};

/// Chain plus the index derived from it
struct LedgerState {
    chain: Chain,
    index: PatientIndex,
}

/// Single-writer, in-memory ledger of medical-record edits
pub struct MedicalLedger {
    /// Ledger configuration
    config: LedgerConfig,

    /// Chain and patient index, always updated together
    state: RwLock<LedgerState>,

    /// PoW miner at the configured difficulty
    miner: PoWMiner,

    /// Patient and record id minting
    identifiers: IdentifierGenerator,

    /// Source of block timestamps
    clock: Arc<dyn TimeSource>,

    /// Counters
    metrics: Metrics,
}

impl MedicalLedger {
    /// Create a ledger holding only a genesis block, stamped by the system clock
    pub fn new(config: LedgerConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemTimeSource))
    }

    /// Create a ledger holding only a genesis block, stamped by `clock`
    pub fn with_clock(config: LedgerConfig, clock: Arc<dyn TimeSource>) -> Result<Self> {
        config.validate()?;
        let chain = Chain::new(format_timestamp(clock.now()))?;
        Ok(Self::assemble(config, chain, clock))
    }

    /// Adopt an existing chain, rebuilding the patient index by replay.
    ///
    /// The chain is not required to validate; call
    /// [`validate_chain`](MedicalRecordsApi::validate_chain) to audit it.
    pub fn from_chain(config: LedgerConfig, chain: Chain, clock: Arc<dyn TimeSource>) -> Result<Self> {
        config.validate()?;
        if let Some(fault) = chain.verify() {
            warn!(
                "[medchain] Adopted chain fails validation at block {}: {:?}",
                fault.index, fault.kind
            );
        }
        Ok(Self::assemble(config, chain, clock))
    }

    fn assemble(config: LedgerConfig, chain: Chain, clock: Arc<dyn TimeSource>) -> Self {
        let index = PatientIndex::rebuild(&chain);

        info!("[medchain] Initializing medical ledger");
        info!("  Mining difficulty: {}", config.difficulty);
        info!("  Genesis block hash: {}", chain.genesis().hash);
        info!("  Chain length: {}, active patients: {}", chain.len(), index.len());

        Self {
            miner: PoWMiner::new(config.difficulty),
            identifiers: IdentifierGenerator::new(config.identifiers.clone()),
            config,
            state: RwLock::new(LedgerState { chain, index }),
            clock,
            metrics: Metrics::new(),
        }
    }

    /// Get the ledger configuration
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Get the ledger counters
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Copy of the current chain, for export or audit
    pub fn chain_snapshot(&self) -> Chain {
        self.state.read().chain.clone()
    }

    /// Number of blocks, genesis included
    pub fn chain_length(&self) -> usize {
        self.state.read().chain.len()
    }

    /// Build, mine, push and index one block. Caller holds the write lock.
    ///
    /// Nothing is pushed unless mining succeeded, and the index changes only
    /// after the push succeeded.
    #[tracing::instrument(skip_all, fields(index = state.chain.len()))]
    fn append_locked(
        &self,
        state: &mut LedgerState,
        payload: RecordChange,
        now: DateTime<Utc>,
    ) -> Result<BlockHash> {
        let LedgerState { chain, index } = state;

        let mut block = Block::new(
            chain.len() as u64,
            format_timestamp(now),
            payload,
            chain.tip().hash.clone(),
        )?;

        let stats = self.miner.mine(&mut block)?;
        let hash = block.hash.clone();

        let position = chain.append(block)?;
        if let Some(appended) = chain.get(position) {
            index.apply(position, appended);
        }

        let mining_ms = u64::try_from(stats.elapsed.as_millis()).unwrap_or(u64::MAX);
        self.metrics.record_block_appended(stats.attempts, mining_ms);

        info!(
            block_index = position,
            block_hash = %hash,
            nonce = stats.nonce,
            attempts = stats.attempts,
            elapsed_ms = mining_ms,
            "Block mined and appended"
        );

        Ok(hash)
    }

    fn not_found(&self, patient_id: &str) -> LedgerError {
        self.metrics.record_rejected_mutation();
        warn!(patient_id, "No active record for patient");
        LedgerError::NotFound {
            patient_id: patient_id.to_string(),
        }
    }
}

impl MedicalRecordsApi for MedicalLedger {
    fn append_create(&self, fields: RecordFields) -> Result<CreateReceipt> {
        let mut state = self.state.write();
        let now = self.clock.now();

        let patient_id = self.identifiers.patient_id(&fields.patient_name, now);
        let payload = RecordChange::Create(CreateRecord {
            patient_id: patient_id.clone(),
            patient_name: fields.patient_name,
            diagnosis: fields.diagnosis,
            treatment: fields.treatment,
            date: fields.date,
            deleted: false,
            record_id: self.identifiers.record_id(now),
        });

        let block_hash = self.append_locked(&mut state, payload, now)?;
        info!(%patient_id, "Added record");

        Ok(CreateReceipt {
            patient_id,
            block_hash,
        })
    }

    fn append_update(&self, patient_id: &str, fields: RecordFields) -> Result<BlockHash> {
        let mut state = self.state.write();

        let replaced = state
            .index
            .latest(patient_id)
            .and_then(|position| state.chain.get(position))
            .map(|block| block.hash.clone())
            .ok_or_else(|| self.not_found(patient_id))?;

        let now = self.clock.now();
        let payload = RecordChange::Update(UpdateRecord {
            patient_id: patient_id.to_string(),
            patient_name: fields.patient_name,
            diagnosis: fields.diagnosis,
            treatment: fields.treatment,
            date: fields.date,
            deleted: false,
            record_id: self.identifiers.record_id(now),
            previous_hash: replaced,
        });

        let block_hash = self.append_locked(&mut state, payload, now)?;
        info!(patient_id, "Edited record");
        Ok(block_hash)
    }

    fn append_delete(&self, patient_id: &str) -> Result<BlockHash> {
        let mut state = self.state.write();

        let (replaced, patient_name) = state
            .index
            .latest(patient_id)
            .and_then(|position| state.chain.get(position))
            .map(|block| {
                (
                    block.hash.clone(),
                    block.payload.patient_name().unwrap_or_default().to_string(),
                )
            })
            .ok_or_else(|| self.not_found(patient_id))?;

        let now = self.clock.now();
        let payload = RecordChange::Delete(DeleteRecord {
            patient_id: patient_id.to_string(),
            patient_name,
            deleted: true,
            record_id: self.identifiers.record_id(now),
            previous_hash: replaced,
        });

        let block_hash = self.append_locked(&mut state, payload, now)?;
        info!(patient_id, "Deleted record");
        Ok(block_hash)
    }

    fn list_active(&self) -> Vec<RecordView> {
        let state = self.state.read();
        let mut records: Vec<RecordView> = state
            .index
            .positions()
            .filter_map(|position| state.chain.get(position))
            .map(RecordView::from)
            .collect();
        records.sort_by_key(|record| record.index);
        records
    }

    fn history(&self, patient_id: &str) -> Vec<RecordView> {
        let state = self.state.read();
        state
            .chain
            .history(patient_id)
            .into_iter()
            .map(RecordView::from)
            .collect()
    }

    fn latest_record(&self, patient_id: &str) -> Option<RecordView> {
        let state = self.state.read();
        state
            .index
            .latest(patient_id)
            .and_then(|position| state.chain.get(position))
            .map(RecordView::from)
    }

    fn validate_chain(&self) -> ChainValidation {
        let state = self.state.read();
        let fault = state.chain.verify();
        self.metrics.record_validation();

        if let Some(fault) = fault {
            warn!(
                block_index = fault.index,
                kind = ?fault.kind,
                "Chain validation failed"
            );
        }

        ChainValidation {
            valid: fault.is_none(),
            chain_length: state.chain.len(),
            patient_count: state.index.len(),
            fault,
        }
    }

    fn health(&self) -> LedgerHealth {
        LedgerHealth {
            status: "OK".to_string(),
            timestamp: format_timestamp(self.clock.now()),
            chain_length: self.chain_length(),
            difficulty: self.config.difficulty,
        }
    }

    fn chain_info(&self) -> ChainInfo {
        let state = self.state.read();
        ChainInfo {
            chain_length: state.chain.len(),
            difficulty: self.config.difficulty,
            patient_count: state.index.len(),
            is_valid: state.chain.verify().is_none(),
            latest_block: state.chain.tip().clone(),
        }
    }
}

/// ISO-8601 UTC with millisecond precision, e.g. `2026-10-18T09:30:00.000Z`
fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}
