//! Inbound ports (driving side - API)

use crate::domain::{
    BlockHash, ChainInfo, ChainValidation, CreateReceipt, LedgerHealth, RecordFields, RecordView,
};
use crate::error::Result;

/// Primary port: the operations a serving layer may invoke on the ledger.
///
/// Inputs are assumed validated by the caller. Mutations mine synchronously
/// and block the calling thread until the block is appended.
pub trait MedicalRecordsApi: Send + Sync {
    /// Mint a patient id and append a create block
    fn append_create(&self, fields: RecordFields) -> Result<CreateReceipt>;

    /// Append an update for a patient with an active record
    fn append_update(&self, patient_id: &str, fields: RecordFields) -> Result<BlockHash>;

    /// Append a tombstone for a patient with an active record
    fn append_delete(&self, patient_id: &str) -> Result<BlockHash>;

    /// Latest record of every active patient
    fn list_active(&self) -> Vec<RecordView>;

    /// Every block for `patient_id`, oldest first, tombstones included
    fn history(&self, patient_id: &str) -> Vec<RecordView>;

    /// Latest active record for `patient_id`
    fn latest_record(&self, patient_id: &str) -> Option<RecordView>;

    /// Whole-chain integrity check
    fn validate_chain(&self) -> ChainValidation;

    /// Liveness report
    fn health(&self) -> LedgerHealth;

    /// Summary including the tip block
    fn chain_info(&self) -> ChainInfo;
}
