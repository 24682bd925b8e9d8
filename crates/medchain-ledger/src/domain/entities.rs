//! Domain entities for the medical-records ledger

use crate::error::Result;
use crate::utils::hashing::HashMaterial;
use serde::{Deserialize, Serialize};

/// Hex-encoded SHA-256 block digest
pub type BlockHash = String;

/// One unit of the ledger carrying a single record change
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Position in the chain
    pub index: u64,

    /// Creation instant, ISO-8601 UTC
    pub timestamp: String,

    /// Record change carried by this block
    pub payload: RecordChange,

    /// Hash of the preceding block (`"0"` for genesis)
    pub previous_hash: BlockHash,

    /// Proof-of-work counter
    pub nonce: u64,

    /// Digest over all preceding fields
    pub hash: BlockHash,
}

impl Block {
    /// Build an unmined block (nonce 0) with its hash already computed
    pub fn new(
        index: u64,
        timestamp: String,
        payload: RecordChange,
        previous_hash: BlockHash,
    ) -> Result<Self> {
        let hash = HashMaterial::new(index, &previous_hash, &timestamp, &payload)?.digest(0);
        Ok(Self {
            index,
            timestamp,
            payload,
            previous_hash,
            nonce: 0,
            hash,
        })
    }

    /// Hash input shared by every nonce of this block
    pub fn hash_material(&self) -> Result<HashMaterial> {
        HashMaterial::new(
            self.index,
            &self.previous_hash,
            &self.timestamp,
            &self.payload,
        )
    }

    /// Recompute the digest from the block's current fields
    pub fn calculate_hash(&self) -> Result<BlockHash> {
        Ok(self.hash_material()?.digest(self.nonce))
    }

    /// Patient the payload refers to, if any
    pub fn patient_id(&self) -> Option<&str> {
        self.payload.patient_id()
    }
}

/// Record-change document, discriminated by `type`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RecordChange {
    /// Fixed payload of block 0
    Genesis {
        /// Always [`GENESIS_MESSAGE`](super::GENESIS_MESSAGE)
        message: String,
    },

    /// First record for a new patient
    Create(CreateRecord),

    /// Replacement of a patient's active record
    Update(UpdateRecord),

    /// Tombstone removing a patient from the active view
    Delete(DeleteRecord),
}

impl RecordChange {
    /// Patient identifier, absent only for genesis
    pub fn patient_id(&self) -> Option<&str> {
        match self {
            Self::Genesis { .. } => None,
            Self::Create(record) => Some(&record.patient_id),
            Self::Update(record) => Some(&record.patient_id),
            Self::Delete(record) => Some(&record.patient_id),
        }
    }

    /// Patient display name, absent only for genesis
    pub fn patient_name(&self) -> Option<&str> {
        match self {
            Self::Genesis { .. } => None,
            Self::Create(record) => Some(&record.patient_name),
            Self::Update(record) => Some(&record.patient_name),
            Self::Delete(record) => Some(&record.patient_name),
        }
    }

    /// True for delete payloads
    pub fn is_tombstone(&self) -> bool {
        matches!(self, Self::Delete(_))
    }
}

/// Payload of a create
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecord {
    pub patient_id: String,
    pub patient_name: String,
    pub diagnosis: String,
    pub treatment: String,
    pub date: String,
    /// Always `false` for a create
    pub deleted: bool,
    pub record_id: String,
}

/// Payload of an update
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecord {
    pub patient_id: String,
    pub patient_name: String,
    pub diagnosis: String,
    pub treatment: String,
    pub date: String,
    /// Always `false` for an update
    pub deleted: bool,
    pub record_id: String,
    /// Hash of the block holding the record being replaced
    pub previous_hash: BlockHash,
}

/// Payload of a delete
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRecord {
    pub patient_id: String,
    pub patient_name: String,
    /// Always `true` for a delete
    pub deleted: bool,
    pub record_id: String,
    /// Hash of the block holding the record being removed
    pub previous_hash: BlockHash,
}

/// Caller-supplied record contents for create and update
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFields {
    pub patient_name: String,
    pub diagnosis: String,
    pub treatment: String,
    pub date: String,
}

impl RecordFields {
    /// Convenience constructor
    pub fn new(
        patient_name: impl Into<String>,
        diagnosis: impl Into<String>,
        treatment: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            patient_name: patient_name.into(),
            diagnosis: diagnosis.into(),
            treatment: treatment.into(),
            date: date.into(),
        }
    }
}

/// Result of a create
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReceipt {
    pub patient_id: String,
    pub block_hash: BlockHash,
}

/// Read-side projection of a block: payload fields plus block metadata
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordView {
    #[serde(flatten)]
    pub change: RecordChange,
    /// Mirrors the payload flag, which already appears in the flattened output
    #[serde(skip_serializing)]
    pub deleted: bool,
    pub hash: BlockHash,
    pub timestamp: String,
    pub index: u64,
}

impl From<&Block> for RecordView {
    fn from(block: &Block) -> Self {
        Self {
            change: block.payload.clone(),
            deleted: block.payload.is_tombstone(),
            hash: block.hash.clone(),
            timestamp: block.timestamp.clone(),
            index: block.index,
        }
    }
}

/// Why a chain failed validation
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FaultKind {
    /// Block 0 is not a well-formed genesis block
    BadGenesis,
    /// Stored hash differs from the recomputed one
    HashMismatch,
    /// `previous_hash` differs from the preceding block's hash
    BrokenLink,
    /// Payload could not be encoded for rehashing
    Unhashable,
}

/// First point of failure found by validation
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChainFault {
    pub index: u64,
    pub kind: FaultKind,
}

/// Outcome of a whole-chain validation
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainValidation {
    pub valid: bool,
    pub chain_length: usize,
    pub patient_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<ChainFault>,
}

/// Liveness report
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerHealth {
    pub status: String,
    pub timestamp: String,
    pub chain_length: usize,
    pub difficulty: usize,
}

/// Ledger summary including the tip
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfo {
    pub chain_length: usize,
    pub difficulty: usize,
    pub patient_count: usize,
    pub is_valid: bool,
    pub latest_block: Block,
}
