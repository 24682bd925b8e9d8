//! # Patient Index
//!
//! Mapping from patient id to the chain position of that patient's latest
//! non-deleted block. The index is a cache over the chain: replaying the
//! chain through [`PatientIndex::apply`] reproduces it exactly.

use super::chain::Chain;
use super::entities::{Block, RecordChange};
use std::collections::HashMap;

/// Latest active block per patient.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientIndex {
    /// patient id -> chain position
    entries: HashMap<String, usize>,
}

impl PatientIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Derive the index by replaying every block of `chain` in order.
    pub fn rebuild(chain: &Chain) -> Self {
        let mut index = Self::new();
        for (position, block) in chain.blocks().iter().enumerate() {
            index.apply(position, block);
        }
        index
    }

    /// Point `patient_id` at the block stored at `position`.
    pub fn upsert(&mut self, patient_id: &str, position: usize) {
        self.entries.insert(patient_id.to_string(), position);
    }

    /// Drop `patient_id` from the active view.
    pub fn remove(&mut self, patient_id: &str) -> Option<usize> {
        self.entries.remove(patient_id)
    }

    /// Chain position of the patient's latest active block.
    pub fn latest(&self, patient_id: &str) -> Option<usize> {
        self.entries.get(patient_id).copied()
    }

    /// Apply the single synchronization rule for a block appended at `position`.
    ///
    /// Create and update upsert, delete removes, genesis is ignored.
    pub fn apply(&mut self, position: usize, block: &Block) {
        match &block.payload {
            RecordChange::Genesis { .. } => {}
            RecordChange::Create(record) => self.upsert(&record.patient_id, position),
            RecordChange::Update(record) => self.upsert(&record.patient_id, position),
            RecordChange::Delete(record) => {
                self.remove(&record.patient_id);
            }
        }
    }

    /// Chain positions of all active records.
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.values().copied()
    }

    /// Number of active patients.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no patient is active.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
