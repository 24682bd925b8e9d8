//! # MedChain - Medical Records Ledger
//!
//! **Bounded Context:** Record-change ledger & integrity
//! **Architecture Compliance:** DDD + Hexagonal + TDD
//!
//! ## Purpose
//!
//! Stores create, update and delete edits of patient records as an
//! append-only chain of SHA-256 linked blocks. Every block after genesis is
//! sealed by a leading-zero proof-of-work search at a configurable
//! difficulty. A patient index tracks the latest active record per patient;
//! full history is recovered by scanning the chain.
//!
//! ## Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Service                                            │
//! │  - MedicalLedger: one RwLock over chain + index     │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Ports                                              │
//! │  - Inbound: MedicalRecordsApi                       │
//! │  - Outbound: TimeSource                             │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (Inner - Pure Logic)                        │
//! │  - Block / RecordChange                             │
//! │  - Chain, PatientIndex, PoWMiner                    │
//! │  - IdentifierGenerator                              │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Critical Invariants
//!
//! 1. **Self Hash**: `block.hash` recomputes from index, previous hash,
//!    timestamp, payload and nonce
//! 2. **Linkage**: `chain[i].previous_hash == chain[i-1].hash`
//! 3. **Append Only**: blocks are never mutated, removed or reordered
//! 4. **Index Consistency**: the patient index equals a replay of the chain
//! 5. **Atomic Append**: a block is pushed and indexed together or not at all
//!
//! ## Usage Example
//!
//! ```rust
//! use medchain_ledger::{LedgerConfig, MedicalLedger, MedicalRecordsApi, RecordFields};
//!
//! let ledger = MedicalLedger::new(LedgerConfig::default().with_difficulty(1)).unwrap();
//! let receipt = ledger
//!     .append_create(RecordFields::new("Alice Smith", "Flu", "Rest", "2026-10-17"))
//!     .unwrap();
//!
//! assert_eq!(ledger.list_active().len(), 1);
//! assert!(ledger.validate_chain().valid);
//!
//! ledger.append_delete(&receipt.patient_id).unwrap();
//! assert!(ledger.list_active().is_empty());
//! assert_eq!(ledger.history(&receipt.patient_id).len(), 2);
//! ```

#![warn(clippy::all)]

/// Outbound port implementations
pub mod adapters;
/// Domain models and business logic
pub mod domain;
pub mod ports;
pub mod service;
pub mod utils;

mod config;
mod error;
mod metrics;

pub use config::{IdentifierConfig, LedgerConfig};
pub use error::{LedgerError, Result};
pub use metrics::Metrics;

// Re-export commonly used types
pub use domain::{
    Block, BlockHash, Chain, ChainFault, ChainInfo, ChainValidation, CreateReceipt, FaultKind,
    LedgerHealth, PatientIndex, PoWMiner, RecordChange, RecordFields, RecordView,
};

pub use ports::{MedicalRecordsApi, TimeSource};

pub use adapters::{SteppingTimeSource, SystemTimeSource};

pub use service::MedicalLedger;

/// Default leading-zero difficulty
pub const DEFAULT_DIFFICULTY: usize = 2;

/// Hex characters in a SHA-256 digest; no difficulty above this can be met
pub const MAX_DIFFICULTY: usize = 64;
