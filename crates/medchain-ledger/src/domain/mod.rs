//! Domain layer - Pure ledger logic
//!
//! Everything here is synchronous and free of I/O. Time and randomness reach
//! the domain as arguments; locking lives in the service layer.
//!
//! ## Entities
//!
//! - [`Block`]: one immutable ledger unit
//! - [`RecordChange`]: tagged create / update / delete payload
//! - [`RecordView`]: read-side projection of a block
//!
//! ## Services
//!
//! - [`Chain`]: append-only sequence, validation, history scan
//! - [`PatientIndex`]: latest active block per patient
//! - [`PoWMiner`]: leading-zero nonce search
//! - [`IdentifierGenerator`]: patient and record ids

mod chain;
mod entities;
pub mod genesis;
mod identifiers;
mod index;
pub mod invariants;
mod mining;

pub use chain::Chain;
pub use entities::*;
pub use genesis::{create_genesis_block, is_valid_genesis, GENESIS_MESSAGE, GENESIS_PREVIOUS_HASH};
pub use identifiers::IdentifierGenerator;
pub use index::PatientIndex;
pub use mining::{MiningStats, PoWMiner};
