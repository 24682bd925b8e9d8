//! Utility modules for the ledger

pub mod hashing;

pub use hashing::{block_digest, meets_difficulty, sha256, HashMaterial};
