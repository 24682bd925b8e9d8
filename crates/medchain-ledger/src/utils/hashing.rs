//! Hashing utilities for the ledger
//!
//! A block digest is SHA-256 over the concatenation of, in order:
//!
//! | Field | Encoding |
//! |-------|----------|
//! | index | decimal |
//! | previous hash | hex text, `"0"` for genesis |
//! | timestamp | ISO-8601 text |
//! | payload | compact JSON, `type` tag first, fields in declaration order |
//! | nonce | decimal |
//!
//! The digest is rendered as 64 lower-case hex characters. Any change to
//! this encoding changes every hash in an existing chain.

use crate::domain::RecordChange;
use crate::error::Result;
use sha2::{Digest, Sha256};

/// Compute SHA-256 hash of data
#[inline]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Nonce-independent part of a block's hash input.
///
/// Mining hashes the same prefix once per nonce; the hasher state after the
/// prefix is kept and cloned for every attempt.
#[derive(Clone)]
pub struct HashMaterial {
    prefix_state: Sha256,
}

impl HashMaterial {
    /// Serialize the block fields that precede the nonce.
    pub fn new(
        index: u64,
        previous_hash: &str,
        timestamp: &str,
        payload: &RecordChange,
    ) -> Result<Self> {
        let encoded_payload = serde_json::to_string(payload)?;

        let mut prefix_state = Sha256::new();
        prefix_state.update(index.to_string().as_bytes());
        prefix_state.update(previous_hash.as_bytes());
        prefix_state.update(timestamp.as_bytes());
        prefix_state.update(encoded_payload.as_bytes());

        Ok(Self { prefix_state })
    }

    /// Hex digest for a given nonce
    pub fn digest(&self, nonce: u64) -> String {
        let mut hasher = self.prefix_state.clone();
        hasher.update(nonce.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Hash a block's canonical fields
pub fn block_digest(
    index: u64,
    previous_hash: &str,
    timestamp: &str,
    payload: &RecordChange,
    nonce: u64,
) -> Result<String> {
    Ok(HashMaterial::new(index, previous_hash, timestamp, payload)?.digest(nonce))
}

/// Check if hash meets difficulty target
///
/// Returns true if the first `difficulty` characters are all `'0'`.
#[inline]
pub fn meets_difficulty(hash: &str, difficulty: usize) -> bool {
    hash.len() >= difficulty && hash.bytes().take(difficulty).all(|b| b == b'0')
}
