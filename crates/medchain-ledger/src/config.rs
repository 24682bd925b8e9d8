//! Configuration types for the ledger

use crate::error::{LedgerError, Result};
use serde::Deserialize;
use std::env;

/// Runtime configuration for the ledger
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LedgerConfig {
    /// Required count of leading `'0'` characters in a mined block hash
    pub difficulty: usize,

    /// Identifier generation settings
    pub identifiers: IdentifierConfig,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            difficulty: crate::DEFAULT_DIFFICULTY,
            identifiers: IdentifierConfig::default(),
        }
    }
}

impl LedgerConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MEDCHAIN_DIFFICULTY`: leading-zero difficulty (default: 2)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(difficulty) = env::var("MEDCHAIN_DIFFICULTY")
            .ok()
            .and_then(|v| v.trim().parse().ok())
        {
            config.difficulty = difficulty;
        }
        config
    }

    /// Use a specific difficulty
    pub fn with_difficulty(mut self, difficulty: usize) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Reject settings the ledger cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.difficulty > crate::MAX_DIFFICULTY {
            return Err(LedgerError::InvalidConfig(format!(
                "difficulty {} exceeds digest length {}",
                self.difficulty,
                crate::MAX_DIFFICULTY
            )));
        }
        self.identifiers.validate()
    }
}

/// Identifier generation configuration
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IdentifierConfig {
    /// Characters of the normalized name kept as patient id prefix (default: 8)
    pub name_prefix_len: usize,

    /// Patient ids are truncated to this many characters (default: 30)
    pub patient_id_max_len: usize,

    /// Length of the random base36 suffix (default: 11)
    pub random_len: usize,
}

impl Default for IdentifierConfig {
    fn default() -> Self {
        Self {
            name_prefix_len: 8,
            patient_id_max_len: 30,
            random_len: 11,
        }
    }
}

impl IdentifierConfig {
    fn validate(&self) -> Result<()> {
        if self.patient_id_max_len == 0 {
            return Err(LedgerError::InvalidConfig(
                "patient_id_max_len must be positive".to_string(),
            ));
        }
        if self.random_len == 0 {
            return Err(LedgerError::InvalidConfig(
                "random_len must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
