//! Error types for the medical-records ledger

use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur while mutating or configuring the ledger
///
/// A broken chain is not an error: validation reports it as data through
/// [`ChainValidation`](crate::domain::ChainValidation).
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Update or delete referenced a patient with no active record
    #[error("Patient record not found: {patient_id}")]
    NotFound {
        /// Patient identifier that was looked up
        patient_id: String,
    },

    /// Payload could not be canonically serialized for hashing
    #[error("Encoding failure: {0}")]
    EncodingFailure(String),

    /// Block rejected at the chain tail
    #[error("Invalid block at index {index}: {reason}")]
    InvalidBlock {
        /// Index carried by the rejected block
        index: u64,
        /// Which linkage rule it broke
        reason: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl LedgerError {
    /// Check if error is recoverable (caller may correct the request and retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if error is critical (ledger cannot proceed safely)
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            Self::EncodingFailure(_) | Self::InvalidBlock { .. } | Self::InvalidConfig(_)
        )
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::EncodingFailure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_recoverability() {
        let err = LedgerError::NotFound {
            patient_id: "alice_1".to_string(),
        };
        assert!(err.is_recoverable());
        assert!(!err.is_critical());
        assert!(!LedgerError::EncodingFailure("bad".into()).is_recoverable());
    }

    #[test]
    fn test_error_criticality() {
        assert!(LedgerError::EncodingFailure("bad".into()).is_critical());
        assert!(LedgerError::InvalidConfig("difficulty".into()).is_critical());
        assert!(LedgerError::InvalidBlock {
            index: 3,
            reason: "broken link".into()
        }
        .is_critical());
    }

    #[test]
    fn test_not_found_message() {
        let err = LedgerError::NotFound {
            patient_id: "bob_xyz".to_string(),
        };
        assert_eq!(err.to_string(), "Patient record not found: bob_xyz");
    }
}
