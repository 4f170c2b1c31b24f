//! Error types for veil-core

use thiserror::Error;

/// Errors surfaced by the ledger collaborator
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Record not found at address {0}")]
    RecordNotFound(String),

    #[error("Cluster key not set")]
    ClusterKeyNotSet,

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Ledger I/O error: {0}")]
    Io(String),
}

/// Errors surfaced by the compute engine collaborator
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Computation submission failed: {0}")]
    SubmitFailed(String),

    #[error("Engine unavailable")]
    Unavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_error_display() {
        let err = LedgerError::RecordNotFound("abc123".to_string());
        assert!(format!("{}", err).contains("not found"));
        assert!(format!("{}", err).contains("abc123"));

        assert!(format!("{}", LedgerError::ClusterKeyNotSet).contains("Cluster key"));

        let err = LedgerError::Serialization("bad varint".to_string());
        assert!(format!("{}", err).contains("bad varint"));

        let err = LedgerError::Io("disk full".to_string());
        assert!(format!("{}", err).contains("disk full"));
    }

    #[test]
    fn test_engine_error_display() {
        let err = EngineError::SubmitFailed("mempool full".to_string());
        assert!(format!("{}", err).contains("submission failed"));
        assert!(format!("{}", err).contains("mempool full"));

        assert!(format!("{}", EngineError::Unavailable).contains("unavailable"));
        assert!(format!("{}", EngineError::Unavailable).starts_with("Engine"));
    }
}
