//! Error types for veil-session

use thiserror::Error;

use veil_core::error::{EngineError, LedgerError};
use veil_core::retry::RetryExhausted;
use veil_crypto::CryptoError;
use veil_schema::SchemaError;

/// Errors that can occur while driving a sharing session
#[derive(Debug, Error)]
pub enum ShareError {
    /// No stored record at the given address
    #[error("No stored record to share")]
    NotStored,

    /// A share for this record is already in flight
    #[error("A share for this record is already queued")]
    AlreadyQueued,

    /// No session is tracking this computation handle
    #[error("Unknown computation handle")]
    UnknownHandle,

    /// The finalize signal never arrived within the confirmation budget
    #[error("Computation did not finalize within {attempts} confirmation attempts")]
    ComputationTimeout { attempts: u32 },

    /// The engine aborted the computation
    #[error("The computation was aborted")]
    ComputationAborted,

    /// The delivery channel closed before a signal arrived
    #[error("Delivery channel closed")]
    DeliveryClosed,

    /// Cryptographic failure
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Codec failure on a delivered record
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Ledger collaborator failure
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Compute engine collaborator failure
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// A retried ledger read exhausted its budget
    #[error("Ledger read failed: {0}")]
    ReadExhausted(#[from] RetryExhausted<LedgerError>),
}

/// Result type for session operations
pub type ShareResult<T> = Result<T, ShareError>;
