//! Collaborator traits for the sharing protocol
//!
//! The session core never talks to a concrete ledger or computation
//! network. Every collaborator is injected behind one of these traits,
//! which keeps the protocol testable against in-memory implementations.

use async_trait::async_trait;

use crate::error::{EngineError, LedgerError};
use crate::types::{CiphertextRecord, ComputationHandle, FinalizeSignal, RecordAddress, ShareRequest};

/// Durable record storage keyed by derived addresses
///
/// The ledger owns durability and confirmation; the core only awaits
/// completion. Reads of recently-published state may be transiently
/// inconsistent and go through the bounded retry adapter on the caller
/// side.
#[async_trait]
pub trait RecordLedger: Send + Sync {
    /// Persist a ciphertext record under an address
    async fn put_record(
        &self,
        address: RecordAddress,
        record: CiphertextRecord,
    ) -> Result<(), LedgerError>;

    /// Fetch the record stored at an address
    async fn get_record(&self, address: &RecordAddress) -> Result<CiphertextRecord, LedgerError>;

    /// Publish the compute cluster's public encryption key
    async fn publish_cluster_key(&self, key: [u8; 32]) -> Result<(), LedgerError>;

    /// Read the compute cluster's public encryption key
    ///
    /// Fails with [`LedgerError::ClusterKeyNotSet`] until a key has been
    /// published and become visible.
    async fn cluster_key(&self) -> Result<[u8; 32], LedgerError>;
}

/// The asynchronous re-encryption engine
///
/// Accepts a share request and eventually emits exactly one terminal
/// [`FinalizeSignal`] per computation handle through the [`FinalizeSink`]
/// it was constructed with. Submission returning `Ok` means the request
/// was accepted, not that it has finished.
#[async_trait]
pub trait ComputeEngine: Send + Sync {
    /// Submit a share request for asynchronous execution
    async fn submit(&self, request: ShareRequest) -> Result<(), EngineError>;
}

/// Destination for engine finalize signals
///
/// Implementations must treat duplicate signals for the same handle as
/// idempotent no-ops.
#[async_trait]
pub trait FinalizeSink: Send + Sync {
    /// Deliver the terminal signal for a computation
    async fn finalize(&self, handle: ComputationHandle, signal: FinalizeSignal);
}
