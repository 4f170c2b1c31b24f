//! # Veil Core
//!
//! Core protocol types and collaborator traits for the veil
//! confidential record-sharing protocol.
//!
//! This crate defines the shared vocabulary of the protocol: ciphertext
//! records, share requests, computation handles, and derived record
//! addresses, along with the traits the sharing session uses to talk to
//! its external collaborators (ledger and compute engine).
//!
//! ## Key Types
//!
//! - [`CiphertextRecord`]: an encrypted record with its nonce and the
//!   encrypting party's public key
//! - [`ShareRequest`]: a queued request to re-encrypt a record for a receiver
//! - [`ComputationHandle`]: the random correlation id linking a request to
//!   its finalize signal
//! - [`RecordAddress`]: the derived ledger address a record is stored under
//!
//! ## Collaborator Traits
//!
//! - [`RecordLedger`]: durable record storage keyed by address
//! - [`ComputeEngine`]: the asynchronous re-encryption engine
//! - [`FinalizeSink`]: where the engine delivers its terminal signal

pub mod error;
pub mod retry;
pub mod traits;
pub mod types;

// Re-exports
pub use error::{EngineError, LedgerError};
pub use retry::{with_retry, RetryExhausted};
pub use traits::{ComputeEngine, FinalizeSink, RecordLedger};
pub use types::{CiphertextRecord, ComputationHandle, FinalizeSignal, RecordAddress, ShareRequest};
