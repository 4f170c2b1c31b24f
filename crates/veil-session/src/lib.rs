//! # Veil Session
//!
//! The share state machine for the veil record-sharing protocol.
//!
//! Orchestrates the lifecycle of a confidential sharing session:
//! a ciphertext record is stored on the ledger, a share request is queued
//! with the compute engine, and the re-encrypted record addressed to the
//! receiver is awaited through a single-shot delivery subscription keyed
//! by the computation handle.
//!
//! ```text
//! Stored -> Queued -> Computing -> Finalized -> Delivered
//!              \          \
//!               +----------+--> Errored
//! ```
//!
//! Sessions for different records proceed concurrently and share no
//! mutable state beyond the delivery hub's dispatch table.
//!
//! ## Example
//!
//! ```rust,ignore
//! use veil_session::{DeliveryHub, InMemoryLedger, LocalComputeEngine, SharingClient};
//!
//! let ledger = Arc::new(InMemoryLedger::new());
//! let hub = Arc::new(DeliveryHub::new());
//! let engine = Arc::new(LocalComputeEngine::new(ledger.clone(), hub.clone()));
//! let client = SharingClient::new(ledger, engine, hub);
//!
//! let address = client.store(&sender_public, ciphertext).await?;
//! let handle = client
//!     .queue_share(address, receiver_public, receiver_nonce, sender_public, nonce)
//!     .await?;
//! let delivered = client.await_delivery(handle).await?;
//! ```

pub mod delivery;
pub mod error;
pub mod memory;
pub mod session;
pub mod state;

// Re-exports
pub use delivery::DeliveryHub;
pub use error::{ShareError, ShareResult};
pub use memory::{InMemoryLedger, LocalComputeEngine};
pub use session::{open_delivery, SessionConfig, SharingClient};
pub use state::ShareState;
