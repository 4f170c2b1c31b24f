//! Single-shot delivery dispatch keyed by computation handle
//!
//! The engine's finalize signal arrives asynchronously, keyed by the
//! correlation id chosen at queue time. The hub maps each handle to a
//! one-shot channel that resolves exactly once; duplicate signals for a
//! handle are idempotent no-ops, and cancelling a registration never
//! affects other sessions.

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

use veil_core::traits::FinalizeSink;
use veil_core::types::{ComputationHandle, FinalizeSignal};

/// Dispatch table from computation handles to pending subscriptions
#[derive(Debug, Default)]
pub struct DeliveryHub {
    pending: DashMap<ComputationHandle, oneshot::Sender<FinalizeSignal>>,
}

impl DeliveryHub {
    /// Create an empty hub
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single-shot subscription for a handle
    ///
    /// The returned receiver resolves with the first finalize signal the
    /// engine emits for this handle. Registering the same handle twice
    /// replaces the earlier subscription.
    pub fn register(&self, handle: ComputationHandle) -> oneshot::Receiver<FinalizeSignal> {
        let (tx, rx) = oneshot::channel();
        if self.pending.insert(handle, tx).is_some() {
            warn!(%handle, "replaced an existing delivery subscription");
        }
        rx
    }

    /// Drop the subscription for a handle
    ///
    /// Used when a session is abandoned before finalizing.
    pub fn cancel(&self, handle: ComputationHandle) {
        if self.pending.remove(&handle).is_some() {
            debug!(%handle, "delivery subscription cancelled");
        }
    }

    /// Number of pending subscriptions
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[async_trait]
impl FinalizeSink for DeliveryHub {
    async fn finalize(&self, handle: ComputationHandle, signal: FinalizeSignal) {
        match self.pending.remove(&handle) {
            Some((_, tx)) => {
                trace!(%handle, "dispatching finalize signal");
                if tx.send(signal).is_err() {
                    debug!(%handle, "subscriber dropped before delivery");
                }
            }
            // Exactly-once contract: later signals for the same handle land here
            None => trace!(%handle, "ignoring duplicate or unknown finalize signal"),
        }
    }
}
