//! The sharing client: store, queue-share, await delivery
//!
//! One client drives any number of concurrent sharing sessions, one per
//! stored record. Collaborators are injected at construction; the client
//! never reads process-wide state.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use veil_core::retry::with_retry;
use veil_core::traits::{ComputeEngine, RecordLedger};
use veil_core::types::{CiphertextRecord, ComputationHandle, FinalizeSignal, RecordAddress, ShareRequest};
use veil_crypto::{PublicKey, RecordCipher, SessionKeyPair};
use veil_schema::{PatientRecord, RecordSchema};

use crate::delivery::DeliveryHub;
use crate::error::{ShareError, ShareResult};
use crate::state::ShareState;

/// Seed label records are stored under, shared by all participants
const RECORD_SEED: &[u8] = b"patient_data";

/// Tuning knobs for one sharing client
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Confirmation attempts before a share is declared timed out
    pub max_confirmations: u32,
    /// Wait per confirmation attempt
    pub poll_delay: Duration,
    /// Attempts for eventually-consistent ledger reads
    pub read_attempts: u32,
    /// Delay between ledger read attempts
    pub read_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_confirmations: 20,
            poll_delay: Duration::from_millis(250),
            read_attempts: 10,
            read_delay: Duration::from_millis(100),
        }
    }
}

/// Per-record session bookkeeping
struct SessionEntry {
    state: ShareState,
    handle: Option<ComputationHandle>,
    pending: Option<oneshot::Receiver<FinalizeSignal>>,
}

impl SessionEntry {
    fn stored() -> Self {
        Self {
            state: ShareState::Stored,
            handle: None,
            pending: None,
        }
    }
}

/// Client driving confidential sharing sessions
///
/// Generic over its ledger and engine collaborators so tests can run
/// against in-memory implementations.
pub struct SharingClient<L, E> {
    ledger: Arc<L>,
    engine: Arc<E>,
    hub: Arc<DeliveryHub>,
    sessions: DashMap<RecordAddress, SessionEntry>,
    by_handle: DashMap<ComputationHandle, RecordAddress>,
    config: SessionConfig,
}

impl<L, E> SharingClient<L, E>
where
    L: RecordLedger,
    E: ComputeEngine,
{
    /// Create a client with default configuration
    pub fn new(ledger: Arc<L>, engine: Arc<E>, hub: Arc<DeliveryHub>) -> Self {
        Self::with_config(ledger, engine, hub, SessionConfig::default())
    }

    /// Create a client with explicit configuration
    pub fn with_config(
        ledger: Arc<L>,
        engine: Arc<E>,
        hub: Arc<DeliveryHub>,
        config: SessionConfig,
    ) -> Self {
        Self {
            ledger,
            engine,
            hub,
            sessions: DashMap::new(),
            by_handle: DashMap::new(),
            config,
        }
    }

    /// Current lifecycle state of the session at an address
    pub fn state(&self, address: &RecordAddress) -> Option<ShareState> {
        self.sessions.get(address).map(|entry| entry.state)
    }

    /// Number of handles still awaiting a terminal signal
    ///
    /// A handle is tracked from `queue_share` until its session reaches
    /// a terminal state or is abandoned.
    pub fn open_handles(&self) -> usize {
        self.by_handle.len()
    }

    /// Persist a ciphertext record under its owner's derived address
    ///
    /// The caller has already encrypted the record; plaintext never
    /// reaches this client. Storing again at the same address begins a
    /// new sharing act, but fails with [`ShareError::AlreadyQueued`]
    /// while a share for the existing record is still in flight, so an
    /// active session is never silently dropped.
    pub async fn store(
        &self,
        owner_public: &[u8; 32],
        record: CiphertextRecord,
    ) -> ShareResult<RecordAddress> {
        let address = RecordAddress::derive(owner_public, RECORD_SEED);
        if let Some(entry) = self.sessions.get(&address) {
            if entry.state.in_flight() {
                return Err(ShareError::AlreadyQueued);
            }
        }
        self.ledger.put_record(address, record).await?;
        self.sessions.insert(address, SessionEntry::stored());
        debug!(%address, "ciphertext record stored");
        Ok(address)
    }

    /// Queue the re-encryption of a stored record for a receiver
    ///
    /// Generates a fresh random computation handle, registers the
    /// delivery subscription, and submits the share request. Fails with
    /// [`ShareError::AlreadyQueued`] while a share for this record is in
    /// flight.
    pub async fn queue_share(
        &self,
        address: RecordAddress,
        receiver_public: [u8; 32],
        receiver_nonce: u128,
        sender_public: [u8; 32],
        sender_nonce: u128,
    ) -> ShareResult<ComputationHandle> {
        let handle = {
            let mut entry = self
                .sessions
                .get_mut(&address)
                .ok_or(ShareError::NotStored)?;

            if entry.state != ShareState::Stored {
                return Err(ShareError::AlreadyQueued);
            }

            let handle = ComputationHandle::generate();
            entry.pending = Some(self.hub.register(handle));
            entry.handle = Some(handle);
            entry.state = ShareState::Queued;
            handle
        };
        self.by_handle.insert(handle, address);

        let request = ShareRequest {
            handle,
            address,
            receiver_public,
            receiver_nonce,
            sender_public,
            sender_nonce,
        };

        if let Err(e) = self.engine.submit(request).await {
            self.by_handle.remove(&handle);
            self.advance(address, ShareState::Errored);
            self.hub.cancel(handle);
            return Err(e.into());
        }

        debug!(%handle, %address, "share request queued");
        Ok(handle)
    }

    /// Await the re-encrypted record for a queued share
    ///
    /// Resolves exactly once per handle. After the configured number of
    /// confirmation attempts without a finalize signal, the session moves
    /// to `Errored` and [`ShareError::ComputationTimeout`] is returned.
    pub async fn await_delivery(
        &self,
        handle: ComputationHandle,
    ) -> ShareResult<CiphertextRecord> {
        let address = *self
            .by_handle
            .get(&handle)
            .ok_or(ShareError::UnknownHandle)?;

        let mut rx = self
            .sessions
            .get_mut(&address)
            .and_then(|mut entry| entry.pending.take())
            .ok_or(ShareError::UnknownHandle)?;

        let attempts = self.config.max_confirmations.max(1);
        for attempt in 1..=attempts {
            match timeout(self.config.poll_delay, &mut rx).await {
                Ok(Ok(FinalizeSignal::Finalized(record))) => {
                    self.observe_completion(handle, address, true);
                    debug!(%handle, %address, "re-encrypted record delivered");
                    return Ok(record);
                }
                Ok(Ok(FinalizeSignal::Aborted)) => {
                    self.observe_completion(handle, address, false);
                    warn!(%handle, %address, "computation aborted by engine");
                    return Err(ShareError::ComputationAborted);
                }
                Ok(Err(_)) => {
                    self.by_handle.remove(&handle);
                    self.advance(address, ShareState::Errored);
                    return Err(ShareError::DeliveryClosed);
                }
                Err(_) => {
                    trace!(%handle, attempt, attempts, "no finalize signal yet");
                }
            }
        }

        self.by_handle.remove(&handle);
        self.advance(address, ShareState::Errored);
        self.hub.cancel(handle);
        warn!(%handle, %address, attempts, "computation did not finalize in time");
        Err(ShareError::ComputationTimeout { attempts })
    }

    /// Abandon a session before it finalizes
    ///
    /// Drops the delivery subscription and forgets the session. The
    /// engine owns its own cleanup; other sessions are unaffected.
    pub fn abandon(&self, handle: ComputationHandle) {
        self.hub.cancel(handle);
        if let Some((_, address)) = self.by_handle.remove(&handle) {
            self.sessions.remove(&address);
            debug!(%handle, %address, "session abandoned");
        }
    }

    /// Read the compute cluster's public key from the ledger
    ///
    /// A freshly-published key may not be visible immediately, so the
    /// read goes through the bounded retry adapter.
    pub async fn fetch_cluster_key(&self) -> ShareResult<[u8; 32]> {
        let key = with_retry(
            || async { self.ledger.cluster_key().await },
            self.config.read_attempts,
            self.config.read_delay,
        )
        .await?;
        Ok(key)
    }

    /// Fetch the record stored at an address
    pub async fn fetch_record(&self, address: &RecordAddress) -> ShareResult<CiphertextRecord> {
        Ok(self.ledger.get_record(address).await?)
    }

    /// Walk the engine-owned leg of the lifecycle once its terminal
    /// signal has been observed
    ///
    /// Terminal states release the handle mapping so long-lived clients
    /// do not accumulate entries for settled sessions.
    fn observe_completion(&self, handle: ComputationHandle, address: RecordAddress, finalized: bool) {
        self.by_handle.remove(&handle);
        self.advance(address, ShareState::Computing);
        if finalized {
            self.advance(address, ShareState::Finalized);
            self.advance(address, ShareState::Delivered);
        } else {
            self.advance(address, ShareState::Errored);
        }
    }

    fn advance(&self, address: RecordAddress, next: ShareState) {
        if let Some(mut entry) = self.sessions.get_mut(&address) {
            if entry.state.can_transition_to(next) {
                trace!(%address, from = %entry.state, to = %next, "session transition");
                entry.state = next;
            } else {
                debug!(%address, from = %entry.state, to = %next, "ignoring illegal transition");
            }
        }
    }
}

/// Decrypt and decode a delivered record on the receiver side
///
/// Derives the shared secret between the receiver's session key and the
/// delivering party's public key, decrypts the fields under the record's
/// nonce, and decodes them against the schema. A wrong key does not fail
/// the decrypt itself; it surfaces as a schema-level delivery mismatch.
pub fn open_delivery(
    record: &CiphertextRecord,
    receiver: &SessionKeyPair,
    schema: &RecordSchema,
) -> ShareResult<PatientRecord> {
    let encryptor = PublicKey::from(record.encryptor_public);
    let key = receiver.derive_shared_secret(&encryptor)?;
    let fields = RecordCipher::new(key).decrypt(record.nonce, &record.fields);
    Ok(PatientRecord::decode_fields(schema, &fields)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_are_bounded() {
        let config = SessionConfig::default();
        assert!(config.max_confirmations > 0);
        assert!(config.read_attempts > 0);
        assert!(config.poll_delay > Duration::ZERO);
    }
}
