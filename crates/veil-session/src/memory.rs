//! In-memory collaborator implementations
//!
//! These back the integration tests and simulation environments: a
//! DashMap-based ledger and a local compute engine that performs the
//! re-encryption an MPC network would perform. Neither is intended for
//! production use.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, trace, warn};

use veil_core::error::{EngineError, LedgerError};
use veil_core::traits::{ComputeEngine, FinalizeSink, RecordLedger};
use veil_core::types::{CiphertextRecord, FinalizeSignal, RecordAddress, ShareRequest};
use veil_crypto::{PublicKey, RecordCipher, SessionKeyPair};

/// In-memory implementation of [`RecordLedger`]
///
/// Records are persisted in their wire encoding, so the serialization
/// path is exercised the same way a durable ledger would.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    records: DashMap<RecordAddress, Vec<u8>>,
    cluster_key: RwLock<Option<[u8; 32]>>,
}

impl InMemoryLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

#[async_trait]
impl RecordLedger for InMemoryLedger {
    async fn put_record(
        &self,
        address: RecordAddress,
        record: CiphertextRecord,
    ) -> Result<(), LedgerError> {
        let bytes = record.to_bytes()?;
        trace!(%address, bytes = bytes.len(), "persisting ciphertext record");
        self.records.insert(address, bytes);
        Ok(())
    }

    async fn get_record(&self, address: &RecordAddress) -> Result<CiphertextRecord, LedgerError> {
        match self.records.get(address) {
            Some(bytes) => CiphertextRecord::from_bytes(&bytes),
            None => Err(LedgerError::RecordNotFound(address.to_string())),
        }
    }

    async fn publish_cluster_key(&self, key: [u8; 32]) -> Result<(), LedgerError> {
        debug!("cluster key published");
        *self
            .cluster_key
            .write()
            .map_err(|e| LedgerError::Io(e.to_string()))? = Some(key);
        Ok(())
    }

    async fn cluster_key(&self) -> Result<[u8; 32], LedgerError> {
        self.cluster_key
            .read()
            .map_err(|e| LedgerError::Io(e.to_string()))?
            .ok_or(LedgerError::ClusterKeyNotSet)
    }
}

/// Local stand-in for the MPC computation network
///
/// Owns the cluster key pair and re-encrypts shared records the way the
/// external engine would: decrypt under dh(cluster, sender), re-encrypt
/// under dh(cluster, receiver). Each submission executes asynchronously
/// and delivers exactly one terminal signal to the injected sink.
pub struct LocalComputeEngine<L> {
    ledger: Arc<L>,
    sink: Arc<dyn FinalizeSink>,
    cluster: Arc<SessionKeyPair>,
}

impl<L: RecordLedger + 'static> LocalComputeEngine<L> {
    /// Create an engine with a fresh cluster key pair
    pub fn new(ledger: Arc<L>, sink: Arc<dyn FinalizeSink>) -> Self {
        Self {
            ledger,
            sink,
            cluster: Arc::new(SessionKeyPair::generate()),
        }
    }

    /// The cluster's public encryption key
    pub fn cluster_public(&self) -> [u8; 32] {
        self.cluster.public_bytes()
    }

    /// Publish the cluster key to the ledger
    pub async fn publish_cluster_key(&self) -> Result<(), LedgerError> {
        self.ledger
            .publish_cluster_key(self.cluster.public_bytes())
            .await
    }

    /// Execute one share request to its terminal signal
    async fn execute(
        ledger: &L,
        cluster: &SessionKeyPair,
        request: &ShareRequest,
    ) -> FinalizeSignal {
        let stored = match ledger.get_record(&request.address).await {
            Ok(record) => record,
            Err(e) => {
                warn!(handle = %request.handle, %e, "share aborted: record unavailable");
                return FinalizeSignal::Aborted;
            }
        };

        let sender_key =
            match cluster.derive_shared_secret(&PublicKey::from(request.sender_public)) {
                Ok(key) => key,
                Err(e) => {
                    warn!(handle = %request.handle, %e, "share aborted: bad sender key");
                    return FinalizeSignal::Aborted;
                }
            };
        let receiver_key =
            match cluster.derive_shared_secret(&PublicKey::from(request.receiver_public)) {
                Ok(key) => key,
                Err(e) => {
                    warn!(handle = %request.handle, %e, "share aborted: bad receiver key");
                    return FinalizeSignal::Aborted;
                }
            };

        let plaintext = RecordCipher::new(sender_key).decrypt(request.sender_nonce, &stored.fields);
        let fields = RecordCipher::new(receiver_key).encrypt(request.receiver_nonce, &plaintext);

        trace!(handle = %request.handle, fields = fields.len(), "record re-encrypted for receiver");
        FinalizeSignal::Finalized(CiphertextRecord::new(
            fields,
            request.receiver_nonce,
            cluster.public_bytes(),
        ))
    }
}

#[async_trait]
impl<L: RecordLedger + 'static> ComputeEngine for LocalComputeEngine<L> {
    async fn submit(&self, request: ShareRequest) -> Result<(), EngineError> {
        let ledger = self.ledger.clone();
        let cluster = self.cluster.clone();
        let sink = self.sink.clone();

        // Submission returns before the computation completes
        tokio::spawn(async move {
            let signal = Self::execute(&ledger, &cluster, &request).await;
            sink.finalize(request.handle, signal).await;
        });

        debug!(handle = %request.handle, "share request accepted");
        Ok(())
    }
}
