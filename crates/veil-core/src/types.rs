//! Protocol types shared across the veil workspace
//!
//! These are the wire-level structures of the sharing protocol. Field
//! widths and ordering are a compile-time contract shared by all
//! participants; records only ever cross the trust boundary as ciphertext.

use std::fmt;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Caller-chosen random correlation identifier for a queued computation
///
/// Links a share request to the finalize signal the engine eventually
/// emits for it. Single use: exactly one `queue_share` per stored record
/// per sharing act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComputationHandle(pub u64);

impl ComputationHandle {
    /// Generate a fresh random handle
    pub fn generate() -> Self {
        Self(rand::rng().next_u64())
    }

    /// Get the raw correlation id
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComputationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Derived ledger address a ciphertext record is stored under
///
/// Derived from a domain tag, the owning party's public key, and a seed
/// label, so all participants can compute the same address without
/// coordination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordAddress([u8; 32]);

impl RecordAddress {
    const DOMAIN_TAG: &'static [u8] = b"veil-record-address-v1";

    /// Derive the address for a record owned by `owner_public` under `seed`
    pub fn derive(owner_public: &[u8; 32], seed: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(Self::DOMAIN_TAG);
        hasher.update(owner_public);
        hasher.update(seed);
        Self(*hasher.finalize().as_bytes())
    }

    /// Create from raw bytes
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for RecordAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..8]))
    }
}

/// An encrypted record as it lives on the ledger
///
/// One ciphertext field per plaintext field, plus the nonce used to
/// produce it and the public key of the encrypting party. Created once,
/// never mutated in place; sharing produces a fresh record under the
/// receiver's key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiphertextRecord {
    /// Ciphertext fields in schema order
    pub fields: Vec<u64>,
    /// Nonce the fields were encrypted under
    pub nonce: u128,
    /// Public key of the encrypting party (for key derivation)
    pub encryptor_public: [u8; 32],
}

impl CiphertextRecord {
    /// Create a new ciphertext record
    pub fn new(fields: Vec<u64>, nonce: u128, encryptor_public: [u8; 32]) -> Self {
        Self {
            fields,
            nonce,
            encryptor_public,
        }
    }

    /// Number of ciphertext fields
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Serialize for ledger persistence
    pub fn to_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        postcard::to_allocvec(self).map_err(|e| LedgerError::Serialization(e.to_string()))
    }

    /// Deserialize from ledger bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self, LedgerError> {
        postcard::from_bytes(data).map_err(|e| LedgerError::Serialization(e.to_string()))
    }
}

/// A request to re-encrypt a stored record for a receiver
///
/// Submitted to the compute engine when a share is queued. The engine
/// answers with exactly one [`FinalizeSignal`] keyed by `handle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRequest {
    /// Correlation id for the finalize signal
    pub handle: ComputationHandle,
    /// Address of the stored record being shared
    pub address: RecordAddress,
    /// Receiver's public key
    pub receiver_public: [u8; 32],
    /// Nonce the re-encrypted record will use
    pub receiver_nonce: u128,
    /// Sender's public key (the record's original encryptor)
    pub sender_public: [u8; 32],
    /// Nonce the stored record was encrypted under
    pub sender_nonce: u128,
}

/// Terminal signal emitted by the compute engine for a queued request
///
/// Exactly one signal is emitted per computation handle; duplicates are
/// treated as idempotent no-ops by the delivery side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalizeSignal {
    /// The re-encrypted record addressed to the receiver
    Finalized(CiphertextRecord),
    /// The computation was aborted by the engine
    Aborted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_generation_is_random() {
        let a = ComputationHandle::generate();
        let b = ComputationHandle::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_handle_display_is_hex() {
        let handle = ComputationHandle(0xdead_beef);
        assert_eq!(format!("{}", handle), "00000000deadbeef");
    }

    #[test]
    fn test_address_derivation_is_deterministic() {
        let owner = [7u8; 32];
        let a = RecordAddress::derive(&owner, b"patient_data");
        let b = RecordAddress::derive(&owner, b"patient_data");
        assert_eq!(a, b);
    }

    #[test]
    fn test_address_varies_with_owner_and_seed() {
        let owner_a = [1u8; 32];
        let owner_b = [2u8; 32];

        assert_ne!(
            RecordAddress::derive(&owner_a, b"patient_data"),
            RecordAddress::derive(&owner_b, b"patient_data"),
        );
        assert_ne!(
            RecordAddress::derive(&owner_a, b"patient_data"),
            RecordAddress::derive(&owner_a, b"lab_results"),
        );
    }

    #[test]
    fn test_ciphertext_record_roundtrip() {
        let record = CiphertextRecord::new(vec![1, 2, 3], 42u128, [9u8; 32]);

        let bytes = record.to_bytes().unwrap();
        let parsed = CiphertextRecord::from_bytes(&bytes).unwrap();

        assert_eq!(parsed, record);
        assert_eq!(parsed.field_count(), 3);
    }

    #[test]
    fn test_ciphertext_record_rejects_garbage() {
        let result = CiphertextRecord::from_bytes(&[0xff]);
        assert!(matches!(result, Err(LedgerError::Serialization(_))));
    }
}
