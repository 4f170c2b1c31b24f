//! Confidential per-field stream cipher
//!
//! Encrypts a sequence of fixed-width integer fields in place,
//! field-by-field. The keystream for each field is derived from
//! (key, nonce, field index) with a BLAKE3 keyed XOF, so fields can be
//! processed in any order and partial records remain decryptable
//! field-by-field.
//!
//! Identical (key, nonce, fields) always yields identical ciphertext,
//! which keeps on-chain verification and replay deterministic. There is
//! no integrity tag: decrypting under a mismatched key or nonce silently
//! produces incorrect plaintext, and callers authenticate out-of-band.

use rand::Rng;

use crate::keys::RecordKey;

/// Generate a fresh random nonce
///
/// Must never be reused with the same key for different plaintexts.
pub fn generate_nonce() -> u128 {
    rand::rng().random()
}

/// Nonce-keyed symmetric stream cipher over fixed-width record fields
pub struct RecordCipher {
    key: RecordKey,
}

impl RecordCipher {
    /// Create a cipher over the given key material
    pub fn new(key: RecordKey) -> Self {
        Self { key }
    }

    /// Keystream word for one field position
    fn keystream(&self, nonce: u128, index: u64) -> u64 {
        let mut hasher = blake3::Hasher::new_keyed(self.key.as_bytes());
        hasher.update(&nonce.to_le_bytes());
        hasher.update(&index.to_le_bytes());

        let mut word = [0u8; 8];
        hasher.finalize_xof().fill(&mut word);
        u64::from_le_bytes(word)
    }

    /// Encrypt a single field at its schema index
    pub fn encrypt_field(&self, nonce: u128, index: u64, field: u64) -> u64 {
        field ^ self.keystream(nonce, index)
    }

    /// Decrypt a single field at its schema index
    pub fn decrypt_field(&self, nonce: u128, index: u64, field: u64) -> u64 {
        // XOR keystream is an involution
        self.encrypt_field(nonce, index, field)
    }

    /// Encrypt a field sequence under a nonce
    pub fn encrypt(&self, nonce: u128, fields: &[u64]) -> Vec<u64> {
        fields
            .iter()
            .enumerate()
            .map(|(i, &field)| self.encrypt_field(nonce, i as u64, field))
            .collect()
    }

    /// Decrypt a field sequence under a nonce
    pub fn decrypt(&self, nonce: u128, fields: &[u64]) -> Vec<u64> {
        fields
            .iter()
            .enumerate()
            .map(|(i, &field)| self.decrypt_field(nonce, i as u64, field))
            .collect()
    }
}
