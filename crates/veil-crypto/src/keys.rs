//! Per-session key agreement
//!
//! Every sharing session uses a fresh X25519 key pair. The private half
//! never leaves process memory; the shared secret derived from it is used
//! once as cipher key material and zeroized on drop.

use rand::RngCore;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;

/// Symmetric key size (32 bytes)
pub const KEY_SIZE: usize = 32;

/// Symmetric key material derived from a key exchange
///
/// Lifetime bounded to one encryption or decryption operation; the raw
/// bytes are wiped when the key is dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RecordKey([u8; KEY_SIZE]);

impl RecordKey {
    /// Create from raw key bytes
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw key bytes (use with caution)
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

/// An ephemeral asymmetric key pair for one sharing session
///
/// Generated fresh per session. Only the public half is ever transmitted.
pub struct SessionKeyPair {
    secret: StaticSecret,
    public: PublicKey,
}

impl SessionKeyPair {
    /// Generate a new random key pair
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::rng().fill_bytes(&mut bytes);
        let secret = StaticSecret::from(bytes);
        bytes.zeroize();

        let public = PublicKey::from(&secret);
        Self { secret, public }
    }

    /// Get the public key
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// Get the public key as raw bytes
    pub fn public_bytes(&self) -> [u8; 32] {
        self.public.to_bytes()
    }

    /// Derive the shared secret with a remote party
    ///
    /// Computes the X25519 Diffie-Hellman product and reduces it to
    /// fixed-width key material. Fails with
    /// [`CryptoError::InvalidPublicKey`] when the exchange is
    /// non-contributory (identity or low-order remote point).
    pub fn derive_shared_secret(&self, remote: &PublicKey) -> Result<RecordKey, CryptoError> {
        let shared = self.secret.diffie_hellman(remote);
        if !shared.was_contributory() {
            return Err(CryptoError::InvalidPublicKey);
        }
        Ok(RecordKey::from_bytes(*shared.as_bytes()))
    }
}
