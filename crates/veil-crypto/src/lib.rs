//! # Veil Crypto
//!
//! Cryptographic primitives for the veil record-sharing protocol.
//!
//! Provides per-session X25519 key agreement and the confidential
//! per-field stream cipher used to encrypt record fields.
//!
//! ## Features
//!
//! - Ephemeral X25519 key pairs, one per sharing session
//! - Shared-secret derivation with contributory checking
//! - Deterministic per-field keystream cipher (BLAKE3 keyed XOF)
//!
//! ## Example
//!
//! ```rust,ignore
//! use veil_crypto::{RecordCipher, SessionKeyPair, generate_nonce};
//!
//! let alice = SessionKeyPair::generate();
//! let bob = SessionKeyPair::generate();
//!
//! let key = alice.derive_shared_secret(bob.public_key())?;
//! let cipher = RecordCipher::new(key);
//!
//! let nonce = generate_nonce();
//! let fields = vec![420, 69, 1];
//! let ciphertext = cipher.encrypt(nonce, &fields);
//! assert_eq!(cipher.decrypt(nonce, &ciphertext), fields);
//! ```
//!
//! The cipher carries no integrity tag: decrypting under a mismatched key
//! or nonce silently yields incorrect plaintext. Authentication is the
//! surrounding ledger's signature layer, not this crate's.

pub mod cipher;
pub mod error;
pub mod keys;

// Re-exports
pub use cipher::{generate_nonce, RecordCipher};
pub use error::{CryptoError, CryptoResult};
pub use keys::{RecordKey, SessionKeyPair, KEY_SIZE};

// Re-export x25519 types for convenience
pub use x25519_dalek::{PublicKey, StaticSecret};
