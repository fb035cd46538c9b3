//! Encryption layer for wallet configuration records.
//!
//! Provides anonymous envelope encryption of string payloads using:
//! - X25519 key agreement with a fresh ephemeral keypair per message
//! - XSalsa20-Poly1305 for authenticated encryption
//! - Zeroization of secret material and decrypted plaintext buffers
//!
//! # Architecture
//!
//! A wallet owns a single **config keypair**. The secret half is supplied by
//! the wallet (its derivation is not this crate's concern); the public half
//! is always recomputed from it.
//!
//! Payloads are sealed to the public key and serialized as a JSON
//! [`CipherEnvelope`]. Only the holder of the config secret key can open
//! them, and the sender's identity is not revealed.

pub mod envelope;
mod error;

pub use envelope::{
    decrypt_content, encrypt_content, open, seal, CipherEnvelope, ConfigKeyPair, NONCE_SIZE,
};
pub use error::{CryptoError, CryptoResult};

pub use crypto_box::{PublicKey, SecretKey};
