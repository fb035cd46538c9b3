//! Envelope encryption for wallet configuration payloads.
//!
//! Uses X25519 key exchange + XSalsa20-Poly1305. Each payload is sealed with
//! the recipient's public key using an ephemeral keypair, allowing anonymous
//! encryption. The ephemeral public key travels inside the envelope so the
//! recipient can reconstruct the shared secret.

use crate::error::{CryptoError, CryptoResult};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use crypto_box::aead::{Aead, AeadCore, OsRng};
use crypto_box::{PublicKey, SalsaBox, SecretKey};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// XSalsa20 nonce size in bytes.
pub const NONCE_SIZE: usize = 24;

const KEY_SIZE: usize = 32;

/// X25519 keypair used to encrypt a wallet's configuration record.
///
/// The secret key implements `ZeroizeOnDrop` automatically (from crypto_box).
pub struct ConfigKeyPair {
    pub secret: SecretKey,
    pub public: PublicKey,
}

impl ConfigKeyPair {
    /// Generates a fresh random keypair.
    pub fn generate() -> Self {
        let secret = SecretKey::generate(&mut OsRng);
        let public = secret.public_key();
        Self { secret, public }
    }

    /// Reconstructs a keypair from raw secret key bytes.
    pub fn from_secret_bytes(bytes: [u8; 32]) -> Self {
        let secret = SecretKey::from(bytes);
        let public = secret.public_key();
        Self { secret, public }
    }

    /// Reconstructs a keypair from a hex-encoded 32-byte secret.
    pub fn from_secret_hex(hex_secret: &str) -> CryptoResult<Self> {
        let decoded = Zeroizing::new(
            hex::decode(hex_secret.trim())
                .map_err(|e| CryptoError::InvalidKey(format!("secret is not hex: {e}")))?,
        );

        if decoded.len() != KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength {
                expected: KEY_SIZE,
                actual: decoded.len(),
            });
        }

        let mut bytes = Zeroizing::new([0u8; KEY_SIZE]);
        bytes.copy_from_slice(&decoded);
        Ok(Self::from_secret_bytes(*bytes))
    }

    /// Returns the public key as raw 32-byte array.
    pub fn public_bytes(&self) -> [u8; 32] {
        *self.public.as_bytes()
    }

    /// Returns the public key as lowercase hex.
    pub fn public_hex(&self) -> String {
        hex::encode(self.public.as_bytes())
    }

    /// Returns the secret key as raw 32-byte array.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.secret.to_bytes()
    }
}

impl Clone for ConfigKeyPair {
    fn clone(&self) -> Self {
        Self::from_secret_bytes(self.secret.to_bytes())
    }
}

impl std::fmt::Debug for ConfigKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigKeyPair")
            .field("public", &self.public_hex())
            .finish_non_exhaustive()
    }
}

/// Sealed payload as stored remotely.
///
/// Binary fields are standard base64. The JSON field names are part of the
/// stored format and must not change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherEnvelope {
    /// Ephemeral X25519 public key (sender side of DH).
    #[serde(rename = "ephemeralPK")]
    pub ephemeral_pk: String,
    /// XSalsa20 nonce (24 bytes).
    pub nonce: String,
    /// XSalsa20-Poly1305 ciphertext with its Poly1305 tag.
    #[serde(rename = "cipherText")]
    pub cipher_text: String,
    /// Whether the plaintext was a UTF-8 string rather than raw bytes.
    #[serde(rename = "wasString", default)]
    pub was_string: bool,
}

/// Seals a payload for a recipient using anonymous envelope encryption.
///
/// An ephemeral X25519 keypair is generated for each seal operation.
pub fn seal(plaintext: &[u8], recipient_pk: &PublicKey) -> CryptoResult<CipherEnvelope> {
    let ephemeral = SecretKey::generate(&mut OsRng);
    let ephemeral_pk = ephemeral.public_key();

    let salsa_box = SalsaBox::new(recipient_pk, &ephemeral);
    let nonce = SalsaBox::generate_nonce(&mut OsRng);

    let ciphertext = salsa_box
        .encrypt(&nonce, plaintext)
        .map_err(|e| CryptoError::Encryption(format!("envelope seal failed: {e}")))?;

    Ok(CipherEnvelope {
        ephemeral_pk: BASE64.encode(ephemeral_pk.as_bytes()),
        nonce: BASE64.encode(nonce.as_slice()),
        cipher_text: BASE64.encode(ciphertext),
        was_string: false,
    })
}

/// Opens a sealed envelope using the recipient's secret key.
pub fn open(envelope: &CipherEnvelope, recipient_sk: &SecretKey) -> CryptoResult<Vec<u8>> {
    let ephemeral_bytes = decode_field("ephemeralPK", &envelope.ephemeral_pk)?;
    let ephemeral_bytes: [u8; KEY_SIZE] =
        ephemeral_bytes
            .as_slice()
            .try_into()
            .map_err(|_| {
                CryptoError::Decryption(format!(
                    "ephemeralPK must be {KEY_SIZE} bytes, got {}",
                    ephemeral_bytes.len()
                ))
            })?;

    let nonce_bytes = decode_field("nonce", &envelope.nonce)?;
    if nonce_bytes.len() != NONCE_SIZE {
        return Err(CryptoError::Decryption(format!(
            "nonce must be {NONCE_SIZE} bytes, got {}",
            nonce_bytes.len()
        )));
    }

    let ciphertext = decode_field("cipherText", &envelope.cipher_text)?;

    let salsa_box = SalsaBox::new(&PublicKey::from(ephemeral_bytes), recipient_sk);
    salsa_box
        .decrypt(crypto_box::Nonce::from_slice(&nonce_bytes), ciphertext.as_slice())
        .map_err(|_| {
            CryptoError::Decryption("envelope open failed (wrong key or tampered data)".to_string())
        })
}

/// Encrypts a string payload and returns the serialized envelope.
pub fn encrypt_content(plaintext: &str, recipient_pk: &PublicKey) -> CryptoResult<String> {
    let mut envelope = seal(plaintext.as_bytes(), recipient_pk)?;
    envelope.was_string = true;
    serde_json::to_string(&envelope)
        .map_err(|e| CryptoError::Encryption(format!("envelope serialization failed: {e}")))
}

/// Parses a serialized envelope and decrypts it back to a string.
pub fn decrypt_content(envelope_json: &str, recipient_sk: &SecretKey) -> CryptoResult<String> {
    let envelope: CipherEnvelope = serde_json::from_str(envelope_json)
        .map_err(|e| CryptoError::MalformedEnvelope(e.to_string()))?;

    let plaintext = Zeroizing::new(open(&envelope, recipient_sk)?);
    String::from_utf8(plaintext.to_vec())
        .map_err(|_| CryptoError::Decryption("plaintext is not valid UTF-8".to_string()))
}

fn decode_field(field: &str, value: &str) -> CryptoResult<Vec<u8>> {
    BASE64
        .decode(value)
        .map_err(|e| CryptoError::Decryption(format!("{field} is not valid base64: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_field_names_the_field() {
        let err = decode_field("nonce", "***").unwrap_err();
        assert!(err.to_string().contains("nonce"));
    }

    #[test]
    fn debug_output_hides_secret() {
        let kp = ConfigKeyPair::from_secret_bytes([7u8; 32]);
        let rendered = format!("{kp:?}");
        assert!(rendered.contains(&kp.public_hex()));
        assert!(!rendered.contains(&hex::encode([7u8; 32])));
    }
}
