//! Wallet config sync error types.

use thiserror::Error;

/// Result type for sync operations.
pub type CloudResult<T> = Result<T, CloudError>;

/// Errors surfaced to callers of the sync engine.
///
/// Read-side failures never appear here; they are folded into
/// [`crate::sync_engine::AbsentReason`].
#[derive(Debug, Error)]
pub enum CloudError {
    #[error("wallet config upload failed: {0}")]
    StoreWrite(String),

    #[error("hub connection failed: {0}")]
    HubConnect(String),

    #[error("account index {index} is outside the wallet's {len} accounts")]
    AccountOutOfRange { index: usize, len: usize },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("crypto error: {0}")]
    Crypto(#[from] walletcfg_crypto::CryptoError),

    #[error("invalid configuration: {0}")]
    Config(String),
}
