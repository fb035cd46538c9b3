//! Encrypted wallet config sync.
//!
//! Keeps a per-wallet record of authorized apps in a remote blob store:
//! - Envelope-encrypted under the wallet's config keypair
//! - Index-aligned with the wallet's accounts, healed on every write
//! - Read failures fall back to a freshly bootstrapped record
//! - HTTP storage hub, S3 and in-memory blob stores

pub mod codec;
pub mod config;
pub mod error;
pub mod hub_transport;
pub mod s3_transport;
pub mod store;
pub mod sync_engine;
pub mod types;

pub use config::{HubConfig, S3StoreConfig};
pub use error::{CloudError, CloudResult};
pub use store::{BlobStore, MemoryBlobStore, StoreError, StoreResult};
pub use sync_engine::{
    AbsentReason, BootstrapOptions, FetchOutcome, WALLET_CONFIG_OBJECT, bootstrap_or_fetch,
    encrypt_wallet_config, fetch_wallet_config, persist_wallet_config, register_app,
};
pub use types::*;
