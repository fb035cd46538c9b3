//! Wallet config synchronization.
//!
//! Each operation is a single read-compute-write pass against a
//! [`BlobStore`]:
//! - fetch: download, decrypt, decode; any failure yields [`FetchOutcome::Absent`]
//! - bootstrap: fall back to a fresh record when nothing usable is stored
//! - register: realign accounts with the wallet, record the app, persist
//!
//! There is no locking or version check. The stored object is a single slot
//! and the last upload wins; callers that share a wallet across devices must
//! serialize their calls.

use crate::codec;
use crate::error::{CloudError, CloudResult};
use crate::store::{BlobStore, StoreError};
use crate::types::{ConfigAccount, ConfigApp, Wallet, WalletAccount, WalletConfig};
use thiserror::Error;
use tracing::{debug, info, warn};
use walletcfg_crypto::{decrypt_content, encrypt_content};

/// Object name of the config record inside a wallet's namespace.
pub const WALLET_CONFIG_OBJECT: &str = "wallet-config.json";

/// Why no usable config record was found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbsentReason {
    #[error("no wallet config stored")]
    NotFound,
    #[error("wallet config read failed: {0}")]
    StoreRead(String),
    #[error("wallet config could not be decrypted: {0}")]
    DecryptFailure(String),
    #[error("wallet config is malformed: {0}")]
    MalformedConfig(String),
}

/// Result of reading the stored config record.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Found(WalletConfig),
    Absent(AbsentReason),
}

impl FetchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn absent_reason(&self) -> Option<&AbsentReason> {
        match self {
            Self::Found(_) => None,
            Self::Absent(reason) => Some(reason),
        }
    }

    pub fn into_config(self) -> Option<WalletConfig> {
        match self {
            Self::Found(config) => Some(config),
            Self::Absent(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BootstrapOptions {
    /// Build the fresh record in memory only.
    pub skip_upload: bool,
}

/// Reads and decrypts the wallet's config record.
///
/// Never fails: not-found, transport errors, decryption failures and
/// malformed JSON all come back as [`FetchOutcome::Absent`].
pub async fn fetch_wallet_config<S: BlobStore>(wallet: &Wallet, store: &S) -> FetchOutcome {
    let bytes = match store.fetch(WALLET_CONFIG_OBJECT).await {
        Ok(bytes) => bytes,
        Err(StoreError::NotFound(_)) => {
            debug!("no wallet config stored for {}", wallet.address());
            return FetchOutcome::Absent(AbsentReason::NotFound);
        }
        Err(StoreError::Transport(msg)) => {
            warn!("wallet config read failed: {msg}");
            return FetchOutcome::Absent(AbsentReason::StoreRead(msg));
        }
    };

    match decrypt_wallet_config(wallet, &bytes) {
        Ok(config) => {
            debug!(
                "fetched wallet config with {} accounts ({} bytes)",
                config.accounts.len(),
                bytes.len()
            );
            FetchOutcome::Found(config)
        }
        Err(reason) => {
            warn!("discarding stored wallet config: {reason}");
            FetchOutcome::Absent(reason)
        }
    }
}

fn decrypt_wallet_config(wallet: &Wallet, bytes: &[u8]) -> Result<WalletConfig, AbsentReason> {
    let envelope = std::str::from_utf8(bytes)
        .map_err(|_| AbsentReason::DecryptFailure("envelope is not UTF-8".to_string()))?;

    let plaintext = decrypt_content(envelope, &wallet.config_key.secret)
        .map_err(|e| AbsentReason::DecryptFailure(e.to_string()))?;

    codec::decode(&plaintext).map_err(|e| AbsentReason::MalformedConfig(e.to_string()))
}

/// Returns the stored config, or bootstraps a fresh one.
///
/// A fresh record has one empty account per wallet account and is uploaded
/// immediately unless `options.skip_upload` is set. A stored record with
/// fewer accounts than the wallet is padded in memory; the padding is
/// persisted by the next write.
pub async fn bootstrap_or_fetch<S: BlobStore>(
    wallet: &Wallet,
    store: &S,
    options: BootstrapOptions,
) -> CloudResult<WalletConfig> {
    let reason = match fetch_wallet_config(wallet, store).await {
        FetchOutcome::Found(mut config) => {
            pad_accounts(wallet, &mut config);
            return Ok(config);
        }
        FetchOutcome::Absent(reason) => reason,
    };

    let config = WalletConfig::bootstrap(wallet);
    if options.skip_upload {
        debug!("bootstrapped wallet config in memory ({reason})");
    } else {
        info!(
            "bootstrapping wallet config with {} accounts ({reason})",
            config.accounts.len()
        );
        persist_wallet_config(wallet, &config, store).await?;
    }
    Ok(config)
}

/// Encodes and encrypts the record to its stored form.
pub fn encrypt_wallet_config(wallet: &Wallet, config: &WalletConfig) -> CloudResult<String> {
    let plaintext = codec::encode(config)?;
    Ok(encrypt_content(&plaintext, &wallet.config_key.public)?)
}

/// Encrypts the record and replaces the stored object. No retries.
pub async fn persist_wallet_config<S: BlobStore>(
    wallet: &Wallet,
    config: &WalletConfig,
    store: &S,
) -> CloudResult<()> {
    let encrypted = encrypt_wallet_config(wallet, config)?;
    store
        .upload(WALLET_CONFIG_OBJECT, encrypted.into_bytes())
        .await
        .map_err(|e| CloudError::StoreWrite(e.to_string()))
}

/// Records `app` under `account` and persists the result.
///
/// Every wallet account is first realigned with its config entry (usernames
/// refreshed, missing entries appended), so a record written before the
/// wallet grew is healed on any registration. Apps are keyed by origin; a
/// second registration for the same origin replaces the first.
pub async fn register_app<S: BlobStore>(
    wallet: &Wallet,
    account: &WalletAccount,
    app: ConfigApp,
    mut config: WalletConfig,
    store: &S,
) -> CloudResult<WalletConfig> {
    realign_accounts(wallet, &mut config);

    // Config entries follow wallet list position, which is what realignment
    // walked; `account.index` only identifies the account.
    let Some(entry) = wallet
        .position_of(account)
        .and_then(|slot| config.accounts.get_mut(slot))
    else {
        return Err(CloudError::AccountOutOfRange {
            index: account.index,
            len: wallet.accounts.len(),
        });
    };

    let origin = app.origin.clone();
    entry.apps.insert(origin.clone(), app);
    info!("registered app {origin} for account {}", account.index);

    persist_wallet_config(wallet, &config, store).await?;
    Ok(config)
}

/// Brings the config's account list in line with the wallet.
fn realign_accounts(wallet: &Wallet, config: &mut WalletConfig) {
    for (index, account) in wallet.accounts.iter().enumerate() {
        match config.accounts.get_mut(index) {
            Some(entry) => {
                entry.username = account.username.clone();
                heal_origins(index, entry);
            }
            None => config
                .accounts
                .push(ConfigAccount::new(account.username.clone())),
        }
    }
}

fn pad_accounts(wallet: &Wallet, config: &mut WalletConfig) {
    let have = config.accounts.len();
    if have >= wallet.accounts.len() {
        return;
    }
    debug!(
        "stored wallet config has {have} accounts, wallet has {}",
        wallet.accounts.len()
    );
    config.accounts.extend(
        wallet.accounts[have..]
            .iter()
            .map(|account| ConfigAccount::new(account.username.clone())),
    );
}

/// The map key is authoritative for an app's origin.
fn heal_origins(index: usize, entry: &mut ConfigAccount) {
    for (origin, app) in entry.apps.iter_mut() {
        if app.origin != *origin {
            warn!(
                "account {index}: app stored under {origin} claimed origin {}",
                app.origin
            );
            app.origin = origin.clone();
        }
    }
}
