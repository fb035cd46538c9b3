//! Wallet config record and the wallet handle it is synchronized against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use walletcfg_crypto::ConfigKeyPair;

/// Auxiliary, uninterpreted keys carried alongside the accounts.
pub type ConfigMeta = serde_json::Map<String, serde_json::Value>;

/// Encrypted-at-rest record of which apps each wallet account has authorized.
///
/// `accounts` is index-aligned with [`Wallet::accounts`]: entry `i` belongs to
/// wallet account `i`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletConfig {
    pub accounts: Vec<ConfigAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ConfigMeta>,
}

impl WalletConfig {
    /// A fresh record with one empty entry per wallet account.
    pub fn bootstrap(wallet: &Wallet) -> Self {
        Self {
            accounts: wallet
                .accounts
                .iter()
                .map(|account| ConfigAccount::new(account.username.clone()))
                .collect(),
            meta: None,
        }
    }

    /// Looks up an authorized app by account index and origin.
    pub fn app(&self, account_index: usize, origin: &str) -> Option<&ConfigApp> {
        self.accounts.get(account_index)?.apps.get(origin)
    }
}

/// Per-account slice of the config record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigAccount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Keyed by app origin. `null` on the wire reads as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub apps: BTreeMap<String, ConfigApp>,
}

impl ConfigAccount {
    pub fn new(username: Option<String>) -> Self {
        Self {
            username,
            apps: BTreeMap::new(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, ConfigApp>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeMap<String, ConfigApp>>::deserialize(deserializer)?.unwrap_or_default())
}

/// An application authorized by an account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigApp {
    pub origin: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Milliseconds since the Unix epoch.
    pub last_login_at: i64,
    #[serde(default)]
    pub app_icon: String,
    #[serde(default)]
    pub name: String,
}

impl ConfigApp {
    /// Creates an app entry stamped with the current time.
    pub fn new(
        origin: impl Into<String>,
        name: impl Into<String>,
        app_icon: impl Into<String>,
        scopes: Vec<String>,
    ) -> Self {
        Self {
            origin: origin.into(),
            scopes,
            last_login_at: Utc::now().timestamp_millis(),
            app_icon: app_icon.into(),
            name: name.into(),
        }
    }

    /// Records a fresh authorization event.
    pub fn touch(&mut self) {
        self.last_login_at = Utc::now().timestamp_millis();
    }
}

/// A single account of the wallet, as seen by the sync engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletAccount {
    pub index: usize,
    pub username: Option<String>,
}

impl WalletAccount {
    pub fn new(index: usize, username: Option<String>) -> Self {
        Self { index, username }
    }
}

/// Wallet handle: the ordered account list plus the config keypair.
#[derive(Clone, Debug)]
pub struct Wallet {
    pub config_key: ConfigKeyPair,
    pub accounts: Vec<WalletAccount>,
}

impl Wallet {
    pub fn new(config_key: ConfigKeyPair, accounts: Vec<WalletAccount>) -> Self {
        Self {
            config_key,
            accounts,
        }
    }

    /// Builds a wallet whose accounts are indexed in the given order.
    pub fn with_usernames<I>(config_key: ConfigKeyPair, usernames: I) -> Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let accounts = usernames
            .into_iter()
            .enumerate()
            .map(|(index, username)| WalletAccount::new(index, username))
            .collect();
        Self::new(config_key, accounts)
    }

    /// The wallet's namespace in the blob store.
    pub fn address(&self) -> String {
        hex::encode(Sha256::digest(self.config_key.public_bytes()))
    }

    pub fn account(&self, index: usize) -> Option<&WalletAccount> {
        self.accounts.get(index)
    }

    /// List position of the account carrying `account.index`.
    pub fn position_of(&self, account: &WalletAccount) -> Option<usize> {
        self.accounts.iter().position(|a| a.index == account.index)
    }
}

/// Static or temporary credentials for the S3 transport.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    #[serde(default)]
    pub session_token: Option<String>,
    /// `None` for long-lived keys.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoreCredentials {
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Utc::now() >= at)
    }
}
