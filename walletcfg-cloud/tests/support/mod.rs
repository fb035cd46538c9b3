//! Shared test helpers.
#![allow(dead_code)]

use tracing_subscriber::EnvFilter;
use walletcfg_cloud::{
    ConfigApp, MemoryBlobStore, StoreCredentials, Wallet, WALLET_CONFIG_OBJECT,
};
use walletcfg_crypto::{ConfigKeyPair, decrypt_content};

/// Routes engine logs to the test writer; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Wallet with the given usernames at indices 0..n and a fresh config key.
pub fn wallet(usernames: &[&str]) -> Wallet {
    Wallet::with_usernames(
        ConfigKeyPair::generate(),
        usernames.iter().map(|u| Some(u.to_string())),
    )
}

/// Same keypair, different account list.
pub fn regrow(wallet: &Wallet, usernames: &[&str]) -> Wallet {
    Wallet::with_usernames(
        wallet.config_key.clone(),
        usernames.iter().map(|u| Some(u.to_string())),
    )
}

pub fn app(origin: &str, scopes: &[&str]) -> ConfigApp {
    ConfigApp {
        origin: origin.to_string(),
        scopes: scopes.iter().map(|s| s.to_string()).collect(),
        last_login_at: 1_700_000_000_000,
        app_icon: format!("{origin}/icon.png"),
        name: format!("App at {origin}"),
    }
}

/// Decrypts whatever is currently stored, as JSON.
pub async fn stored_json(store: &MemoryBlobStore, wallet: &Wallet) -> serde_json::Value {
    let raw = store
        .get_raw(WALLET_CONFIG_OBJECT)
        .await
        .expect("config object must be stored");
    let text = String::from_utf8(raw).expect("envelope must be UTF-8");
    let plaintext = decrypt_content(&text, &wallet.config_key.secret).expect("must decrypt");
    serde_json::from_str(&plaintext).expect("plaintext must be JSON")
}

/// MinIO root credentials (docker-compose.test.yml).
pub fn minio_creds() -> StoreCredentials {
    StoreCredentials {
        access_key_id: "walletcfg-test".into(),
        secret_access_key: "walletcfg-test-secret".into(),
        session_token: None,
        expires_at: None,
    }
}
