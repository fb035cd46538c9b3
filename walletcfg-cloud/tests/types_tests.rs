use chrono::{Duration, Utc};
use walletcfg_cloud::*;
use walletcfg_crypto::ConfigKeyPair;

// --- Wallet ---

#[test]
fn wallet_address_is_stable_for_same_key() {
    let key = ConfigKeyPair::from_secret_bytes([9u8; 32]);
    let a = Wallet::with_usernames(key.clone(), [None]);
    let b = Wallet::with_usernames(key, [Some("x".to_string()), None]);

    assert_eq!(a.address(), b.address());
    assert_eq!(a.address().len(), 64);
}

#[test]
fn wallet_address_differs_between_keys() {
    let a = Wallet::with_usernames(ConfigKeyPair::generate(), [None]);
    let b = Wallet::with_usernames(ConfigKeyPair::generate(), [None]);
    assert_ne!(a.address(), b.address());
}

#[test]
fn with_usernames_assigns_indices() {
    let wallet = Wallet::with_usernames(
        ConfigKeyPair::generate(),
        [Some("a".to_string()), None, Some("c".to_string())],
    );
    let indices: Vec<_> = wallet.accounts.iter().map(|a| a.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(wallet.account(1).unwrap().username, None);
    assert!(wallet.account(3).is_none());
}

// --- ConfigApp ---

#[test]
fn new_app_is_stamped_with_now() {
    let before = Utc::now().timestamp_millis();
    let app = ConfigApp::new("https://x.test", "X", "https://x.test/i.png", vec![]);
    let after = Utc::now().timestamp_millis();

    assert!(app.last_login_at >= before && app.last_login_at <= after);
    assert_eq!(app.origin, "https://x.test");
}

#[test]
fn touch_moves_last_login_forward() {
    let mut app = ConfigApp::new("https://x.test", "X", "", vec![]);
    app.last_login_at = 0;
    app.touch();
    assert!(app.last_login_at > 0);
}

#[test]
fn config_app_lookup() {
    let mut config = WalletConfig::default();
    assert!(config.app(0, "https://x.test").is_none());

    let mut account = ConfigAccount::new(None);
    account.apps.insert(
        "https://x.test".into(),
        ConfigApp::new("https://x.test", "X", "", vec!["store_write".into()]),
    );
    config.accounts.push(account);

    assert!(config.app(0, "https://x.test").is_some());
    assert!(config.app(0, "https://y.test").is_none());
}

// --- StoreCredentials ---

fn creds(expires_at: Option<chrono::DateTime<Utc>>) -> StoreCredentials {
    StoreCredentials {
        access_key_id: "AKIA_TEST".into(),
        secret_access_key: "secret".into(),
        session_token: Some("token".into()),
        expires_at,
    }
}

#[test]
fn credentials_without_expiry_never_expire() {
    assert!(!creds(None).is_expired());
}

#[test]
fn credentials_expired_when_past() {
    assert!(creds(Some(Utc::now() - Duration::seconds(10))).is_expired());
}

#[test]
fn credentials_not_expired_when_future() {
    assert!(!creds(Some(Utc::now() + Duration::hours(1))).is_expired());
}

#[test]
fn credentials_roundtrip() {
    let json = serde_json::to_string(&creds(None)).unwrap();
    let de: StoreCredentials = serde_json::from_str(&json).unwrap();
    assert_eq!(de.access_key_id, "AKIA_TEST");
    assert_eq!(de.session_token.as_deref(), Some("token"));
}
