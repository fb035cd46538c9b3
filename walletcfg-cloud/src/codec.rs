//! Plaintext wire form of [`WalletConfig`].
//!
//! The record travels as compact UTF-8 JSON. Unknown keys are dropped on
//! decode, so only `meta` survives a round-trip verbatim.

use crate::error::CloudResult;
use crate::types::WalletConfig;

pub fn encode(config: &WalletConfig) -> CloudResult<String> {
    Ok(serde_json::to_string(config)?)
}

pub fn decode(text: &str) -> Result<WalletConfig, serde_json::Error> {
    serde_json::from_str(text)
}
