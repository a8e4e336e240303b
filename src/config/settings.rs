//! Runtime configuration loader and common helpers.

use std::{fmt, fs, path::Path, str::FromStr, time::Duration};

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    pubkey::Pubkey,
    signature::Keypair,
};

use crate::{transactions::RetryConfig, utils::fees};

pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
pub const DEFAULT_COMPUTE_UNIT_PRICE: u64 = 820_000;
pub const DEFAULT_COMPUTE_UNIT_LIMIT: u32 = 101_337;
pub const DEFAULT_CONFIRM_POLL_MS: u64 = 400;

// bloXroute trader-API tip wallet
pub const DEFAULT_TIP_ACCOUNT: Pubkey = solana_sdk::pubkey!("HWEoBxYs7ssKuudEjzjmpfJVX7Dvi7wescFsVx2L5yoY");

/// Compute budget attached to every swap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ComputeBudget {
    /// Micro-lamports per compute unit.
    pub unit_price: u64,
    pub unit_limit: u32,
}

impl Default for ComputeBudget {
    fn default() -> Self {
        Self {
            unit_price: DEFAULT_COMPUTE_UNIT_PRICE,
            unit_limit: DEFAULT_COMPUTE_UNIT_LIMIT,
        }
    }
}

/// ------------------------------------------------------------------
/// Main Settings object
/// ------------------------------------------------------------------
#[derive(Clone)]
pub struct Settings {
    /* -------- infrastructure ------------------------ */
    pub rpc_url: String,
    pub commitment: CommitmentConfig,

    /* -------- swap tuning --------------------------- */
    pub compute_budget: ComputeBudget,
    pub tip_account: Pubkey,

    /* -------- fetch / confirm ----------------------- */
    pub fetch_retry: RetryConfig,
    pub confirm_poll: Duration,

    /* -------- wallet (binary only) ------------------ */
    pub private_key_base58: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            commitment: CommitmentConfig::confirmed(),
            compute_budget: ComputeBudget::default(),
            tip_account: DEFAULT_TIP_ACCOUNT,
            fetch_retry: RetryConfig::default(),
            confirm_poll: Duration::from_millis(DEFAULT_CONFIRM_POLL_MS),
            private_key_base58: None,
        }
    }
}

// Keeps the private key out of logs.
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("rpc_url", &self.rpc_url)
            .field("commitment", &self.commitment.commitment)
            .field("compute_budget", &self.compute_budget)
            .field("tip_account", &self.tip_account)
            .field("fetch_retry", &self.fetch_retry)
            .field("confirm_poll", &self.confirm_poll)
            .field("private_key_base58", &self.private_key_base58.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Settings {
    /// --------------------------------------------------------------
    /// Read `settings.json` from disk.
    /// --------------------------------------------------------------
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading settings file {:?}", path.as_ref()))?;
        Self::from_json_str(&raw)
    }

    /// --------------------------------------------------------------
    /// Load settings from default config/settings.json file.
    /// --------------------------------------------------------------
    pub fn load() -> Result<Self> {
        Self::load_from_file("config/settings.json")
    }

    /// Every key is optional; missing keys keep their default.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_str(raw).context("parsing settings json")?;
        let defaults = Self::default();

        /* -------- plain strings ---------------------------------- */
        let rpc_url = json["rpc_url"]
            .as_str()
            .map(str::to_string)
            .unwrap_or(defaults.rpc_url);
        let commitment = match json["commitment"].as_str() {
            Some(level) => CommitmentConfig::from_str(level)
                .map_err(|_| anyhow!("unknown commitment level `{level}`"))?,
            None => defaults.commitment,
        };
        let tip_account = match json["tip_account"].as_str() {
            Some(address) => Pubkey::from_str(address)
                .with_context(|| format!("parsing tip_account `{address}`"))?,
            None => defaults.tip_account,
        };
        let private_key_base58 = json["private_key_base58"].as_str().map(str::to_string);

        /* -------- compute budget --------------------------------- */
        let unit_limit = match json["compute_unit_limit"].as_u64() {
            Some(limit) => u32::try_from(limit).context("compute_unit_limit exceeds u32")?,
            None => defaults.compute_budget.unit_limit,
        };
        // A total priority fee wins over an explicit unit price.
        let unit_price = match json["priority_fee_sol"].as_f64() {
            Some(total_sol) => fees::priority_fee_to_cu_price(total_sol, unit_limit),
            None => json["compute_unit_price"]
                .as_u64()
                .unwrap_or(defaults.compute_budget.unit_price),
        };

        /* -------- fetch / confirm -------------------------------- */
        let retry = &json["fetch_retry"];
        let max_attempts = match retry["max_attempts"].as_u64() {
            Some(n) => u32::try_from(n).context("fetch_retry.max_attempts exceeds u32")?,
            None => defaults.fetch_retry.max_attempts,
        };
        let base_delay = retry["base_delay_ms"]
            .as_u64()
            .map(Duration::from_millis)
            .unwrap_or(defaults.fetch_retry.base_delay);
        let confirm_poll = json["confirm_poll_ms"]
            .as_u64()
            .map(Duration::from_millis)
            .unwrap_or(defaults.confirm_poll);

        Ok(Self {
            rpc_url,
            commitment,
            compute_budget: ComputeBudget {
                unit_price,
                unit_limit,
            },
            tip_account,
            fetch_retry: RetryConfig {
                max_attempts,
                base_delay,
            },
            confirm_poll,
            private_key_base58,
        })
    }
}

/// Decode a base58 64-byte secret key.
pub fn keypair_from_base58(encoded: &str) -> Result<Keypair> {
    let bytes = bs58::decode(encoded.trim())
        .into_vec()
        .context("decoding base58 key")?;
    Keypair::from_bytes(&bytes).map_err(|e| anyhow!("invalid secret key: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signature::Signer;

    #[test]
    fn test_empty_json_gives_defaults() {
        let settings = Settings::from_json_str("{}").unwrap();
        assert_eq!(settings.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(settings.commitment, CommitmentConfig::confirmed());
        assert_eq!(settings.compute_budget, ComputeBudget::default());
        assert_eq!(settings.tip_account, DEFAULT_TIP_ACCOUNT);
        assert_eq!(settings.fetch_retry.max_attempts, 5);
        assert_eq!(settings.fetch_retry.base_delay, Duration::from_millis(100));
        assert_eq!(settings.confirm_poll, Duration::from_millis(400));
        assert!(settings.private_key_base58.is_none());
    }

    #[test]
    fn test_overrides() {
        let raw = r#"{
            "rpc_url": "http://127.0.0.1:8899",
            "commitment": "finalized",
            "compute_unit_price": 5,
            "compute_unit_limit": 200000,
            "fetch_retry": { "max_attempts": 2 },
            "confirm_poll_ms": 50
        }"#;
        let settings = Settings::from_json_str(raw).unwrap();
        assert_eq!(settings.rpc_url, "http://127.0.0.1:8899");
        assert_eq!(settings.commitment, CommitmentConfig::finalized());
        assert_eq!(settings.compute_budget.unit_price, 5);
        assert_eq!(settings.compute_budget.unit_limit, 200_000);
        assert_eq!(settings.fetch_retry.max_attempts, 2);
        assert_eq!(settings.fetch_retry.base_delay, Duration::from_millis(100));
        assert_eq!(settings.confirm_poll, Duration::from_millis(50));
    }

    #[test]
    fn test_priority_fee_derives_unit_price() {
        let raw = r#"{ "priority_fee_sol": 0.0001, "compute_unit_limit": 100000, "compute_unit_price": 1 }"#;
        let settings = Settings::from_json_str(raw).unwrap();
        assert_eq!(settings.compute_budget.unit_price, 1_000_000);
    }

    #[test]
    fn test_bad_values_are_errors() {
        assert!(Settings::from_json_str(r#"{ "commitment": "eventually" }"#).is_err());
        assert!(Settings::from_json_str(r#"{ "tip_account": "not-a-key" }"#).is_err());
        assert!(Settings::from_json_str("not json").is_err());
    }

    #[test]
    fn test_keypair_round_trip_and_redacted_debug() {
        let wallet = Keypair::new();
        let encoded = bs58::encode(wallet.to_bytes()).into_string();
        let settings = Settings {
            private_key_base58: Some(encoded.clone()),
            ..Settings::default()
        };
        let loaded = keypair_from_base58(settings.private_key_base58.as_deref().unwrap()).unwrap();
        assert_eq!(loaded.pubkey(), wallet.pubkey());
        assert!(!format!("{settings:?}").contains(&encoded));
        assert!(keypair_from_base58("abc").is_err());
    }
}
