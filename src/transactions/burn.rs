//! SPL token burn details from a parsed transaction.

use std::str::FromStr;

use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;
use solana_sdk::{pubkey::Pubkey, signature::Signature};

use crate::{
    rpc::{LedgerRpc, TransactionRecord},
    utils::serialize_display,
};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BurnInfo {
    /// Raw units burned.
    pub amount: u64,
    #[serde(serialize_with = "serialize_display")]
    pub mint: Pubkey,
    #[serde(serialize_with = "serialize_display")]
    pub account: Pubkey,
    #[serde(serialize_with = "serialize_display")]
    pub authority: Pubkey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_account_balance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_mint_supply: Option<f64>,
}

/// First top-level `burn` / `burnChecked` in `record`.
pub fn burn_from_record(record: &TransactionRecord) -> Option<BurnInfo> {
    let parsed = record
        .instructions
        .iter()
        .filter_map(|ix| ix.parsed.as_ref())
        .find(|parsed| parsed.kind == "burn" || parsed.kind == "burnChecked")?;
    let info = &parsed.info;

    // `burnChecked` nests the amount under `tokenAmount`.
    let amount = info["amount"]
        .as_str()
        .or_else(|| info["tokenAmount"]["amount"].as_str())
        .and_then(|raw| raw.parse::<u64>().ok());
    let authority = pubkey_field(info, "authority").or_else(|| pubkey_field(info, "multisigAuthority"));

    match (amount, pubkey_field(info, "mint"), pubkey_field(info, "account"), authority) {
        (Some(amount), Some(mint), Some(account), Some(authority)) => Some(BurnInfo {
            amount,
            mint,
            account,
            authority,
            new_account_balance: None,
            new_mint_supply: None,
        }),
        _ => {
            warn!("[BURN] {} has an unreadable {} instruction", record.signature, parsed.kind);
            None
        }
    }
}

fn pubkey_field(info: &Value, key: &str) -> Option<Pubkey> {
    info[key].as_str().and_then(|raw| Pubkey::from_str(raw).ok())
}

/// Fetch `signature` once and read its burn. With `include_current_balances`
/// the burned-from account's UI balance and the mint's UI supply are
/// fetched concurrently; either defaults to `0.0` if its lookup fails.
pub async fn decode_burn<R>(rpc: &R, signature: &Signature, include_current_balances: bool) -> Option<BurnInfo>
where
    R: LedgerRpc + ?Sized,
{
    let record = match rpc.get_transaction(signature).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            debug!("[BURN] {signature} not found");
            return None;
        }
        Err(e) => {
            warn!("[BURN] fetching {signature} failed: {e:#}");
            return None;
        }
    };

    let mut burn = burn_from_record(&record)?;
    info!("[BURN] {signature}: {} of {} from {}", burn.amount, burn.mint, burn.account);

    if include_current_balances {
        let (balance, supply) = tokio::join!(
            rpc.get_token_account_ui_balance(&burn.account),
            rpc.get_token_supply_ui(&burn.mint),
        );
        burn.new_account_balance = Some(balance.unwrap_or_else(|e| {
            warn!("[BURN] balance of {} unavailable: {e:#}", burn.account);
            0.0
        }));
        burn.new_mint_supply = Some(supply.unwrap_or_else(|e| {
            warn!("[BURN] supply of {} unavailable: {e:#}", burn.mint);
            0.0
        }));
    }

    Some(burn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::mock::MockLedger;
    use crate::rpc::{InstructionRecord, ParsedInstructionRecord};
    use crate::transactions::tests::empty_record;
    use serde_json::json;

    fn parsed_ix(kind: &str, info: Value) -> InstructionRecord {
        InstructionRecord {
            program_id: spl_token::ID,
            accounts: Vec::new(),
            parsed: Some(ParsedInstructionRecord {
                program: "spl-token".to_string(),
                kind: kind.to_string(),
                info,
            }),
        }
    }

    fn burn_record(signature: &Signature, mint: &Pubkey, account: &Pubkey, authority: &Pubkey) -> TransactionRecord {
        TransactionRecord {
            instructions: vec![
                parsed_ix("transfer", json!({ "amount": "1" })),
                parsed_ix(
                    "burn",
                    json!({
                        "amount": "250000",
                        "mint": mint.to_string(),
                        "account": account.to_string(),
                        "authority": authority.to_string(),
                    }),
                ),
            ],
            ..empty_record(signature)
        }
    }

    #[tokio::test]
    async fn test_decode_burn_without_balances() {
        let (signature, mint, account, authority) =
            (Signature::new_unique(), Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        let rpc = MockLedger::default().with_transaction(signature, burn_record(&signature, &mint, &account, &authority));

        let burn = decode_burn(&rpc, &signature, false).await.unwrap();
        assert_eq!(burn.amount, 250_000);
        assert_eq!(burn.mint, mint);
        assert_eq!(burn.account, account);
        assert_eq!(burn.authority, authority);
        assert_eq!(burn.new_account_balance, None);
        assert_eq!(burn.new_mint_supply, None);
    }

    #[tokio::test]
    async fn test_decode_burn_with_balances_defaults_failures_to_zero() {
        let (signature, mint, account, authority) =
            (Signature::new_unique(), Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        let mut rpc =
            MockLedger::default().with_transaction(signature, burn_record(&signature, &mint, &account, &authority));
        rpc.supplies.insert(mint, 999_750.5);

        let burn = decode_burn(&rpc, &signature, true).await.unwrap();
        assert_eq!(burn.new_account_balance, Some(0.0));
        assert_eq!(burn.new_mint_supply, Some(999_750.5));
    }

    #[test]
    fn test_burn_checked_amount_is_nested() {
        let (mint, account, authority) = (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        let record = TransactionRecord {
            instructions: vec![parsed_ix(
                "burnChecked",
                json!({
                    "tokenAmount": { "amount": "77", "decimals": 6, "uiAmount": 0.000077 },
                    "mint": mint.to_string(),
                    "account": account.to_string(),
                    "multisigAuthority": authority.to_string(),
                }),
            )],
            ..empty_record(&Signature::new_unique())
        };
        let burn = burn_from_record(&record).unwrap();
        assert_eq!(burn.amount, 77);
        assert_eq!(burn.authority, authority);
    }

    #[tokio::test]
    async fn test_absent_cases() {
        let signature = Signature::new_unique();
        let no_burn = TransactionRecord {
            instructions: vec![parsed_ix("transfer", json!({}))],
            ..empty_record(&signature)
        };
        let rpc = MockLedger::default().with_transaction(signature, no_burn);
        assert!(decode_burn(&rpc, &signature, false).await.is_none());

        // unknown signature
        assert!(decode_burn(&rpc, &Signature::new_unique(), true).await.is_none());

        // transport error
        let failing = MockLedger::default().failing_transaction_fetches(1);
        assert!(decode_burn(&failing, &signature, false).await.is_none());
        assert_eq!(failing.transaction_calls(), 1);
    }

    #[test]
    fn test_serialized_burn_omits_unrequested_balances() {
        let key = Pubkey::new_unique();
        let burn = BurnInfo {
            amount: 5,
            mint: key,
            account: key,
            authority: key,
            new_account_balance: None,
            new_mint_supply: None,
        };
        let json = serde_json::to_value(&burn).unwrap();
        assert_eq!(json["mint"], key.to_string());
        assert!(json.get("new_account_balance").is_none());
    }
}
