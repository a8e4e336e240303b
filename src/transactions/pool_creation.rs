//! Decode an AMM v4 pool-creation (`initialize2`) transaction into a
//! [`PoolCreationEvent`].

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::Serialize;
use solana_sdk::{pubkey::Pubkey, signature::Signature, sysvar};

use super::{fetch_confirmed, init_log::parse_pool_init, RetryConfig};
use crate::{
    dex::{normalize::normalize, raydium::AMM_V4_PROGRAM_ID, WSOL_MINT},
    error::LogParseError,
    rpc::{InstructionRecord, LedgerRpc, TransactionRecord},
    state::{decode, token::ui_amount, PoolState},
    utils::serialize_display,
};

/// Quote amounts are wSOL lamports.
const QUOTE_DECIMALS: u8 = 9;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PoolCreationEvent {
    #[serde(serialize_with = "serialize_display")]
    pub creator: Pubkey,
    #[serde(serialize_with = "serialize_display")]
    pub token0: Pubkey,
    #[serde(serialize_with = "serialize_display")]
    pub token1: Pubkey,
    #[serde(serialize_with = "serialize_display")]
    pub pair: Pubkey,
    pub slot: u64,
    pub block_time: Option<i64>,
    #[serde(serialize_with = "serialize_display")]
    pub base_vault: Pubkey,
    #[serde(serialize_with = "serialize_display")]
    pub quote_vault: Pubkey,
    #[serde(serialize_with = "serialize_display")]
    pub lp_mint: Pubkey,
    /// Initial quote reserve in SOL.
    pub liquidity: Decimal,
    /// Initial base reserve, raw units.
    pub initial_tokens: u64,
    pub open_time: u64,
    pub open_time_utc: Option<DateTime<Utc>>,
    /// The on-chain record had wSOL as base and was flipped.
    pub swapped: bool,
}

/// Fetch `signature` and decode the pool it created.
///
/// `Ok(None)` covers every "nothing here" outcome: the transaction never
/// turned up or reverted, it has no AMM v4 instruction or init log, or
/// none of its candidate accounts is an initialised pool. A present but
/// unreadable init log is an error.
pub async fn decode_pool_creation<R>(
    rpc: &R,
    signature: &Signature,
    retry: &RetryConfig,
) -> Result<Option<PoolCreationEvent>, LogParseError>
where
    R: LedgerRpc + ?Sized,
{
    let Some(record) = fetch_confirmed(rpc, signature, retry).await else {
        return Ok(None);
    };
    decode_record(rpc, &record).await
}

async fn decode_record<R>(
    rpc: &R,
    record: &TransactionRecord,
) -> Result<Option<PoolCreationEvent>, LogParseError>
where
    R: LedgerRpc + ?Sized,
{
    if record.failed {
        debug!("[POOL] {} reverted", record.signature);
        return Ok(None);
    }
    let Some(params) = parse_pool_init(&record.log_messages)? else {
        debug!("[POOL] {} has no init log", record.signature);
        return Ok(None);
    };
    let Some(creator) = record.account_keys.first().copied() else {
        return Ok(None);
    };
    let Some(amm_ix) = record
        .instructions
        .iter()
        .find(|ix| ix.program_id == AMM_V4_PROGRAM_ID)
    else {
        debug!("[POOL] {} has no AMM v4 instruction", record.signature);
        return Ok(None);
    };

    for candidate in candidate_accounts(amm_ix) {
        let data = match rpc.get_account_data(&candidate).await {
            Ok(Some(data)) => data,
            Ok(None) => {
                debug!("[POOL] candidate {candidate} does not exist");
                continue;
            }
            Err(e) => {
                warn!("[POOL] fetching candidate {candidate} failed: {e:#}");
                continue;
            }
        };
        let pool: PoolState = match decode(&data) {
            Ok(pool) => pool,
            Err(e) => {
                debug!("[POOL] candidate {candidate} is not a pool: {e}");
                continue;
            }
        };
        if !pool.is_initialized() {
            debug!("[POOL] candidate {candidate} has no lp reserve yet");
            continue;
        }

        let normalized = normalize(pool, (params.init_base_amount, params.init_quote_amount));
        let (base_amount, quote_amount) = normalized.amounts;
        let pool = normalized.pool;

        let event = PoolCreationEvent {
            creator,
            token0: pool.base_mint,
            token1: pool.quote_mint,
            pair: candidate,
            slot: record.slot,
            block_time: record.block_time,
            base_vault: pool.base_vault,
            quote_vault: pool.quote_vault,
            lp_mint: pool.lp_mint,
            liquidity: ui_amount(quote_amount, QUOTE_DECIMALS).unwrap_or(Decimal::ZERO),
            initial_tokens: base_amount,
            open_time: params.open_time,
            open_time_utc: i64::try_from(params.open_time)
                .ok()
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
            swapped: normalized.swapped,
        };
        info!(
            "[POOL] {} created pool {} ({} / {}, swapped: {})",
            record.signature, event.pair, event.token0, event.token1, event.swapped
        );
        return Ok(Some(event));
    }

    warn!("[POOL] {} has no initialised candidate pool", record.signature);
    Ok(None)
}

/// Accounts strictly between the rent sysvar and the wSOL mint in the
/// `initialize2` account list. The new pool id is among them.
fn candidate_accounts(ix: &InstructionRecord) -> Vec<Pubkey> {
    let start = ix.accounts.iter().position(|key| *key == sysvar::rent::ID);
    let end = ix.accounts.iter().position(|key| *key == WSOL_MINT);
    match (start, end) {
        (Some(start), Some(end)) if start < end => ix.accounts[start + 1..end].to_vec(),
        _ => Vec::new(),
    }
}
