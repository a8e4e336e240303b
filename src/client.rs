//! Caller-facing entry points: pool-creation decoding, burn decoding and
//! single-pool swaps.

use std::sync::Arc;

use log::{error, info, warn};
use rust_decimal::Decimal;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};

use crate::{
    config::{settings::keypair_from_base58, Settings},
    dex::{raydium::PoolKeys, SwapDirection},
    error::{BuildError, LogParseError, SwapError},
    rpc::{LedgerRpc, RpcLedger},
    state::{decode, token::raw_amount, MarketState, PoolState, TokenAccountRecord},
    submit::{submit_swap, SwapResult},
    transactions::{
        burn::{decode_burn, BurnInfo},
        pool_creation::{decode_pool_creation, PoolCreationEvent},
    },
    tx::{
        ata::held_accounts,
        swap_builder::{build_swap_instructions, SwapRequest},
    },
};

pub struct PoolClient {
    rpc: Arc<dyn LedgerRpc>,
    settings: Settings,
}

impl PoolClient {
    pub fn new(rpc: Arc<dyn LedgerRpc>, settings: Settings) -> Self {
        Self { rpc, settings }
    }

    /// Client over a JSON-RPC node at `settings.rpc_url`.
    pub fn from_settings(settings: Settings) -> Self {
        let rpc = Arc::new(RpcLedger::from_settings(&settings));
        Self::new(rpc, settings)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub async fn decode_pool_creation(
        &self,
        signature: &Signature,
    ) -> Result<Option<PoolCreationEvent>, LogParseError> {
        decode_pool_creation(self.rpc.as_ref(), signature, &self.settings.fetch_retry).await
    }

    pub async fn decode_burn(&self, signature: &Signature, include_current_balances: bool) -> Option<BurnInfo> {
        decode_burn(self.rpc.as_ref(), signature, include_current_balances).await
    }

    /// Swap `amount_in` (display units of the source mint) through `pool`.
    /// Never fails: every problem is reported in the returned result.
    pub async fn swap(
        &self,
        pool: &Pubkey,
        wallet_key_base58: &str,
        amount_in: Decimal,
        tip_lamports: u64,
        direction: SwapDirection,
    ) -> SwapResult {
        if amount_in.is_zero() {
            return SwapResult::error(String::new(), SwapError::from(BuildError::ZeroAmountIn));
        }
        if amount_in.is_sign_negative() {
            return SwapResult::error(String::new(), SwapError::InvalidAmount(amount_in.to_string()));
        }
        let wallet = match keypair_from_base58(wallet_key_base58) {
            Ok(wallet) => wallet,
            Err(e) => return SwapResult::error(String::new(), SwapError::InvalidKey(format!("{e:#}"))),
        };

        info!("[SWAP] {direction:?} {amount_in} on {pool} for {}", wallet.pubkey());
        match self.prepare_swap(pool, &wallet, amount_in, tip_lamports, direction).await {
            Ok(instructions) => submit_swap(self.rpc.as_ref(), &wallet, &instructions).await,
            Err(e) => {
                error!("[SWAP] {pool}: {e}");
                SwapResult::error(String::new(), e)
            }
        }
    }

    async fn prepare_swap(
        &self,
        pool: &Pubkey,
        wallet: &Keypair,
        amount_in: Decimal,
        tip_lamports: u64,
        direction: SwapDirection,
    ) -> Result<Vec<solana_sdk::instruction::Instruction>, SwapError> {
        let pool_state: PoolState = decode(&self.account(pool).await?)?;
        if !pool_state.is_initialized() {
            return Err(BuildError::PoolNotInitialized(*pool).into());
        }
        let market: MarketState = decode(&self.account(&pool_state.market_id).await?)?;
        let keys = PoolKeys::new(*pool, &pool_state, &market)?;

        let (source_mint, _) = direction.resolve(keys.base_mint, keys.quote_mint);
        let decimals = keys
            .decimals_of(&source_mint)
            .ok_or_else(|| SwapError::InvalidAmount(format!("{source_mint} is not in pool {pool}")))?;
        let raw_in = raw_amount(amount_in, decimals)
            .ok_or_else(|| SwapError::InvalidAmount(format!("{amount_in} with {decimals} decimals")))?;

        let owner = wallet.pubkey();
        let token_accounts = self
            .rpc
            .get_token_accounts_by_owner(&owner)
            .await
            .map_err(|e| SwapError::Rpc(format!("{e:#}")))?;
        let records: Vec<(Pubkey, TokenAccountRecord)> = token_accounts
            .into_iter()
            .filter_map(|(address, data)| match decode::<TokenAccountRecord>(&data) {
                Ok(record) => Some((address, record)),
                Err(e) => {
                    warn!("[SWAP] skipping token account {address}: {e}");
                    None
                }
            })
            .collect();
        let held = held_accounts(&owner, &records);

        let request = SwapRequest {
            keys: &keys,
            owner,
            direction,
            amount_in: raw_in,
            tip_lamports,
            tip_account: self.settings.tip_account,
            budget: self.settings.compute_budget,
            held_accounts: &held,
        };
        Ok(build_swap_instructions(&request)?)
    }

    async fn account(&self, address: &Pubkey) -> Result<Vec<u8>, SwapError> {
        self.rpc
            .get_account_data(address)
            .await
            .map_err(|e| SwapError::Rpc(format!("{e:#}")))?
            .ok_or(SwapError::AccountNotFound(*address))
    }
}
