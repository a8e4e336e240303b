//! Raydium AMM v4 integration: program ids, derived authorities, the
//! flattened [`PoolKeys`] view and the `swapBaseIn` instruction.

use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};
use spl_token::ID as TOKEN_PROGRAM_ID;

use crate::{
    error::BuildError,
    state::{MarketState, PoolState},
};

// Raydium liquidity pool v4
pub const AMM_V4_PROGRAM_ID: Pubkey = solana_sdk::pubkey!("675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8");

// OpenBook market program used by v4 pools
pub const OPENBOOK_PROGRAM_ID: Pubkey = solana_sdk::pubkey!("srmqPvymJeFKQ4zGQed1GFppgkRHL9kaELCbyksJtPX");

const AMM_AUTHORITY_SEED: &[u8] = b"amm authority";

/// Instruction tag for `swapBaseIn` (fixed amount in).
const SWAP_BASE_IN_TAG: u8 = 9;

pub const LP_DECIMALS: u8 = 5;
pub const POOL_VERSION: u8 = 4;
pub const MARKET_VERSION: u8 = 3;

/// Everything the swap instruction needs, in on-chain order. Built fresh for
/// every swap and never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolKeys {
    pub id: Pubkey,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub lp_mint: Pubkey,
    pub base_decimals: u8,
    pub quote_decimals: u8,
    pub lp_decimals: u8,
    pub version: u8,
    pub program_id: Pubkey,
    pub authority: Pubkey,
    pub open_orders: Pubkey,
    pub target_orders: Pubkey,
    pub base_vault: Pubkey,
    pub quote_vault: Pubkey,
    pub withdraw_queue: Pubkey,
    pub lp_vault: Pubkey,
    pub market_version: u8,
    pub market_program_id: Pubkey,
    pub market_id: Pubkey,
    pub market_authority: Pubkey,
    pub market_base_vault: Pubkey,
    pub market_quote_vault: Pubkey,
    pub market_bids: Pubkey,
    pub market_asks: Pubkey,
    pub market_event_queue: Pubkey,
}

impl PoolKeys {
    /// `pool` must be the state as decoded, not a normalized copy: vault
    /// order here is what the program checks.
    pub fn new(id: Pubkey, pool: &PoolState, market: &MarketState) -> Result<Self, BuildError> {
        let market_authority = derive_market_authority(&pool.market_program_id, &pool.market_id)
            .ok_or(BuildError::MarketAuthority(pool.market_id))?;

        Ok(Self {
            id,
            base_mint: pool.base_mint,
            quote_mint: pool.quote_mint,
            lp_mint: pool.lp_mint,
            base_decimals: pool.base_decimals,
            quote_decimals: pool.quote_decimals,
            lp_decimals: LP_DECIMALS,
            version: POOL_VERSION,
            program_id: AMM_V4_PROGRAM_ID,
            authority: derive_amm_authority(&AMM_V4_PROGRAM_ID),
            open_orders: pool.open_orders,
            target_orders: pool.target_orders,
            base_vault: pool.base_vault,
            quote_vault: pool.quote_vault,
            withdraw_queue: pool.withdraw_queue,
            lp_vault: pool.lp_vault,
            market_version: MARKET_VERSION,
            market_program_id: pool.market_program_id,
            market_id: pool.market_id,
            market_authority,
            market_base_vault: market.base_vault,
            market_quote_vault: market.quote_vault,
            market_bids: market.bids,
            market_asks: market.asks,
            market_event_queue: market.event_queue,
        })
    }

    pub fn decimals_of(&self, mint: &Pubkey) -> Option<u8> {
        if *mint == self.base_mint {
            Some(self.base_decimals)
        } else if *mint == self.quote_mint {
            Some(self.quote_decimals)
        } else {
            None
        }
    }
}

/// Pool authority PDA: `["amm authority"]` under the AMM program.
pub fn derive_amm_authority(program_id: &Pubkey) -> Pubkey {
    let (authority, _bump) = Pubkey::find_program_address(&[AMM_AUTHORITY_SEED], program_id);
    authority
}

/// Market vault signer: first nonce in 0..100 giving a valid program address
/// for `[market, nonce, 0 x 7]`.
pub fn derive_market_authority(market_program_id: &Pubkey, market_id: &Pubkey) -> Option<Pubkey> {
    (0u8..100).find_map(|nonce| {
        Pubkey::create_program_address(&[market_id.as_ref(), &[nonce], &[0u8; 7]], market_program_id)
            .ok()
    })
}

/// Build the `swapBaseIn` instruction. The direction of the trade is
/// implied by which user account is the source.
pub fn swap_base_in(
    keys: &PoolKeys,
    user_source: &Pubkey,
    user_destination: &Pubkey,
    owner: &Pubkey,
    amount_in: u64,
    min_amount_out: u64,
) -> Instruction {
    let mut data = Vec::with_capacity(17);
    data.push(SWAP_BASE_IN_TAG);
    data.extend_from_slice(&amount_in.to_le_bytes());
    data.extend_from_slice(&min_amount_out.to_le_bytes());

    let accounts = vec![
        AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
        AccountMeta::new(keys.id, false),
        AccountMeta::new_readonly(keys.authority, false),
        AccountMeta::new(keys.open_orders, false),
        AccountMeta::new(keys.target_orders, false),
        AccountMeta::new(keys.base_vault, false),
        AccountMeta::new(keys.quote_vault, false),
        AccountMeta::new_readonly(keys.market_program_id, false),
        AccountMeta::new(keys.market_id, false),
        AccountMeta::new(keys.market_bids, false),
        AccountMeta::new(keys.market_asks, false),
        AccountMeta::new(keys.market_event_queue, false),
        AccountMeta::new(keys.market_base_vault, false),
        AccountMeta::new(keys.market_quote_vault, false),
        AccountMeta::new_readonly(keys.market_authority, false),
        AccountMeta::new(*user_source, false),
        AccountMeta::new(*user_destination, false),
        AccountMeta::new_readonly(*owner, true),
    ];

    Instruction {
        program_id: keys.program_id,
        accounts,
        data,
    }
}
