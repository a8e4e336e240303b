//! Raydium AMM v4 liquidity state (752 bytes).

use solana_sdk::pubkey::Pubkey;

use super::{AccountLayout, Field, FieldKind, Fields, Layout};
use crate::error::DecodeError;

pub const POOL_STATE_LEN: usize = 752;

const POOL_STATE_FIELDS: &[Field] = &[
    Field::new("status", 0, FieldKind::U64),
    Field::new("nonce", 8, FieldKind::U64),
    Field::new("maxOrder", 16, FieldKind::U64),
    Field::new("depth", 24, FieldKind::U64),
    Field::new("baseDecimal", 32, FieldKind::U64),
    Field::new("quoteDecimal", 40, FieldKind::U64),
    Field::new("state", 48, FieldKind::U64),
    Field::new("resetFlag", 56, FieldKind::U64),
    Field::new("minSize", 64, FieldKind::U64),
    Field::new("volMaxCutRatio", 72, FieldKind::U64),
    Field::new("amountWaveRatio", 80, FieldKind::U64),
    Field::new("baseLotSize", 88, FieldKind::U64),
    Field::new("quoteLotSize", 96, FieldKind::U64),
    Field::new("minPriceMultiplier", 104, FieldKind::U64),
    Field::new("maxPriceMultiplier", 112, FieldKind::U64),
    Field::new("systemDecimalValue", 120, FieldKind::U64),
    Field::new("minSeparateNumerator", 128, FieldKind::U64),
    Field::new("minSeparateDenominator", 136, FieldKind::U64),
    Field::new("tradeFeeNumerator", 144, FieldKind::U64),
    Field::new("tradeFeeDenominator", 152, FieldKind::U64),
    Field::new("pnlNumerator", 160, FieldKind::U64),
    Field::new("pnlDenominator", 168, FieldKind::U64),
    Field::new("swapFeeNumerator", 176, FieldKind::U64),
    Field::new("swapFeeDenominator", 184, FieldKind::U64),
    Field::new("baseNeedTakePnl", 192, FieldKind::U64),
    Field::new("quoteNeedTakePnl", 200, FieldKind::U64),
    Field::new("quoteTotalPnl", 208, FieldKind::U64),
    Field::new("baseTotalPnl", 216, FieldKind::U64),
    Field::new("poolOpenTime", 224, FieldKind::U64),
    Field::new("punishPcAmount", 232, FieldKind::U64),
    Field::new("punishCoinAmount", 240, FieldKind::U64),
    Field::new("orderbookToInitTime", 248, FieldKind::U64),
    Field::new("swapBaseInAmount", 256, FieldKind::U128),
    Field::new("swapQuoteOutAmount", 272, FieldKind::U128),
    Field::new("swapBase2QuoteFee", 288, FieldKind::U64),
    Field::new("swapQuoteInAmount", 296, FieldKind::U128),
    Field::new("swapBaseOutAmount", 312, FieldKind::U128),
    Field::new("swapQuote2BaseFee", 328, FieldKind::U64),
    Field::new("baseVault", 336, FieldKind::Pubkey),
    Field::new("quoteVault", 368, FieldKind::Pubkey),
    Field::new("baseMint", 400, FieldKind::Pubkey),
    Field::new("quoteMint", 432, FieldKind::Pubkey),
    Field::new("lpMint", 464, FieldKind::Pubkey),
    Field::new("openOrders", 496, FieldKind::Pubkey),
    Field::new("marketId", 528, FieldKind::Pubkey),
    Field::new("marketProgramId", 560, FieldKind::Pubkey),
    Field::new("targetOrders", 592, FieldKind::Pubkey),
    Field::new("withdrawQueue", 624, FieldKind::Pubkey),
    Field::new("lpVault", 656, FieldKind::Pubkey),
    Field::new("owner", 688, FieldKind::Pubkey),
    Field::new("lpReserve", 720, FieldKind::U64),
];

/// Decoded pool record. Base/quote follow the on-chain order, which is not
/// guaranteed to be canonical; see [`crate::dex::normalize`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolState {
    pub status: u64,
    pub nonce: u64,
    pub base_decimals: u8,
    pub quote_decimals: u8,
    pub pool_open_time: u64,
    pub base_vault: Pubkey,
    pub quote_vault: Pubkey,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub lp_mint: Pubkey,
    pub open_orders: Pubkey,
    pub market_id: Pubkey,
    pub market_program_id: Pubkey,
    pub target_orders: Pubkey,
    pub withdraw_queue: Pubkey,
    pub lp_vault: Pubkey,
    pub owner: Pubkey,
    pub lp_reserve: u64,
}

impl PoolState {
    /// Pools with no LP reserve have not been initialised yet.
    pub fn is_initialized(&self) -> bool {
        self.lp_reserve != 0
    }
}

impl AccountLayout for PoolState {
    const LAYOUT: Layout = Layout {
        name: "LiquidityStateV4",
        size: POOL_STATE_LEN,
        fields: POOL_STATE_FIELDS,
    };

    fn from_fields(fields: &Fields) -> Result<Self, DecodeError> {
        Ok(Self {
            status: fields.u64("status")?,
            nonce: fields.u64("nonce")?,
            base_decimals: fields.decimals("baseDecimal")?,
            quote_decimals: fields.decimals("quoteDecimal")?,
            pool_open_time: fields.u64("poolOpenTime")?,
            base_vault: fields.pubkey("baseVault")?,
            quote_vault: fields.pubkey("quoteVault")?,
            base_mint: fields.pubkey("baseMint")?,
            quote_mint: fields.pubkey("quoteMint")?,
            lp_mint: fields.pubkey("lpMint")?,
            open_orders: fields.pubkey("openOrders")?,
            market_id: fields.pubkey("marketId")?,
            market_program_id: fields.pubkey("marketProgramId")?,
            target_orders: fields.pubkey("targetOrders")?,
            withdraw_queue: fields.pubkey("withdrawQueue")?,
            lp_vault: fields.pubkey("lpVault")?,
            owner: fields.pubkey("owner")?,
            lp_reserve: fields.u64("lpReserve")?,
        })
    }
}
