//! OpenBook / Serum market state v3 (388 bytes). Only the accounts the swap
//! instruction references are surfaced.

use solana_sdk::pubkey::Pubkey;

use super::{AccountLayout, Field, FieldKind, Fields, Layout};
use crate::error::DecodeError;

pub const MARKET_STATE_LEN: usize = 388;

const MARKET_STATE_FIELDS: &[Field] = &[
    // 5 bytes of "serum" padding precede the account flags.
    Field::new("accountFlags", 5, FieldKind::U64),
    Field::new("ownAddress", 13, FieldKind::Pubkey),
    Field::new("vaultSignerNonce", 45, FieldKind::U64),
    Field::new("baseMint", 53, FieldKind::Pubkey),
    Field::new("quoteMint", 85, FieldKind::Pubkey),
    Field::new("baseVault", 117, FieldKind::Pubkey),
    Field::new("baseDepositsTotal", 149, FieldKind::U64),
    Field::new("baseFeesAccrued", 157, FieldKind::U64),
    Field::new("quoteVault", 165, FieldKind::Pubkey),
    Field::new("quoteDepositsTotal", 197, FieldKind::U64),
    Field::new("quoteFeesAccrued", 205, FieldKind::U64),
    Field::new("quoteDustThreshold", 213, FieldKind::U64),
    Field::new("requestQueue", 221, FieldKind::Pubkey),
    Field::new("eventQueue", 253, FieldKind::Pubkey),
    Field::new("bids", 285, FieldKind::Pubkey),
    Field::new("asks", 317, FieldKind::Pubkey),
    Field::new("baseLotSize", 349, FieldKind::U64),
    Field::new("quoteLotSize", 357, FieldKind::U64),
    Field::new("feeRateBps", 365, FieldKind::U64),
    Field::new("referrerRebatesAccrued", 373, FieldKind::U64),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarketState {
    pub own_address: Pubkey,
    pub vault_signer_nonce: u64,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub base_vault: Pubkey,
    pub quote_vault: Pubkey,
    pub event_queue: Pubkey,
    pub bids: Pubkey,
    pub asks: Pubkey,
}

impl AccountLayout for MarketState {
    const LAYOUT: Layout = Layout {
        name: "MarketStateV3",
        size: MARKET_STATE_LEN,
        fields: MARKET_STATE_FIELDS,
    };

    fn from_fields(fields: &Fields) -> Result<Self, DecodeError> {
        Ok(Self {
            own_address: fields.pubkey("ownAddress")?,
            vault_signer_nonce: fields.u64("vaultSignerNonce")?,
            base_mint: fields.pubkey("baseMint")?,
            quote_mint: fields.pubkey("quoteMint")?,
            base_vault: fields.pubkey("baseVault")?,
            quote_vault: fields.pubkey("quoteVault")?,
            event_queue: fields.pubkey("eventQueue")?,
            bids: fields.pubkey("bids")?,
            asks: fields.pubkey("asks")?,
        })
    }
}
