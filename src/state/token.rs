//! SPL token program records: token accounts (165 bytes) and mints (82 bytes).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

use super::{AccountLayout, Field, FieldKind, Fields, Layout};
use crate::error::DecodeError;

pub const TOKEN_ACCOUNT_LEN: usize = 165;
pub const MINT_LEN: usize = 82;

const TOKEN_ACCOUNT_FIELDS: &[Field] = &[
    Field::new("mint", 0, FieldKind::Pubkey),
    Field::new("owner", 32, FieldKind::Pubkey),
    Field::new("amount", 64, FieldKind::U64),
    Field::new("delegateOption", 72, FieldKind::U32),
    Field::new("delegate", 76, FieldKind::Pubkey),
    Field::new("state", 108, FieldKind::U8),
    Field::new("isNativeOption", 109, FieldKind::U32),
    Field::new("isNative", 113, FieldKind::U64),
    Field::new("delegatedAmount", 121, FieldKind::U64),
    Field::new("closeAuthorityOption", 129, FieldKind::U32),
    Field::new("closeAuthority", 133, FieldKind::Pubkey),
];

const MINT_FIELDS: &[Field] = &[
    Field::new("mintAuthorityOption", 0, FieldKind::U32),
    Field::new("mintAuthority", 4, FieldKind::Pubkey),
    Field::new("supply", 36, FieldKind::U64),
    Field::new("decimals", 44, FieldKind::U8),
    Field::new("isInitialized", 45, FieldKind::Bool),
    Field::new("freezeAuthorityOption", 46, FieldKind::U32),
    Field::new("freezeAuthority", 50, FieldKind::Pubkey),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AccountState {
    Uninitialized,
    Initialized,
    Frozen,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenAccountRecord {
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub delegate: Option<Pubkey>,
    pub state: AccountState,
    /// Rent-exempt reserve for wrapped-native accounts.
    pub is_native: Option<u64>,
    pub delegated_amount: u64,
    pub close_authority: Option<Pubkey>,
}

impl AccountLayout for TokenAccountRecord {
    const LAYOUT: Layout = Layout {
        name: "SplTokenAccount",
        size: TOKEN_ACCOUNT_LEN,
        fields: TOKEN_ACCOUNT_FIELDS,
    };

    fn from_fields(fields: &Fields) -> Result<Self, DecodeError> {
        let state = match fields.u8("state")? {
            0 => AccountState::Uninitialized,
            1 => AccountState::Initialized,
            2 => AccountState::Frozen,
            other => {
                return Err(DecodeError::InvalidDiscriminant {
                    layout: fields.layout_name(),
                    field: "state",
                    value: other as u64,
                })
            }
        };

        Ok(Self {
            mint: fields.pubkey("mint")?,
            owner: fields.pubkey("owner")?,
            amount: fields.u64("amount")?,
            delegate: fields
                .option_tag("delegateOption")?
                .then(|| fields.pubkey("delegate"))
                .transpose()?,
            state,
            is_native: fields
                .option_tag("isNativeOption")?
                .then(|| fields.u64("isNative"))
                .transpose()?,
            delegated_amount: fields.u64("delegatedAmount")?,
            close_authority: fields
                .option_tag("closeAuthorityOption")?
                .then(|| fields.pubkey("closeAuthority"))
                .transpose()?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintRecord {
    pub mint_authority: Option<Pubkey>,
    pub supply: u64,
    pub decimals: u8,
    pub is_initialized: bool,
    pub freeze_authority: Option<Pubkey>,
}

impl MintRecord {
    /// `raw / 10^decimals`, exact. `None` when decimals exceed what a
    /// `Decimal` can scale to.
    pub fn ui_amount(&self, raw: u64) -> Option<Decimal> {
        ui_amount(raw, self.decimals)
    }

    pub fn ui_supply(&self) -> Option<Decimal> {
        self.ui_amount(self.supply)
    }
}

impl AccountLayout for MintRecord {
    const LAYOUT: Layout = Layout {
        name: "SplMint",
        size: MINT_LEN,
        fields: MINT_FIELDS,
    };

    fn from_fields(fields: &Fields) -> Result<Self, DecodeError> {
        Ok(Self {
            mint_authority: fields
                .option_tag("mintAuthorityOption")?
                .then(|| fields.pubkey("mintAuthority"))
                .transpose()?,
            supply: fields.u64("supply")?,
            decimals: fields.u8("decimals")?,
            is_initialized: fields.bool("isInitialized")?,
            freeze_authority: fields
                .option_tag("freezeAuthorityOption")?
                .then(|| fields.pubkey("freezeAuthority"))
                .transpose()?,
        })
    }
}

pub fn ui_amount(raw: u64, decimals: u8) -> Option<Decimal> {
    Decimal::try_from_i128_with_scale(raw as i128, decimals as u32).ok()
}

/// Inverse of [`ui_amount`]: scales a display amount up by `10^decimals` and
/// truncates. `None` on negative input or overflow.
pub fn raw_amount(ui: Decimal, decimals: u8) -> Option<u64> {
    if ui.is_sign_negative() {
        return None;
    }
    let scale = (0..decimals).try_fold(Decimal::ONE, |acc, _| acc.checked_mul(Decimal::TEN))?;
    ui.checked_mul(scale)?.trunc().to_u64()
}
