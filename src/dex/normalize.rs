//! Canonical base/quote ordering for AMM v4 pools.
//!
//! The pool program does not guarantee which side the wrapped-native mint
//! lands on. Downstream code assumes it is the quote side, so a pool with
//! wSOL as its base is flipped here. All paired fields move in one
//! struct construction; there is no intermediate half-swapped state.

use solana_sdk::pubkey::Pubkey;

use super::WSOL_MINT;
use crate::state::PoolState;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Normalized {
    pub pool: PoolState,
    /// Caller-supplied (base, quote) amounts, reordered with the pool.
    pub amounts: (u64, u64),
    pub swapped: bool,
}

pub fn is_canonical(base_mint: &Pubkey) -> bool {
    *base_mint != WSOL_MINT
}

/// `(base, quote)` in canonical order.
pub fn canonical_mints(base_mint: Pubkey, quote_mint: Pubkey) -> (Pubkey, Pubkey) {
    if is_canonical(&base_mint) {
        (base_mint, quote_mint)
    } else {
        (quote_mint, base_mint)
    }
}

/// Flip a non-canonical pool. Never fails; unknown mints count as canonical.
pub fn normalize(pool: PoolState, amounts: (u64, u64)) -> Normalized {
    if is_canonical(&pool.base_mint) {
        return Normalized {
            pool,
            amounts,
            swapped: false,
        };
    }

    let (base_amount, quote_amount) = amounts;
    let pool = PoolState {
        base_mint: pool.quote_mint,
        quote_mint: pool.base_mint,
        base_vault: pool.quote_vault,
        quote_vault: pool.base_vault,
        base_decimals: pool.quote_decimals,
        quote_decimals: pool.base_decimals,
        ..pool
    };

    Normalized {
        pool,
        amounts: (quote_amount, base_amount),
        swapped: true,
    }
}
