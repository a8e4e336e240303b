/* --------------------------------------------------------------------- */
/*  Raydium AMM v4: key derivation, canonical ordering, swap direction   */
/* --------------------------------------------------------------------- */

pub mod normalize;
pub mod raydium;

use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

use self::normalize::canonical_mints;

/// Wrapped SOL. Canonical pools hold it on the quote side.
pub const WSOL_MINT: Pubkey = spl_token::native_mint::ID;

/// Which side of the (canonically ordered) pair is spent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SwapDirection {
    /// Spend the token, receive the quote (usually wSOL). A sell.
    BaseForQuote,
    /// Spend the quote, receive the token. A buy.
    QuoteForBase,
}

impl SwapDirection {
    /// `(source_mint, destination_mint)` for a pool whose raw mints are
    /// `base_mint` / `quote_mint`, whichever order they sit on chain.
    ///
    /// This is where swaps apply the canonical ordering; `PoolKeys` are never
    /// normalised since the swap instruction needs the vaults in on-chain order.
    pub fn resolve(self, base_mint: Pubkey, quote_mint: Pubkey) -> (Pubkey, Pubkey) {
        let (base, quote) = canonical_mints(base_mint, quote_mint);
        match self {
            SwapDirection::BaseForQuote => (base, quote),
            SwapDirection::QuoteForBase => (quote, base),
        }
    }
}
