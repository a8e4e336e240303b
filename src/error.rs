//! Error taxonomy shared by the decode, build and submit paths.

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Failure to turn an account buffer into a typed record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{layout}: buffer too short ({actual} bytes, layout needs {expected})")]
    TooShort {
        layout: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{layout}: invalid discriminant {value} in field `{field}`")]
    InvalidDiscriminant {
        layout: &'static str,
        field: &'static str,
        value: u64,
    },

    #[error("{layout}: field `{field}` not present in layout")]
    MissingField {
        layout: &'static str,
        field: &'static str,
    },

    #[error("{layout}: field `{field}` read as the wrong kind")]
    KindMismatch {
        layout: &'static str,
        field: &'static str,
    },
}

/// The init marker was found but its payload could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogParseError {
    #[error("malformed pool init log `{line}`: {reason}")]
    Malformed { line: String, reason: String },
}

/// Preconditions checked by the swap builder before any I/O.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("amount in must be greater than zero")]
    ZeroAmountIn,

    #[error("wallet holds no token account for source mint {0}")]
    MissingSourceAccount(Pubkey),

    #[error("no valid market authority for market {0}")]
    MarketAuthority(Pubkey),

    #[error("pool {0} has no lp reserve yet")]
    PoolNotInitialized(Pubkey),
}

/// Everything that can end a swap request. Converted into a `SwapResult`
/// before it reaches the caller.
#[derive(Debug, Error)]
pub enum SwapError {
    #[error("invalid wallet key: {0}")]
    InvalidKey(String),

    #[error("account {0} not found")]
    AccountNotFound(Pubkey),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("rpc: {0}")]
    Rpc(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Precondition(#[from] BuildError),

    #[error("transaction compile failed: {0}")]
    Compile(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("submission failed: {0}")]
    Submission(String),
}
