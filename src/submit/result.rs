use std::fmt::Display;

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapOutcome {
    Success,
    Failed,
    Error,
}

/// What a swap call hands back. `signature` is empty until the transaction
/// has been sent and is never overwritten afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SwapResult {
    pub signature: String,
    pub outcome: SwapOutcome,
    pub message: String,
}

impl SwapResult {
    pub fn success(signature: String) -> Self {
        Self {
            signature,
            outcome: SwapOutcome::Success,
            message: "Transaction successful".to_string(),
        }
    }

    pub fn failed(signature: String) -> Self {
        Self {
            signature,
            outcome: SwapOutcome::Failed,
            message: "Transaction failed".to_string(),
        }
    }

    pub fn error(signature: String, cause: impl Display) -> Self {
        Self {
            signature,
            outcome: SwapOutcome::Error,
            message: format!("Code error: {cause}"),
        }
    }
}
