//! Confirmed-transaction fetching and the decoders that run over the
//! fetched records.

pub mod burn;
pub mod init_log;
pub mod pool_creation;

use std::time::Duration;

use log::{debug, warn};
use solana_sdk::signature::Signature;

use crate::rpc::{LedgerRpc, TransactionRecord};

/// Linear backoff: the wait after attempt `n` is `base_delay * n`,
/// saturating at `Duration::MAX`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryConfig {
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

/// Fetch a confirmed transaction, retrying "not found" and transport
/// errors alike. Returns `None` once the attempt budget is spent.
pub async fn fetch_confirmed<R>(
    rpc: &R,
    signature: &Signature,
    retry: &RetryConfig,
) -> Option<TransactionRecord>
where
    R: LedgerRpc + ?Sized,
{
    for attempt in 1..=retry.max_attempts {
        match rpc.get_transaction(signature).await {
            Ok(Some(record)) => {
                debug!("[FETCH] {signature} found on attempt {attempt}");
                return Some(record);
            }
            Ok(None) => debug!(
                "[FETCH] {signature} not found (attempt {attempt}/{})",
                retry.max_attempts
            ),
            Err(e) => warn!(
                "[FETCH] {signature} attempt {attempt}/{} failed: {e:#}",
                retry.max_attempts
            ),
        }

        if attempt < retry.max_attempts {
            tokio::time::sleep(retry.delay_after(attempt)).await;
        }
    }

    warn!(
        "[FETCH] giving up on {signature} after {} attempts",
        retry.max_attempts
    );
    None
}
