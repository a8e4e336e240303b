//! In-memory ledger for tests: scripted accounts, transactions and
//! failures, with call counters and captured submissions.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::VersionedTransaction,
};

use super::{BlockReference, LedgerRpc, TransactionRecord};

/// How `confirm_transaction` answers.
#[derive(Clone, Debug)]
pub(crate) enum ConfirmScript {
    Confirmed,
    ProgramError(String),
    Expired,
}

pub(crate) struct MockLedger {
    pub accounts: HashMap<Pubkey, Vec<u8>>,
    pub transactions: HashMap<Signature, TransactionRecord>,
    /// `get_transaction` errors this many times before answering.
    pub transaction_failures: AtomicUsize,
    pub transaction_calls: AtomicUsize,
    pub transaction_call_times: Mutex<Vec<tokio::time::Instant>>,
    pub token_accounts: Vec<(Pubkey, Vec<u8>)>,
    pub balances: HashMap<Pubkey, f64>,
    pub supplies: HashMap<Pubkey, f64>,
    pub blockhash_error: bool,
    pub send_error: Option<String>,
    pub confirm: ConfirmScript,
    pub sent: Mutex<Vec<VersionedTransaction>>,
}

impl Default for MockLedger {
    fn default() -> Self {
        Self {
            accounts: HashMap::new(),
            transactions: HashMap::new(),
            transaction_failures: AtomicUsize::new(0),
            transaction_calls: AtomicUsize::new(0),
            transaction_call_times: Mutex::new(Vec::new()),
            token_accounts: Vec::new(),
            balances: HashMap::new(),
            supplies: HashMap::new(),
            blockhash_error: false,
            send_error: None,
            confirm: ConfirmScript::Confirmed,
            sent: Mutex::new(Vec::new()),
        }
    }
}

impl MockLedger {
    pub(crate) fn with_account(mut self, address: Pubkey, data: Vec<u8>) -> Self {
        self.accounts.insert(address, data);
        self
    }

    pub(crate) fn with_transaction(mut self, signature: Signature, record: TransactionRecord) -> Self {
        self.transactions.insert(signature, record);
        self
    }

    pub(crate) fn failing_transaction_fetches(self, times: usize) -> Self {
        self.transaction_failures.store(times, Ordering::SeqCst);
        self
    }

    pub(crate) fn with_token_account(mut self, address: Pubkey, data: Vec<u8>) -> Self {
        self.token_accounts.push((address, data));
        self
    }

    pub(crate) fn transaction_calls(&self) -> usize {
        self.transaction_calls.load(Ordering::SeqCst)
    }

    /// Gaps between consecutive `get_transaction` calls.
    pub(crate) fn transaction_call_gaps(&self) -> Vec<std::time::Duration> {
        let times = self
            .transaction_call_times
            .lock()
            .map(|times| times.clone())
            .unwrap_or_default();
        times.windows(2).map(|pair| pair[1] - pair[0]).collect()
    }

    pub(crate) fn sent(&self) -> Vec<VersionedTransaction> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LedgerRpc for MockLedger {
    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        Ok(self.accounts.get(address).cloned())
    }

    async fn get_transaction(&self, signature: &Signature) -> Result<Option<TransactionRecord>> {
        self.transaction_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut times) = self.transaction_call_times.lock() {
            times.push(tokio::time::Instant::now());
        }
        let remaining = self.transaction_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.transaction_failures.store(remaining - 1, Ordering::SeqCst);
            bail!("connection reset");
        }
        Ok(self.transactions.get(signature).cloned())
    }

    async fn get_token_accounts_by_owner(&self, _owner: &Pubkey) -> Result<Vec<(Pubkey, Vec<u8>)>> {
        Ok(self.token_accounts.clone())
    }

    async fn get_latest_blockhash(&self) -> Result<BlockReference> {
        if self.blockhash_error {
            bail!("blockhash unavailable");
        }
        Ok(BlockReference {
            blockhash: Hash::new_unique(),
            last_valid_block_height: 1_000,
        })
    }

    async fn send_transaction(&self, transaction: &VersionedTransaction) -> Result<Signature> {
        if let Some(err) = &self.send_error {
            bail!("{err}");
        }
        self.sent
            .lock()
            .map_err(|_| anyhow!("poisoned"))?
            .push(transaction.clone());
        transaction
            .signatures
            .first()
            .copied()
            .ok_or_else(|| anyhow!("unsigned transaction"))
    }

    async fn confirm_transaction(&self, signature: &Signature, block: &BlockReference) -> Result<Option<String>> {
        match &self.confirm {
            ConfirmScript::Confirmed => Ok(None),
            ConfirmScript::ProgramError(err) => Ok(Some(err.clone())),
            ConfirmScript::Expired => bail!(
                "signature {signature} not confirmed before block height {}",
                block.last_valid_block_height
            ),
        }
    }

    async fn get_token_account_ui_balance(&self, account: &Pubkey) -> Result<f64> {
        self.balances
            .get(account)
            .copied()
            .ok_or_else(|| anyhow!("no balance for {account}"))
    }

    async fn get_token_supply_ui(&self, mint: &Pubkey) -> Result<f64> {
        self.supplies
            .get(mint)
            .copied()
            .ok_or_else(|| anyhow!("no supply for {mint}"))
    }
}
