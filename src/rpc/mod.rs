//! The ledger as seen by this crate: a narrow async trait plus the owned
//! records it returns. `solana` implements it over the nonblocking
//! `RpcClient`; tests use an in-memory ledger.

#[cfg(test)]
pub(crate) mod mock;
pub mod solana;

use anyhow::Result;
use async_trait::async_trait;
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::VersionedTransaction,
};

pub use self::solana::RpcLedger;

/// Recent blockhash plus the last block height at which a transaction
/// referencing it can still land.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockReference {
    pub blockhash: Hash,
    pub last_valid_block_height: u64,
}

/// `{ program, type, info }` of a jsonParsed instruction.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedInstructionRecord {
    pub program: String,
    pub kind: String,
    pub info: serde_json::Value,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InstructionRecord {
    pub program_id: Pubkey,
    /// Empty for instructions the node parsed itself.
    pub accounts: Vec<Pubkey>,
    pub parsed: Option<ParsedInstructionRecord>,
}

/// Owned, flattened view of a confirmed transaction. Only top-level
/// instructions are kept.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionRecord {
    pub signature: String,
    pub slot: u64,
    pub block_time: Option<i64>,
    pub account_keys: Vec<Pubkey>,
    pub instructions: Vec<InstructionRecord>,
    pub log_messages: Vec<String>,
    pub failed: bool,
}

#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Raw account bytes, `None` if the account does not exist.
    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>>;

    /// `None` when the node does not (yet) know the signature.
    async fn get_transaction(&self, signature: &Signature) -> Result<Option<TransactionRecord>>;

    /// SPL token accounts owned by `owner`, as `(address, raw data)`.
    async fn get_token_accounts_by_owner(&self, owner: &Pubkey) -> Result<Vec<(Pubkey, Vec<u8>)>>;

    async fn get_latest_blockhash(&self) -> Result<BlockReference>;

    async fn send_transaction(&self, transaction: &VersionedTransaction) -> Result<Signature>;

    /// Wait until `signature` reaches the configured commitment.
    /// `Ok(None)` on success, `Ok(Some(err))` when the program rejected it and
    /// `Err` once `block.last_valid_block_height` has passed.
    async fn confirm_transaction(&self, signature: &Signature, block: &BlockReference) -> Result<Option<String>>;

    async fn get_token_account_ui_balance(&self, account: &Pubkey) -> Result<f64>;

    async fn get_token_supply_ui(&self, mint: &Pubkey) -> Result<f64>;
}
