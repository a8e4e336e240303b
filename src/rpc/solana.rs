//! [`LedgerRpc`] over the nonblocking Solana `RpcClient`.

use std::{str::FromStr, sync::Arc, time::Duration};

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use log::debug;
use serde_json::json;
use solana_account_decoder::UiAccountEncoding;
use solana_client::{
    nonblocking::rpc_client::RpcClient,
    rpc_config::{RpcAccountInfoConfig, RpcSendTransactionConfig, RpcTransactionConfig},
    rpc_request::RpcRequest,
    rpc_response::{Response, RpcKeyedAccount},
};
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    pubkey::Pubkey,
    signature::Signature,
    transaction::VersionedTransaction,
};
use solana_transaction_status::{
    EncodedConfirmedTransactionWithStatusMeta, EncodedTransaction, UiCompiledInstruction,
    UiInstruction, UiMessage, UiParsedInstruction, UiTransactionEncoding,
};

use super::{
    BlockReference, InstructionRecord, LedgerRpc, ParsedInstructionRecord, TransactionRecord,
};
use crate::config::Settings;

pub struct RpcLedger {
    client: Arc<RpcClient>,
    confirm_poll: Duration,
}

impl RpcLedger {
    pub fn new(client: Arc<RpcClient>, confirm_poll: Duration) -> Self {
        Self {
            client,
            confirm_poll,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let client = RpcClient::new_with_commitment(settings.rpc_url.clone(), settings.commitment);
        Self::new(Arc::new(client), settings.confirm_poll)
    }

    fn commitment(&self) -> CommitmentConfig {
        self.client.commitment()
    }
}

#[async_trait]
impl LedgerRpc for RpcLedger {
    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        let response = self
            .client
            .get_account_with_commitment(address, self.commitment())
            .await
            .with_context(|| format!("getAccountInfo {address}"))?;
        Ok(response.value.map(|account| account.data))
    }

    async fn get_transaction(&self, signature: &Signature) -> Result<Option<TransactionRecord>> {
        let config = RpcTransactionConfig {
            encoding: Some(UiTransactionEncoding::JsonParsed),
            commitment: Some(self.commitment()),
            max_supported_transaction_version: Some(0),
        };
        // `send` with an Option target: an unknown signature comes back as
        // JSON null rather than a deserialization error.
        let encoded: Option<EncodedConfirmedTransactionWithStatusMeta> = self
            .client
            .send(RpcRequest::GetTransaction, json!([signature.to_string(), config]))
            .await
            .with_context(|| format!("getTransaction {signature}"))?;
        encoded.map(TransactionRecord::try_from).transpose()
    }

    async fn get_token_accounts_by_owner(&self, owner: &Pubkey) -> Result<Vec<(Pubkey, Vec<u8>)>> {
        let config = RpcAccountInfoConfig {
            encoding: Some(UiAccountEncoding::Base64),
            commitment: Some(self.commitment()),
            ..RpcAccountInfoConfig::default()
        };
        let response: Response<Vec<RpcKeyedAccount>> = self
            .client
            .send(
                RpcRequest::GetTokenAccountsByOwner,
                json!([owner.to_string(), { "programId": spl_token::ID.to_string() }, config]),
            )
            .await
            .with_context(|| format!("getTokenAccountsByOwner {owner}"))?;

        let mut accounts = Vec::with_capacity(response.value.len());
        for keyed in response.value {
            let address = Pubkey::from_str(&keyed.pubkey)
                .with_context(|| format!("token account address {}", keyed.pubkey))?;
            let Some(account) = keyed.account.decode::<Account>() else {
                debug!("[FETCH] token account {address} not base64, skipping");
                continue;
            };
            accounts.push((address, account.data));
        }
        Ok(accounts)
    }

    async fn get_latest_blockhash(&self) -> Result<BlockReference> {
        let (blockhash, last_valid_block_height) = self
            .client
            .get_latest_blockhash_with_commitment(self.commitment())
            .await
            .context("getLatestBlockhash")?;
        Ok(BlockReference {
            blockhash,
            last_valid_block_height,
        })
    }

    async fn send_transaction(&self, transaction: &VersionedTransaction) -> Result<Signature> {
        let config = RpcSendTransactionConfig {
            preflight_commitment: Some(self.commitment().commitment),
            ..RpcSendTransactionConfig::default()
        };
        let signature = self
            .client
            .send_transaction_with_config(transaction, config)
            .await
            .context("sendTransaction")?;
        Ok(signature)
    }

    async fn confirm_transaction(&self, signature: &Signature, block: &BlockReference) -> Result<Option<String>> {
        loop {
            let status = self
                .client
                .get_signature_status_with_commitment(signature, self.commitment())
                .await
                .with_context(|| format!("getSignatureStatuses {signature}"))?;
            match status {
                Some(Ok(())) => return Ok(None),
                Some(Err(err)) => return Ok(Some(err.to_string())),
                None => {}
            }

            let height = self
                .client
                .get_block_height_with_commitment(self.commitment())
                .await
                .context("getBlockHeight")?;
            if height > block.last_valid_block_height {
                bail!(
                    "signature {signature} not confirmed before block height {}",
                    block.last_valid_block_height
                );
            }
            debug!("[SUBMIT] {signature} pending at height {height}");
            tokio::time::sleep(self.confirm_poll).await;
        }
    }

    async fn get_token_account_ui_balance(&self, account: &Pubkey) -> Result<f64> {
        let amount = self
            .client
            .get_token_account_balance(account)
            .await
            .with_context(|| format!("getTokenAccountBalance {account}"))?;
        amount
            .ui_amount
            .ok_or_else(|| anyhow!("no ui amount for {account}"))
    }

    async fn get_token_supply_ui(&self, mint: &Pubkey) -> Result<f64> {
        let supply = self
            .client
            .get_token_supply(mint)
            .await
            .with_context(|| format!("getTokenSupply {mint}"))?;
        supply
            .ui_amount
            .ok_or_else(|| anyhow!("no ui supply for {mint}"))
    }
}

/* --------------------------------------------------------------------- */
/*  jsonParsed transaction -> TransactionRecord                          */
/* --------------------------------------------------------------------- */

impl TryFrom<EncodedConfirmedTransactionWithStatusMeta> for TransactionRecord {
    type Error = anyhow::Error;

    fn try_from(encoded: EncodedConfirmedTransactionWithStatusMeta) -> Result<Self> {
        let EncodedConfirmedTransactionWithStatusMeta {
            slot,
            transaction,
            block_time,
        } = encoded;

        let (failed, log_messages) = match transaction.meta {
            Some(meta) => (
                meta.err.is_some(),
                Option::<Vec<String>>::from(meta.log_messages).unwrap_or_default(),
            ),
            None => (false, Vec::new()),
        };

        let EncodedTransaction::Json(ui) = transaction.transaction else {
            bail!("transaction at slot {slot} was not returned as json");
        };
        let signature = ui.signatures.first().cloned().unwrap_or_default();

        let (account_keys, instructions) = match ui.message {
            UiMessage::Parsed(message) => {
                let keys = message
                    .account_keys
                    .iter()
                    .map(|key| parse_pubkey(&key.pubkey))
                    .collect::<Result<Vec<_>>>()?;
                let instructions = message
                    .instructions
                    .iter()
                    .map(|ix| instruction_record(ix, &keys))
                    .collect::<Result<Vec<_>>>()?;
                (keys, instructions)
            }
            UiMessage::Raw(message) => {
                let keys = message
                    .account_keys
                    .iter()
                    .map(|key| parse_pubkey(key))
                    .collect::<Result<Vec<_>>>()?;
                let instructions = message
                    .instructions
                    .iter()
                    .map(|ix| compiled_record(ix, &keys))
                    .collect::<Result<Vec<_>>>()?;
                (keys, instructions)
            }
        };

        Ok(Self {
            signature,
            slot,
            block_time,
            account_keys,
            instructions,
            log_messages,
            failed,
        })
    }
}

fn parse_pubkey(raw: &str) -> Result<Pubkey> {
    Pubkey::from_str(raw).with_context(|| format!("invalid pubkey `{raw}`"))
}

fn instruction_record(ix: &UiInstruction, keys: &[Pubkey]) -> Result<InstructionRecord> {
    match ix {
        UiInstruction::Compiled(compiled) => compiled_record(compiled, keys),
        UiInstruction::Parsed(UiParsedInstruction::Parsed(parsed)) => Ok(InstructionRecord {
            program_id: parse_pubkey(&parsed.program_id)?,
            accounts: Vec::new(),
            parsed: Some(ParsedInstructionRecord {
                program: parsed.program.clone(),
                kind: parsed.parsed["type"].as_str().unwrap_or_default().to_string(),
                info: parsed.parsed["info"].clone(),
            }),
        }),
        UiInstruction::Parsed(UiParsedInstruction::PartiallyDecoded(decoded)) => Ok(InstructionRecord {
            program_id: parse_pubkey(&decoded.program_id)?,
            accounts: decoded
                .accounts
                .iter()
                .map(|key| parse_pubkey(key))
                .collect::<Result<Vec<_>>>()?,
            parsed: None,
        }),
    }
}

fn compiled_record(ix: &UiCompiledInstruction, keys: &[Pubkey]) -> Result<InstructionRecord> {
    let key_at = |index: u8| {
        keys.get(index as usize)
            .copied()
            .ok_or_else(|| anyhow!("account index {index} out of range ({} keys)", keys.len()))
    };
    Ok(InstructionRecord {
        program_id: key_at(ix.program_id_index)?,
        accounts: ix.accounts.iter().map(|i| key_at(*i)).collect::<Result<Vec<_>>>()?,
        parsed: None,
    })
}
