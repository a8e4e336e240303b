//! Sign, send and confirm one swap transaction.
//!
//! `Built -> Signed -> Submitted -> {Confirmed | Rejected | TimedOut}`.
//! Every path ends in a [`SwapResult`]; nothing here returns an error.

pub mod result;

pub use result::{SwapOutcome, SwapResult};

use log::{error, info, warn};
use solana_sdk::{
    instruction::Instruction,
    message::{v0, VersionedMessage},
    signature::{Keypair, Signer},
    transaction::VersionedTransaction,
};

use crate::{error::SwapError, rpc::LedgerRpc};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Settled {
    Confirmed,
    Rejected(String),
    TimedOut(String),
}

/// Compile `instructions` into a v0 transaction paid and signed by `payer`,
/// send it once and wait for confirmation.
pub async fn submit_swap<R>(rpc: &R, payer: &Keypair, instructions: &[Instruction]) -> SwapResult
where
    R: LedgerRpc + ?Sized,
{
    let mut signature = String::new();
    match drive(rpc, payer, instructions, &mut signature).await {
        Ok(Settled::Confirmed) => {
            info!("[SUBMIT] {signature} confirmed");
            SwapResult::success(signature)
        }
        Ok(Settled::Rejected(err)) => {
            warn!("[SUBMIT] {signature} rejected: {err}");
            SwapResult::failed(signature)
        }
        Ok(Settled::TimedOut(cause)) => {
            error!("[SUBMIT] {signature} not confirmed: {cause}");
            SwapResult::error(signature, cause)
        }
        Err(e) => {
            error!("[SUBMIT] aborted: {e}");
            SwapResult::error(signature, e)
        }
    }
}

async fn drive<R>(
    rpc: &R,
    payer: &Keypair,
    instructions: &[Instruction],
    signature_slot: &mut String,
) -> Result<Settled, SwapError>
where
    R: LedgerRpc + ?Sized,
{
    /* -------- Built ------------------------------------------------ */
    let block = rpc
        .get_latest_blockhash()
        .await
        .map_err(|e| SwapError::Rpc(format!("{e:#}")))?;
    let message = v0::Message::try_compile(&payer.pubkey(), instructions, &[], block.blockhash)
        .map_err(|e| SwapError::Compile(e.to_string()))?;
    info!(
        "[SUBMIT] built {} instructions against {}",
        instructions.len(),
        block.blockhash
    );

    /* -------- Signed ----------------------------------------------- */
    let transaction = VersionedTransaction::try_new(VersionedMessage::V0(message), &[payer])
        .map_err(|e| SwapError::Signing(e.to_string()))?;
    info!("[SUBMIT] signed by {}", payer.pubkey());

    /* -------- Submitted -------------------------------------------- */
    let signature = rpc
        .send_transaction(&transaction)
        .await
        .map_err(|e| SwapError::Submission(format!("{e:#}")))?;
    *signature_slot = signature.to_string();
    info!("[SUBMIT] sent {signature}");

    /* -------- Confirmed / Rejected / TimedOut ---------------------- */
    Ok(match rpc.confirm_transaction(&signature, &block).await {
        Ok(None) => Settled::Confirmed,
        Ok(Some(err)) => Settled::Rejected(err),
        Err(e) => Settled::TimedOut(format!("{e:#}")),
    })
}
