//! Ordered instruction list for one AMM v4 swap.
//!
//! Order is fixed: compute unit price, compute unit limit, tip transfer,
//! destination ATA creation (only when the wallet lacks one), swap.

use std::collections::HashMap;

use log::debug;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};

use super::{
    ata::destination_account,
    wrapper::{push_compute_budget_ix, tip_ix},
};
use crate::{
    config::settings::ComputeBudget,
    dex::{
        raydium::{swap_base_in, PoolKeys},
        SwapDirection,
    },
    error::BuildError,
};

/// No slippage floor is applied here.
pub const MIN_AMOUNT_OUT: u64 = 0;

#[derive(Clone, Debug)]
pub struct SwapRequest<'a> {
    pub keys: &'a PoolKeys,
    pub owner: Pubkey,
    pub direction: SwapDirection,
    /// Raw units of the source mint.
    pub amount_in: u64,
    pub tip_lamports: u64,
    pub tip_account: Pubkey,
    pub budget: ComputeBudget,
    /// Mint -> token account already held by `owner`.
    pub held_accounts: &'a HashMap<Pubkey, Pubkey>,
}

pub fn build_swap_instructions(req: &SwapRequest<'_>) -> Result<Vec<Instruction>, BuildError> {
    if req.amount_in == 0 {
        return Err(BuildError::ZeroAmountIn);
    }

    let (source_mint, dest_mint) = req.direction.resolve(req.keys.base_mint, req.keys.quote_mint);
    let source = *req
        .held_accounts
        .get(&source_mint)
        .ok_or(BuildError::MissingSourceAccount(source_mint))?;
    let destination = destination_account(&req.owner, &dest_mint, req.held_accounts);

    let mut ixs = Vec::with_capacity(5);
    push_compute_budget_ix(&mut ixs, &req.budget);
    ixs.push(tip_ix(&req.owner, &req.tip_account, req.tip_lamports));
    ixs.extend(destination.create_ix);
    ixs.push(swap_base_in(
        req.keys,
        &source,
        &destination.address,
        &req.owner,
        req.amount_in,
        MIN_AMOUNT_OUT,
    ));

    debug!(
        "[SWAP] {:?} {} of {} on {} ({} instructions)",
        req.direction,
        req.amount_in,
        source_mint,
        req.keys.id,
        ixs.len()
    );
    Ok(ixs)
}
