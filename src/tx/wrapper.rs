//! DEX-agnostic helpers for composing transactions.

use solana_sdk::{
    compute_budget::ComputeBudgetInstruction,
    instruction::Instruction,
    pubkey::Pubkey,
    system_instruction,
};

use crate::config::settings::ComputeBudget;

/// Append the compute budget: unit price first, then the unit limit.
pub fn push_compute_budget_ix(ixs: &mut Vec<Instruction>, budget: &ComputeBudget) {
    ixs.push(ComputeBudgetInstruction::set_compute_unit_price(budget.unit_price));
    ixs.push(ComputeBudgetInstruction::set_compute_unit_limit(budget.unit_limit));
}

/// Priority tip: a plain SOL transfer to the relay's tip wallet.
pub fn tip_ix(payer: &Pubkey, tip_account: &Pubkey, lamports: u64) -> Instruction {
    system_instruction::transfer(payer, tip_account, lamports)
}
