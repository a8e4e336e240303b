//! Wallet token accounts: which ones the owner already holds, and the
//! associated account (plus idempotent creation) for mints it does not.

use std::collections::HashMap;

use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account_idempotent,
};

use crate::state::TokenAccountRecord;

/// Mint -> token account the owner already holds. The associated account
/// wins when several accounts hold the same mint.
pub fn held_accounts(owner: &Pubkey, accounts: &[(Pubkey, TokenAccountRecord)]) -> HashMap<Pubkey, Pubkey> {
    let mut held = HashMap::new();
    for (address, account) in accounts {
        let is_ata = *address == get_associated_token_address(owner, &account.mint);
        if is_ata || !held.contains_key(&account.mint) {
            held.insert(account.mint, *address);
        }
    }
    held
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DestinationAccount {
    pub address: Pubkey,
    /// Present when the owner holds no account for the mint yet.
    pub create_ix: Option<Instruction>,
}

/// Existing account for `mint`, or the owner's ATA with an idempotent
/// create instruction paid by the owner.
pub fn destination_account(owner: &Pubkey, mint: &Pubkey, held: &HashMap<Pubkey, Pubkey>) -> DestinationAccount {
    match held.get(mint) {
        Some(address) => DestinationAccount {
            address: *address,
            create_ix: None,
        },
        None => DestinationAccount {
            address: get_associated_token_address(owner, mint),
            create_ix: Some(create_associated_token_account_idempotent(
                owner,
                owner,
                mint,
                &spl_token::ID,
            )),
        },
    }
}
