use anchor_lang::prelude::*;
use crate::constants::WHITELIST_SEED;

/// Marks a single address as admitted to the private sale.
/// The account existing is the membership; entries are never closed.
#[account]
#[derive(InitSpace)]
pub struct WhitelistEntry {
    /// Whitelisted address
    pub address: Pubkey,
    /// Timestamp the address was added
    pub added_timestamp: i64,
    /// Bump seed for the PDA
    pub bump: u8,
}

impl WhitelistEntry {
    pub const SPACE: usize = WhitelistEntry::DISCRIMINATOR.len() + WhitelistEntry::INIT_SPACE;

    /// PDA holding the entry for `address`
    pub fn find_address(address: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[WHITELIST_SEED, address.as_ref()], program_id)
    }

    /// Whether `data` holds an initialized entry
    pub fn is_listed(data: &[u8]) -> bool {
        data.len() >= WhitelistEntry::DISCRIMINATOR.len()
            && &data[..WhitelistEntry::DISCRIMINATOR.len()] == WhitelistEntry::DISCRIMINATOR
    }
}

/// Indexes of `addresses` that need an entry created: not yet listed and
/// first occurrence within the batch
pub fn pending_additions(addresses: &[Pubkey], listed: &[bool]) -> Vec<usize> {
    let mut pending: Vec<usize> = Vec::new();
    for (index, address) in addresses.iter().enumerate() {
        let already_listed = listed.get(index).copied().unwrap_or(false);
        let repeated = pending.iter().any(|&seen| addresses[seen] == *address);
        if !already_listed && !repeated {
            pending.push(index);
        }
    }
    pending
}
