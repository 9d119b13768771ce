use anchor_lang::prelude::*;
use crate::errors::ErrorCode;

/// Per-participant claim totals, created on the first accepted claim
#[account]
#[derive(InitSpace)]
pub struct ParticipantRecord {
    /// The participant's public key
    pub participant: Pubkey,
    /// Total currency accepted from this participant (in lamports)
    pub cumulative_paid: u64,
    /// Total reward tokens paid out (in base units)
    pub cumulative_reward: u64,
    /// Number of accepted claims
    pub claim_count: u32,
    /// Timestamp of first accepted claim
    pub first_claim_timestamp: i64,
    /// Timestamp of last accepted claim
    pub last_claim_timestamp: i64,
    /// Bump seed for the PDA
    pub bump: u8,
}

impl ParticipantRecord {
    /// Whether the record was just created by `init_if_needed`
    pub fn is_new(&self) -> bool {
        self.claim_count == 0
    }

    /// Remaining currency this participant may still contribute
    pub fn remaining_cap(&self, max_payment_per_address: u64) -> u64 {
        max_payment_per_address.saturating_sub(self.cumulative_paid)
    }

    /// Updates the record with an accepted claim
    pub fn add_claim(&mut self, accepted: u64, reward: u64, now: i64) -> Result<()> {
        self.cumulative_paid = self.cumulative_paid
            .checked_add(accepted)
            .ok_or(ErrorCode::MathOverflow)?;

        self.cumulative_reward = self.cumulative_reward
            .checked_add(reward)
            .ok_or(ErrorCode::MathOverflow)?;

        if self.claim_count == 0 {
            self.first_claim_timestamp = now;
        }
        self.last_claim_timestamp = now;

        self.claim_count = self.claim_count
            .checked_add(1)
            .ok_or(ErrorCode::MathOverflow)?;

        Ok(())
    }
}
