use anchor_lang::prelude::*;
use crate::constants::{REWARD_PRICE_NUMERATOR, REWARD_RATE_SCALE};
use crate::errors::ErrorCode;
use crate::math::{bps_share, mul_div_floor};

/// Campaign parameters, written once by `initialize_sale`
#[account]
#[derive(InitSpace)]
pub struct SaleConfig {
    /// Administrator allowed to advance stages and edit the whitelist
    pub admin: Pubkey,
    /// Reward token mint
    pub reward_mint: Pubkey,
    /// Receives `pool_share_bps` of every draw
    pub pool_sink: Pubkey,
    /// Receives the remainder of every draw
    pub treasury_sink: Pubkey,
    /// Undrawn dividend (lamports) at which a claim forces a draw
    pub auto_draw_threshold: u64,
    /// Pool share of each draw in basis points
    pub pool_share_bps: u16,
    /// Reward base units per lamport, 18-decimal fixed point
    pub reward_rate: u128,
    /// Cumulative payment cap per participant (lamports)
    pub max_payment_per_address: u64,
    /// Campaign-wide payment cap (lamports, 0 = uncapped)
    pub target_payment_total: u64,
    /// First slot in which claims are admitted
    pub claim_start_slot: u64,
    /// Last slot in which claims are admitted (0 = open-ended)
    pub claim_end_slot: u64,
    /// Bump seed for the PDA
    pub bump: u8,
    /// Bump seed for the sale authority PDA
    pub authority_bump: u8,
    /// Bump seed for the dividend vault PDA
    pub dividend_vault_bump: u8,
}

impl SaleConfig {
    /// floor(accepted * reward_rate / 1e18)
    pub fn reward_for(&self, accepted: u64) -> Result<u64> {
        mul_div_floor(accepted, self.reward_rate, REWARD_RATE_SCALE)
    }

    /// Lamports per whole reward unit, 18-decimal fixed point
    pub fn reward_price(&self) -> u128 {
        if self.reward_rate == 0 {
            return 0;
        }
        REWARD_PRICE_NUMERATOR / self.reward_rate
    }

    /// Splits a draw into (pool, treasury). Rounding dust goes to the treasury.
    pub fn split_dividend(&self, amount: u64) -> Result<(u64, u64)> {
        let pool_portion = bps_share(amount, self.pool_share_bps)?;
        let treasury_portion = amount
            .checked_sub(pool_portion)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok((pool_portion, treasury_portion))
    }

    /// Campaign payment still open, `None` when the campaign is uncapped
    pub fn remaining_campaign_payment(&self, total_currency_received: u64) -> Option<u64> {
        if self.target_payment_total == 0 {
            return None;
        }
        Some(self.target_payment_total.saturating_sub(total_currency_received))
    }

    /// Largest payment a participant may still make, bounded by both caps
    pub fn allowance(&self, cumulative_paid: u64, total_currency_received: u64) -> u64 {
        let remaining_cap = self.max_payment_per_address.saturating_sub(cumulative_paid);
        match self.remaining_campaign_payment(total_currency_received) {
            Some(remaining_campaign) => remaining_cap.min(remaining_campaign),
            None => remaining_cap,
        }
    }

    pub fn claim_window_open(&self, slot: u64) -> bool {
        slot >= self.claim_start_slot && (self.claim_end_slot == 0 || slot <= self.claim_end_slot)
    }
}
