use anchor_lang::prelude::*;
use crate::states::Stage;

/// Event emitted when the sale is initialized
#[event]
pub struct SaleInitialized {
    /// Sale config PDA
    pub config: Pubkey,
    /// Administrator of the sale
    pub admin: Pubkey,
    /// Reward token mint
    pub reward_mint: Pubkey,
    /// Pool sink address
    pub pool_sink: Pubkey,
    /// Treasury sink address
    pub treasury_sink: Pubkey,
    /// Undrawn dividend level that forces a draw
    pub auto_draw_threshold: u64,
    /// Pool share of each draw in basis points
    pub pool_share_bps: u16,
    /// Reward units per currency unit (1e18 fixed point)
    pub reward_rate: u128,
    /// Cumulative payment cap per participant
    pub max_payment_per_address: u64,
    /// Campaign-wide payment cap (0 = uncapped)
    pub target_payment_total: u64,
    /// Timestamp of initialization
    pub timestamp: i64,
}

/// Event emitted when the sale moves to its next stage
#[event]
pub struct StageAdvanced {
    pub from: Stage,
    pub to: Stage,
    pub timestamp: i64,
}

/// Event emitted when addresses are appended to the whitelist
#[event]
pub struct WhitelistUpdated {
    /// Number of addresses submitted
    pub submitted: u32,
    /// Number of addresses that were not already present
    pub added: u32,
    /// Whitelist entries in existence after the update
    pub total: u32,
    pub timestamp: i64,
}

/// Event emitted for every accepted claim
#[event]
pub struct RewardClaimed {
    /// Participant's wallet address
    pub participant: Pubkey,
    /// Amount attached to the claim request
    pub paid_amount: u64,
    /// Amount collected into the dividend vault
    pub accepted: u64,
    /// Amount left with the participant
    pub excess_returned: u64,
    /// Reward tokens transferred
    pub reward: u64,
    /// Participant's cumulative accepted payment
    pub cumulative_paid: u64,
    /// Stage the claim was admitted in
    pub stage: Stage,
    /// Whether the claim triggered a dividend draw
    pub auto_drawn: bool,
    pub timestamp: i64,
}

/// Event emitted when the dividend is split between the sinks
#[event]
pub struct DividendDrawn {
    /// Total dividend drawn
    pub amount: u64,
    /// Pool sink address
    pub pool_sink: Pubkey,
    /// Amount sent to the pool sink
    pub pool_portion: u64,
    /// Treasury sink address
    pub treasury_sink: Pubkey,
    /// Amount sent to the treasury sink
    pub treasury_portion: u64,
    /// Lifetime dividend drawn after this draw
    pub total_dividend_drawn: u64,
    /// Draw sequence number
    pub draw_count: u32,
    pub timestamp: i64,
}
