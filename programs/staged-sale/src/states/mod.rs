pub mod stage;
pub mod sale_config;
pub mod sale_ledger;
pub mod participant_record;
pub mod whitelist_entry;

pub use stage::*;
pub use sale_config::*;
pub use sale_ledger::*;
pub use participant_record::*;
pub use whitelist_entry::*;

#[cfg(test)]
pub(crate) mod fixtures {
    use anchor_lang::prelude::*;
    use crate::constants::REWARD_RATE_SCALE;
    use super::SaleConfig;

    pub const ONE_SOL: u64 = 1_000_000_000;

    /// 0.5 reward per lamport, 1 SOL per-address cap, 5 SOL auto draw at 80/20
    pub fn create_test_config() -> SaleConfig {
        SaleConfig {
            admin: Pubkey::new_unique(),
            reward_mint: Pubkey::new_unique(),
            pool_sink: Pubkey::new_unique(),
            treasury_sink: Pubkey::new_unique(),
            auto_draw_threshold: 5 * ONE_SOL,
            pool_share_bps: 8000,
            reward_rate: REWARD_RATE_SCALE / 2,
            max_payment_per_address: ONE_SOL,
            target_payment_total: 0,
            claim_start_slot: 0,
            claim_end_slot: 0,
            bump: 255,
            authority_bump: 254,
            dividend_vault_bump: 253,
        }
    }
}
