use anchor_lang::prelude::*;

declare_id!("Btzgo3zcPXZnbLzs5ezcyHfM1pqE9mmBGJUGGe4L2agc");

pub mod instructions;
pub mod errors;
pub mod constants;
pub mod states;
pub mod events;
pub mod math;

pub use instructions::*;
pub use events::*;

#[program]
pub mod staged_sale {
    use super::*;

    pub fn initialize_sale(ctx: Context<InitializeSale>, params: InitializeSaleParams) -> Result<()> {
        InitializeSale::handle(ctx, params)
    }

    pub fn advance_stage(ctx: Context<AdvanceStage>) -> Result<()> {
        AdvanceStage::handle(ctx)
    }

    pub fn add_addresses<'info>(
        ctx: Context<'_, '_, 'info, 'info, AddAddresses<'info>>,
        addresses: Vec<Pubkey>,
    ) -> Result<()> {
        AddAddresses::handle(ctx, addresses)
    }

    pub fn claim(ctx: Context<Claim>, params: ClaimParams) -> Result<ClaimResult> {
        Claim::handle(ctx, params)
    }

    pub fn draw_dividend(ctx: Context<DrawDividend>) -> Result<()> {
        DrawDividend::handle(ctx)
    }

    pub fn snapshot(ctx: Context<Snapshot>) -> Result<UiData> {
        Snapshot::handle(ctx)
    }
}
