use anchor_lang::prelude::*;
use crate::errors::ErrorCode;
use crate::constants::{SALE_CONFIG_SEED, SALE_LEDGER_SEED};
use crate::states::{SaleConfig, SaleLedger};

#[derive(Accounts)]
pub struct AdvanceStage<'info> {
    pub admin: Signer<'info>,

    #[account(
        seeds = [SALE_CONFIG_SEED],
        bump = sale_config.bump,
        has_one = admin @ ErrorCode::Unauthorized
    )]
    pub sale_config: Account<'info, SaleConfig>,

    #[account(
        mut,
        seeds = [SALE_LEDGER_SEED],
        bump = sale_ledger.bump
    )]
    pub sale_ledger: Account<'info, SaleLedger>,
}

impl<'info> AdvanceStage<'info> {
    pub fn handle(ctx: Context<AdvanceStage>) -> Result<()> {
        let sale_ledger = &mut ctx.accounts.sale_ledger;

        let from = sale_ledger.advance_stage()?;
        let to = sale_ledger.stage;

        msg!("Sale stage advanced: {:?} -> {:?}", from, to);

        emit!(crate::events::StageAdvanced {
            from,
            to,
            timestamp: Clock::get()?.unix_timestamp,
        });

        Ok(())
    }
}
