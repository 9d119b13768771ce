use anchor_lang::prelude::*;
use crate::errors::ErrorCode;
use crate::constants::{SALE_CONFIG_SEED, SALE_LEDGER_SEED, DIVIDEND_VAULT_SEED};
use crate::states::{SaleConfig, SaleLedger};

/// Permissionless sweep of the undrawn dividend to the two sinks
#[derive(Accounts)]
pub struct DrawDividend<'info> {
    pub caller: Signer<'info>,

    #[account(
        seeds = [SALE_CONFIG_SEED],
        bump = sale_config.bump
    )]
    pub sale_config: Account<'info, SaleConfig>,

    #[account(
        mut,
        seeds = [SALE_LEDGER_SEED],
        bump = sale_ledger.bump
    )]
    pub sale_ledger: Account<'info, SaleLedger>,

    #[account(
        mut,
        seeds = [DIVIDEND_VAULT_SEED],
        bump = sale_config.dividend_vault_bump
    )]
    pub dividend_vault: SystemAccount<'info>,

    /// CHECK: pinned to the configured pool sink
    #[account(
        mut,
        address = sale_config.pool_sink @ ErrorCode::InvalidSink
    )]
    pub pool_sink: UncheckedAccount<'info>,

    /// CHECK: pinned to the configured treasury sink
    #[account(
        mut,
        address = sale_config.treasury_sink @ ErrorCode::InvalidSink
    )]
    pub treasury_sink: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Amounts moved by a single draw
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DividendSplit {
    pub amount: u64,
    pub pool_portion: u64,
    pub treasury_portion: u64,
}

impl<'info> DrawDividend<'info> {
    pub fn handle(ctx: Context<DrawDividend>) -> Result<()> {
        msg!("Drawing dividend, caller: {}", ctx.accounts.caller.key());

        let accounts = &mut *ctx.accounts;
        execute_draw(
            &accounts.sale_config,
            &mut accounts.sale_ledger,
            &accounts.dividend_vault.to_account_info(),
            &accounts.pool_sink.to_account_info(),
            &accounts.treasury_sink.to_account_info(),
            &accounts.system_program.to_account_info(),
        )?;

        Ok(())
    }
}

/// Zeroes the accumulator and computes the split. `None` when there is nothing to draw.
pub fn plan_draw(
    sale_config: &SaleConfig,
    sale_ledger: &mut SaleLedger,
    now: i64,
) -> Result<Option<DividendSplit>> {
    let amount = sale_ledger.take_undrawn(now)?;
    if amount == 0 {
        return Ok(None);
    }

    let (pool_portion, treasury_portion) = sale_config.split_dividend(amount)?;
    Ok(Some(DividendSplit {
        amount,
        pool_portion,
        treasury_portion,
    }))
}

/// Draws the undrawn dividend into the sinks. Shared by `draw_dividend` and the
/// auto draw at the end of `claim`. Returns the amount drawn.
pub fn execute_draw<'info>(
    sale_config: &SaleConfig,
    sale_ledger: &mut SaleLedger,
    dividend_vault: &AccountInfo<'info>,
    pool_sink: &AccountInfo<'info>,
    treasury_sink: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
) -> Result<u64> {
    let now = Clock::get()?.unix_timestamp;

    let split = match plan_draw(sale_config, sale_ledger, now)? {
        Some(split) => split,
        None => {
            msg!("No undrawn dividend, nothing to do");
            return Ok(0);
        }
    };

    pay_dividend(
        sale_config,
        sale_ledger,
        &split,
        dividend_vault,
        pool_sink,
        treasury_sink,
        system_program,
        now,
    )?;

    Ok(split.amount)
}

/// Moves a planned split out of the dividend vault. The ledger must already
/// reflect the draw.
#[allow(clippy::too_many_arguments)]
pub fn pay_dividend<'info>(
    sale_config: &SaleConfig,
    sale_ledger: &SaleLedger,
    split: &DividendSplit,
    dividend_vault: &AccountInfo<'info>,
    pool_sink: &AccountInfo<'info>,
    treasury_sink: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    now: i64,
) -> Result<()> {
    msg!("Dividend to draw: {} lamports", split.amount);
    msg!("Pool portion: {} lamports ({} bps)", split.pool_portion, sale_config.pool_share_bps);
    msg!("Treasury portion: {} lamports", split.treasury_portion);

    let bump = [sale_config.dividend_vault_bump];
    let vault_seeds: &[&[u8]] = &[DIVIDEND_VAULT_SEED, &bump];
    let signer_seeds = &[vault_seeds];

    transfer_to_sink(dividend_vault, pool_sink, system_program, split.pool_portion, signer_seeds)?;
    transfer_to_sink(dividend_vault, treasury_sink, system_program, split.treasury_portion, signer_seeds)?;

    emit!(crate::events::DividendDrawn {
        amount: split.amount,
        pool_sink: *pool_sink.key,
        pool_portion: split.pool_portion,
        treasury_sink: *treasury_sink.key,
        treasury_portion: split.treasury_portion,
        total_dividend_drawn: sale_ledger.total_dividend_drawn,
        draw_count: sale_ledger.draw_count,
        timestamp: now,
    });

    Ok(())
}

fn transfer_to_sink<'info>(
    dividend_vault: &AccountInfo<'info>,
    sink: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    amount: u64,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    anchor_lang::system_program::transfer(
        CpiContext::new_with_signer(
            system_program.clone(),
            anchor_lang::system_program::Transfer {
                from: dividend_vault.clone(),
                to: sink.clone(),
            },
            signer_seeds,
        ),
        amount,
    )
    .map_err(|err| {
        msg!("Sink transfer of {} lamports to {} failed: {:?}", amount, sink.key, err);
        error!(ErrorCode::SinkTransferFailed)
    })
}
