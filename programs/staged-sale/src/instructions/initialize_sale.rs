use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};
use crate::errors::ErrorCode;
use crate::constants::{
    SALE_CONFIG_SEED, SALE_LEDGER_SEED, SALE_AUTHORITY_SEED,
    DIVIDEND_VAULT_SEED, REWARD_VAULT_SEED, MAX_POOL_SHARE_BPS,
};
use crate::states::{SaleConfig, SaleLedger};

#[derive(Accounts)]
pub struct InitializeSale<'info> {
    /// Admin who creates and later operates the sale
    #[account(mut)]
    pub admin: Signer<'info>,

    /// Sale configuration PDA
    #[account(
        init,
        payer = admin,
        space = SaleConfig::DISCRIMINATOR.len() + SaleConfig::INIT_SPACE,
        seeds = [SALE_CONFIG_SEED],
        bump
    )]
    pub sale_config: Account<'info, SaleConfig>,

    /// Sale ledger PDA
    #[account(
        init,
        payer = admin,
        space = SaleLedger::DISCRIMINATOR.len() + SaleLedger::INIT_SPACE,
        seeds = [SALE_LEDGER_SEED],
        bump
    )]
    pub sale_ledger: Account<'info, SaleLedger>,

    /// CHECK: PDA that owns the reward vault, holds no data
    #[account(
        seeds = [SALE_AUTHORITY_SEED],
        bump
    )]
    pub sale_authority: UncheckedAccount<'info>,

    /// Collects accepted currency until it is drawn
    #[account(
        mut,
        seeds = [DIVIDEND_VAULT_SEED],
        bump
    )]
    pub dividend_vault: SystemAccount<'info>,

    /// Holds the reward supply paid out by claims
    #[account(
        init,
        payer = admin,
        seeds = [REWARD_VAULT_SEED],
        bump,
        token::mint = reward_mint,
        token::authority = sale_authority
    )]
    pub reward_vault: Box<Account<'info, TokenAccount>>,

    pub reward_mint: Box<Account<'info, Mint>>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct InitializeSaleParams {
    /// Receives `pool_share_bps` of each draw
    pub pool_sink: Pubkey,
    /// Receives the remainder of each draw
    pub treasury_sink: Pubkey,
    /// Undrawn dividend (lamports) that forces a draw
    pub auto_draw_threshold: u64,
    /// Pool share in basis points (e.g., 8000 = 80%)
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
}

impl<'info> InitializeSale<'info> {
    pub fn handle(ctx: Context<InitializeSale>, params: InitializeSaleParams) -> Result<()> {
        msg!("Initializing staged sale");

        validate_params(&params)?;

        fund_dividend_vault_reserve(&ctx)?;

        let config_key = ctx.accounts.sale_config.key();
        let admin = ctx.accounts.admin.key();
        let reward_mint = ctx.accounts.reward_mint.key();

        let sale_config = &mut ctx.accounts.sale_config;
        sale_config.admin = admin;
        sale_config.reward_mint = reward_mint;
        sale_config.pool_sink = params.pool_sink;
        sale_config.treasury_sink = params.treasury_sink;
        sale_config.auto_draw_threshold = params.auto_draw_threshold;
        sale_config.pool_share_bps = params.pool_share_bps;
        sale_config.reward_rate = params.reward_rate;
        sale_config.max_payment_per_address = params.max_payment_per_address;
        sale_config.target_payment_total = params.target_payment_total;
        sale_config.claim_start_slot = params.claim_start_slot;
        sale_config.claim_end_slot = params.claim_end_slot;
        sale_config.bump = ctx.bumps.sale_config;
        sale_config.authority_bump = ctx.bumps.sale_authority;
        sale_config.dividend_vault_bump = ctx.bumps.dividend_vault;

        ctx.accounts.sale_ledger.set_inner(SaleLedger::new(ctx.bumps.sale_ledger));

        msg!("Sale initialized successfully");
        msg!("Reward mint: {}", reward_mint);
        msg!("Pool sink: {} ({} bps)", params.pool_sink, params.pool_share_bps);
        msg!("Treasury sink: {}", params.treasury_sink);
        msg!("Auto draw threshold: {} lamports", params.auto_draw_threshold);
        msg!("Max payment per address: {} lamports", params.max_payment_per_address);
        msg!("Target payment total: {} lamports", params.target_payment_total);

        emit!(crate::events::SaleInitialized {
            config: config_key,
            admin,
            reward_mint,
            pool_sink: params.pool_sink,
            treasury_sink: params.treasury_sink,
            auto_draw_threshold: params.auto_draw_threshold,
            pool_share_bps: params.pool_share_bps,
            reward_rate: params.reward_rate,
            max_payment_per_address: params.max_payment_per_address,
            target_payment_total: params.target_payment_total,
            timestamp: Clock::get()?.unix_timestamp,
        });

        Ok(())
    }
}

fn validate_params(params: &InitializeSaleParams) -> Result<()> {
    require!(
        params.pool_share_bps <= MAX_POOL_SHARE_BPS,
        ErrorCode::InvalidPoolShare
    );

    require!(params.reward_rate > 0, ErrorCode::InvalidRewardRate);

    require!(
        params.max_payment_per_address > 0,
        ErrorCode::InvalidPaymentCap
    );

    require!(
        params.auto_draw_threshold > 0,
        ErrorCode::InvalidThreshold
    );

    require!(
        params.pool_sink != Pubkey::default() && params.treasury_sink != Pubkey::default(),
        ErrorCode::InvalidSink
    );

    require!(
        params.claim_end_slot == 0 || params.claim_end_slot >= params.claim_start_slot,
        ErrorCode::InvalidClaimWindow
    );

    Ok(())
}

/// Tops the dividend vault up to its rent-exempt minimum so small claims can land in it.
/// The reserve is never part of a draw.
fn fund_dividend_vault_reserve(ctx: &Context<InitializeSale>) -> Result<()> {
    let reserve = ctx.accounts.rent.minimum_balance(0);
    let shortfall = reserve.saturating_sub(ctx.accounts.dividend_vault.lamports());
    if shortfall == 0 {
        return Ok(());
    }

    anchor_lang::system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            anchor_lang::system_program::Transfer {
                from: ctx.accounts.admin.to_account_info(),
                to: ctx.accounts.dividend_vault.to_account_info(),
            },
        ),
        shortfall,
    )?;

    msg!("Funded dividend vault reserve: {} lamports", shortfall);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::REWARD_RATE_SCALE;

    fn valid_params() -> InitializeSaleParams {
        InitializeSaleParams {
            pool_sink: Pubkey::new_unique(),
            treasury_sink: Pubkey::new_unique(),
            auto_draw_threshold: 100_000_000_000,
            pool_share_bps: 8000,
            reward_rate: REWARD_RATE_SCALE / 2,
            max_payment_per_address: 1_000_000_000,
            target_payment_total: 5_000_000_000_000,
            claim_start_slot: 0,
            claim_end_slot: 999_999_999,
        }
    }

    fn assert_rejected(params: InitializeSaleParams, expected: ErrorCode) {
        let err = validate_params(&params).unwrap_err();
        assert_eq!(err, Error::from(expected));
    }

    #[test]
    fn test_valid_params_accepted() {
        assert!(validate_params(&valid_params()).is_ok());
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert_rejected(InitializeSaleParams { pool_share_bps: 10_001, ..valid_params() }, ErrorCode::InvalidPoolShare);
        assert_rejected(InitializeSaleParams { reward_rate: 0, ..valid_params() }, ErrorCode::InvalidRewardRate);
        assert_rejected(InitializeSaleParams { max_payment_per_address: 0, ..valid_params() }, ErrorCode::InvalidPaymentCap);
        assert_rejected(InitializeSaleParams { auto_draw_threshold: 0, ..valid_params() }, ErrorCode::InvalidThreshold);
        assert_rejected(InitializeSaleParams { treasury_sink: Pubkey::default(), ..valid_params() }, ErrorCode::InvalidSink);
        assert_rejected(
            InitializeSaleParams { claim_start_slot: 10, claim_end_slot: 9, ..valid_params() },
            ErrorCode::InvalidClaimWindow,
        );
    }
}
