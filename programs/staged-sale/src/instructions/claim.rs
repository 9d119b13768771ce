use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};
use crate::errors::ErrorCode;
use crate::constants::{
    SALE_CONFIG_SEED, SALE_LEDGER_SEED, WHITELIST_SEED, PARTICIPANT_RECORD_SEED,
    SALE_AUTHORITY_SEED, DIVIDEND_VAULT_SEED, REWARD_VAULT_SEED,
};
use crate::states::{ParticipantRecord, SaleConfig, SaleLedger, WhitelistEntry};
use super::draw_dividend::{pay_dividend, plan_draw, DividendSplit};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct ClaimParams {
    /// Lamports offered by the participant. Anything above the remaining cap is never collected.
    pub paid_amount: u64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct ClaimResult {
    /// Lamports collected into the dividend vault
    pub accepted: u64,
    /// Reward tokens transferred to the participant
    pub reward: u64,
    /// Lamports left with the participant
    pub excess_returned: u64,
    /// Whether this claim drew the dividend
    pub auto_drawn: bool,
}

impl ClaimResult {
    pub fn from_quote(quote: &ClaimQuote, auto_drawn: bool) -> Self {
        Self {
            accepted: quote.accepted,
            reward: quote.reward,
            excess_returned: quote.excess,
            auto_drawn,
        }
    }
}

/// Outcome of pricing a claim against the current state, before anything moves
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClaimQuote {
    pub accepted: u64,
    pub reward: u64,
    pub excess: u64,
}

#[derive(Accounts)]
pub struct Claim<'info> {
    #[account(mut)]
    pub participant: Signer<'info>,

    #[account(
        seeds = [SALE_CONFIG_SEED],
        bump = sale_config.bump
    )]
    pub sale_config: Box<Account<'info, SaleConfig>>,

    #[account(
        mut,
        seeds = [SALE_LEDGER_SEED],
        bump = sale_ledger.bump
    )]
    pub sale_ledger: Box<Account<'info, SaleLedger>>,

    /// CHECK: whitelist entry PDA for the participant, may not exist
    #[account(
        seeds = [WHITELIST_SEED, participant.key().as_ref()],
        bump
    )]
    pub whitelist_entry: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = participant,
        space = ParticipantRecord::DISCRIMINATOR.len() + ParticipantRecord::INIT_SPACE,
        seeds = [PARTICIPANT_RECORD_SEED, participant.key().as_ref()],
        bump
    )]
    pub participant_record: Box<Account<'info, ParticipantRecord>>,

    /// CHECK: PDA signing for the reward vault, holds no data
    #[account(
        seeds = [SALE_AUTHORITY_SEED],
        bump = sale_config.authority_bump
    )]
    pub sale_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [DIVIDEND_VAULT_SEED],
        bump = sale_config.dividend_vault_bump
    )]
    pub dividend_vault: SystemAccount<'info>,

    #[account(
        mut,
        seeds = [REWARD_VAULT_SEED],
        bump,
        token::mint = sale_config.reward_mint,
        token::authority = sale_authority
    )]
    pub reward_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = sale_config.reward_mint,
        token::authority = participant
    )]
    pub participant_reward_account: Box<Account<'info, TokenAccount>>,

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

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

impl<'info> Claim<'info> {
    pub fn handle(ctx: Context<Claim>, params: ClaimParams) -> Result<ClaimResult> {
        let participant = ctx.accounts.participant.key();
        msg!("Processing claim from participant: {}", participant);
        msg!("Paid amount: {} lamports", params.paid_amount);

        let clock = Clock::get()?;
        require!(
            ctx.accounts.sale_config.claim_window_open(clock.slot),
            ErrorCode::OutsideClaimWindow
        );

        let entry = ctx.accounts.whitelist_entry.to_account_info();
        let whitelisted =
            entry.owner == ctx.program_id && WhitelistEntry::is_listed(&entry.try_borrow_data()?);
        let quote = quote_claim(
            &ctx.accounts.sale_config,
            &ctx.accounts.sale_ledger,
            whitelisted,
            ctx.accounts.participant_record.cumulative_paid,
            params.paid_amount,
            ctx.accounts.reward_vault.amount,
        )?;

        msg!("Accepted: {} lamports, excess left with participant: {}", quote.accepted, quote.excess);
        msg!("Reward: {} units", quote.reward);

        // State first, transfers after
        {
            let participant_record = &mut ctx.accounts.participant_record;
            if participant_record.is_new() {
                participant_record.participant = participant;
                participant_record.bump = ctx.bumps.participant_record;
            }
        }
        commit_claim(
            &mut ctx.accounts.sale_ledger,
            &mut ctx.accounts.participant_record,
            &quote,
            clock.unix_timestamp,
        )?;

        collect_currency(&ctx, quote.accepted)?;
        pay_reward(&ctx, quote.reward)?;

        let auto_draw = finish_claim(
            &ctx.accounts.sale_config,
            &mut ctx.accounts.sale_ledger,
            clock.unix_timestamp,
        )?;
        if let Some(split) = auto_draw.as_ref() {
            msg!("Undrawn dividend reached auto draw threshold");
            let accounts = &ctx.accounts;
            pay_dividend(
                &accounts.sale_config,
                &accounts.sale_ledger,
                split,
                &accounts.dividend_vault.to_account_info(),
                &accounts.pool_sink.to_account_info(),
                &accounts.treasury_sink.to_account_info(),
                &accounts.system_program.to_account_info(),
                clock.unix_timestamp,
            )?;
        }
        let auto_drawn = auto_draw.is_some();

        msg!("Claim completed successfully!");

        let participant_record = &ctx.accounts.participant_record;
        emit!(crate::events::RewardClaimed {
            participant,
            paid_amount: params.paid_amount,
            accepted: quote.accepted,
            excess_returned: quote.excess,
            reward: quote.reward,
            cumulative_paid: participant_record.cumulative_paid,
            stage: ctx.accounts.sale_ledger.stage,
            auto_drawn,
            timestamp: clock.unix_timestamp,
        });

        Ok(ClaimResult::from_quote(&quote, auto_drawn))
    }
}

/// Prices a claim: admission, cap, reward and graceful partial payout
/// when the reward vault runs short.
pub fn quote_claim(
    sale_config: &SaleConfig,
    sale_ledger: &SaleLedger,
    whitelisted: bool,
    cumulative_paid: u64,
    paid_amount: u64,
    reward_balance: u64,
) -> Result<ClaimQuote> {
    require!(
        sale_ledger.stage.admits(whitelisted),
        ErrorCode::WrongStageOrNotWhitelisted
    );

    let allowance = sale_config.allowance(cumulative_paid, sale_ledger.total_currency_received);
    let accepted = paid_amount.min(allowance);
    require!(accepted > 0, ErrorCode::CapExhausted);

    let reward = sale_config.reward_for(accepted)?.min(reward_balance);

    Ok(ClaimQuote {
        accepted,
        reward,
        excess: paid_amount - accepted,
    })
}

/// Books a quoted claim into the participant record and the sale ledger
pub fn commit_claim(
    sale_ledger: &mut SaleLedger,
    participant_record: &mut ParticipantRecord,
    quote: &ClaimQuote,
    now: i64,
) -> Result<()> {
    let new_participant = participant_record.is_new();
    participant_record.add_claim(quote.accepted, quote.reward, now)?;
    sale_ledger.record_claim(quote.accepted, quote.reward, new_participant)
}

/// Runs the auto draw once the undrawn dividend reaches the threshold.
/// Returns the split to pay out, or `None` when no draw is due.
pub fn finish_claim(
    sale_config: &SaleConfig,
    sale_ledger: &mut SaleLedger,
    now: i64,
) -> Result<Option<DividendSplit>> {
    if !sale_ledger.should_auto_draw(sale_config.auto_draw_threshold) {
        return Ok(None);
    }
    plan_draw(sale_config, sale_ledger, now)
}

fn collect_currency(ctx: &Context<Claim>, amount: u64) -> Result<()> {
    anchor_lang::system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            anchor_lang::system_program::Transfer {
                from: ctx.accounts.participant.to_account_info(),
                to: ctx.accounts.dividend_vault.to_account_info(),
            },
        ),
        amount,
    )
    .map_err(|err| {
        msg!("Currency collection of {} lamports failed: {:?}", amount, err);
        error!(ErrorCode::CurrencyTransferFailed)
    })
}

fn pay_reward(ctx: &Context<Claim>, amount: u64) -> Result<()> {
    if amount == 0 {
        msg!("Reward vault empty or reward rounds to zero, nothing to pay");
        return Ok(());
    }

    anchor_spl::token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            anchor_spl::token::Transfer {
                from: ctx.accounts.reward_vault.to_account_info(),
                to: ctx.accounts.participant_reward_account.to_account_info(),
                authority: ctx.accounts.sale_authority.to_account_info(),
            },
            &[&[
                SALE_AUTHORITY_SEED,
                &[ctx.accounts.sale_config.authority_bump]
            ]]
        ),
        amount,
    )
    .map_err(|err| {
        msg!("Reward transfer of {} units failed: {:?}", amount, err);
        error!(ErrorCode::RewardTransferFailed)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states::fixtures::{create_test_config, ONE_SOL};
    use crate::states::Stage;

    fn public_sale_ledger() -> SaleLedger {
        let mut ledger = SaleLedger::new(255);
        ledger.stage = Stage::PublicSale;
        ledger
    }

    fn fresh_record() -> ParticipantRecord {
        ParticipantRecord {
            participant: Pubkey::new_unique(),
            cumulative_paid: 0,
            cumulative_reward: 0,
            claim_count: 0,
            first_claim_timestamp: 0,
            last_claim_timestamp: 0,
            bump: 255,
        }
    }

    fn expect_error(result: Result<ClaimQuote>, expected: ErrorCode) {
        match result {
            Ok(quote) => panic!("expected {:?}, got {:?}", expected, quote),
            Err(err) => assert_eq!(err, Error::from(expected)),
        }
    }

    #[test]
    fn test_overpayment_is_capped_and_excess_returned() {
        let config = create_test_config();
        let ledger = public_sale_ledger();

        let quote = quote_claim(&config, &ledger, false, 0, 10 * ONE_SOL, u64::MAX).unwrap();

        assert_eq!(quote.accepted, ONE_SOL);
        assert_eq!(quote.reward, ONE_SOL / 2);
        assert_eq!(quote.excess, 9 * ONE_SOL);
    }

    #[test]
    fn test_cap_exhausted_after_full_payment() {
        let config = create_test_config();
        let mut ledger = public_sale_ledger();
        let mut record = fresh_record();

        let quote = quote_claim(&config, &ledger, false, 0, ONE_SOL, u64::MAX).unwrap();
        commit_claim(&mut ledger, &mut record, &quote, 1).unwrap();
        assert_eq!(record.cumulative_paid, config.max_payment_per_address);

        expect_error(
            quote_claim(&config, &ledger, false, record.cumulative_paid, 1, u64::MAX),
            ErrorCode::CapExhausted,
        );
    }

    #[test]
    fn test_zero_payment_is_cap_exhausted() {
        let config = create_test_config();
        let ledger = public_sale_ledger();
        expect_error(quote_claim(&config, &ledger, false, 0, 0, u64::MAX), ErrorCode::CapExhausted);
    }

    #[test]
    fn test_campaign_target_bounds_acceptance() {
        let mut config = create_test_config();
        config.target_payment_total = 3 * ONE_SOL / 2;
        let mut ledger = public_sale_ledger();

        let first = quote_claim(&config, &ledger, false, 0, ONE_SOL, u64::MAX).unwrap();
        commit_claim(&mut ledger, &mut fresh_record(), &first, 1).unwrap();

        let second = quote_claim(&config, &ledger, false, 0, ONE_SOL, u64::MAX).unwrap();
        assert_eq!(second.accepted, ONE_SOL / 2);
        assert_eq!(second.excess, ONE_SOL / 2);
        commit_claim(&mut ledger, &mut fresh_record(), &second, 2).unwrap();

        expect_error(
            quote_claim(&config, &ledger, false, 0, ONE_SOL, u64::MAX),
            ErrorCode::CapExhausted,
        );
    }

    #[test]
    fn test_whitelist_gating_in_private_sale() {
        let config = create_test_config();
        let mut ledger = SaleLedger::new(255);
        ledger.advance_stage().unwrap();
        assert_eq!(ledger.stage, Stage::PrivateSale);

        let participant = Pubkey::new_unique();
        let mut entry_data: Vec<u8> = Vec::new();

        expect_error(
            quote_claim(&config, &ledger, WhitelistEntry::is_listed(&entry_data), 0, ONE_SOL, u64::MAX),
            ErrorCode::WrongStageOrNotWhitelisted,
        );

        WhitelistEntry { address: participant, added_timestamp: 1, bump: 255 }
            .try_serialize(&mut entry_data)
            .unwrap();
        let quote = quote_claim(&config, &ledger, WhitelistEntry::is_listed(&entry_data), 0, ONE_SOL, u64::MAX).unwrap();
        assert_eq!(quote.accepted, ONE_SOL);
    }

    #[test]
    fn test_prepare_and_finish_reject_everyone() {
        let config = create_test_config();
        let mut ledger = SaleLedger::new(255);
        expect_error(
            quote_claim(&config, &ledger, true, 0, ONE_SOL, u64::MAX),
            ErrorCode::WrongStageOrNotWhitelisted,
        );

        ledger.stage = Stage::Finish;
        expect_error(
            quote_claim(&config, &ledger, true, 0, ONE_SOL, u64::MAX),
            ErrorCode::WrongStageOrNotWhitelisted,
        );
    }

    #[test]
    fn test_partial_payout_when_reward_vault_short() {
        let config = create_test_config();
        let ledger = public_sale_ledger();

        let quote = quote_claim(&config, &ledger, false, 0, ONE_SOL, 1_000).unwrap();
        assert_eq!(quote.accepted, ONE_SOL);
        assert_eq!(quote.reward, 1_000);

        let empty = quote_claim(&config, &ledger, false, 0, ONE_SOL, 0).unwrap();
        assert_eq!(empty.accepted, ONE_SOL);
        assert_eq!(empty.reward, 0);
    }

    #[test]
    fn test_two_claims_trigger_auto_draw() {
        let mut config = create_test_config();
        config.max_payment_per_address = 10 * ONE_SOL;
        let mut ledger = public_sale_ledger();
        let mut alice = fresh_record();
        let mut bob = fresh_record();

        let first = quote_claim(&config, &ledger, false, alice.cumulative_paid, 3 * ONE_SOL, u64::MAX).unwrap();
        commit_claim(&mut ledger, &mut alice, &first, 1).unwrap();
        let first_draw = finish_claim(&config, &mut ledger, 1).unwrap();
        assert_eq!(first_draw, None);
        assert!(!ClaimResult::from_quote(&first, first_draw.is_some()).auto_drawn);
        assert_eq!(ledger.undrawn_dividend, 3 * ONE_SOL);

        let second = quote_claim(&config, &ledger, false, bob.cumulative_paid, 2 * ONE_SOL, u64::MAX).unwrap();
        commit_claim(&mut ledger, &mut bob, &second, 2).unwrap();
        let second_draw = finish_claim(&config, &mut ledger, 2).unwrap();

        let result = ClaimResult::from_quote(&second, second_draw.is_some());
        assert_eq!(
            result,
            ClaimResult { accepted: 2 * ONE_SOL, reward: ONE_SOL, excess_returned: 0, auto_drawn: true }
        );

        let split = second_draw.unwrap();
        assert_eq!(split.amount, 5 * ONE_SOL);
        assert_eq!(split.pool_portion, 4 * ONE_SOL);
        assert_eq!(split.treasury_portion, ONE_SOL);
        assert_eq!(ledger.undrawn_dividend, 0);
        assert_eq!(ledger.draw_count, 1);
        assert_eq!(ledger.last_draw_timestamp, 2);
        assert_eq!(ledger.total_currency_received, 5 * ONE_SOL);
        assert_eq!(ledger.participant_count, 2);

        assert_eq!(finish_claim(&config, &mut ledger, 3).unwrap(), None);
    }

    #[test]
    fn test_invariants_hold_across_many_claims() {
        let mut config = create_test_config();
        config.auto_draw_threshold = 3 * ONE_SOL;
        let mut ledger = public_sale_ledger();
        let mut records: Vec<ParticipantRecord> = (0..4).map(|_| fresh_record()).collect();

        let payments = [ONE_SOL / 3, 2 * ONE_SOL, ONE_SOL / 2, 7, ONE_SOL, ONE_SOL / 4];
        for (round, paid) in payments.iter().enumerate() {
            for record in records.iter_mut() {
                match quote_claim(&config, &ledger, false, record.cumulative_paid, *paid, u64::MAX) {
                    Ok(quote) => {
                        commit_claim(&mut ledger, record, &quote, round as i64).unwrap();
                        finish_claim(&config, &mut ledger, round as i64).unwrap();
                    }
                    Err(err) => assert_eq!(err, Error::from(ErrorCode::CapExhausted)),
                }

                assert!(record.cumulative_paid <= config.max_payment_per_address);
                assert!(ledger.undrawn_dividend <= ledger.total_currency_received);
            }
        }

        let total_paid: u64 = records.iter().map(|record| record.cumulative_paid).sum();
        assert_eq!(total_paid, ledger.total_currency_received);
        assert_eq!(
            ledger.total_dividend_drawn + ledger.undrawn_dividend,
            ledger.total_currency_received
        );
    }
}
