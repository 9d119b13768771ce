use anchor_lang::prelude::*;
use anchor_spl::token::TokenAccount;
use crate::constants::{
    SALE_CONFIG_SEED, SALE_LEDGER_SEED, WHITELIST_SEED, PARTICIPANT_RECORD_SEED, REWARD_VAULT_SEED,
};
use crate::states::{ParticipantRecord, SaleConfig, SaleLedger, Stage, WhitelistEntry};

/// Read-only view of the sale for a single participant
#[derive(Accounts)]
pub struct Snapshot<'info> {
    /// CHECK: any address may be queried, it is only used as a seed
    pub participant: UncheckedAccount<'info>,

    #[account(
        seeds = [SALE_CONFIG_SEED],
        bump = sale_config.bump
    )]
    pub sale_config: Box<Account<'info, SaleConfig>>,

    #[account(
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

    /// CHECK: record PDA for the participant, empty until the first accepted claim
    #[account(
        seeds = [PARTICIPANT_RECORD_SEED, participant.key().as_ref()],
        bump
    )]
    pub participant_record: UncheckedAccount<'info>,

    #[account(
        seeds = [REWARD_VAULT_SEED],
        bump
    )]
    pub reward_vault: Box<Account<'info, TokenAccount>>,
}

/// Response structure for the sale snapshot
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct UiData {
    /// Current lifecycle stage
    pub stage: Stage,
    /// Currency collected since the last draw (in lamports)
    pub undrawn_dividend: u64,
    /// Total currency accepted (in lamports)
    pub total_currency_received: u64,
    /// Total reward tokens paid out
    pub total_reward_disbursed: u64,
    /// Total currency sent to the sinks (in lamports)
    pub total_dividend_drawn: u64,
    /// Reward units per lamport, 18-decimal fixed point
    pub reward_rate: u128,
    /// Lamports per reward unit, 18-decimal fixed point
    pub reward_price: u128,
    /// Reward tokens left in the reward vault
    pub reward_balance: u64,
    /// Whether the participant is on the whitelist
    pub whitelisted: bool,
    /// Whether the current slot is inside the claim window
    pub claim_window_open: bool,
    /// Whether a claim by the participant would pass the stage gate right now
    pub can_claim: bool,
    /// Currency already accepted from the participant (in lamports)
    pub cumulative_paid: u64,
    /// Per-address cap still open to the participant (in lamports)
    pub remaining_cap: u64,
    /// Campaign payment still open, `None` when uncapped (in lamports)
    pub remaining_campaign_payment: Option<u64>,
    /// Reward the participant would receive by paying their full allowance now
    pub max_obtainable_reward: u64,
}

impl<'info> Snapshot<'info> {
    pub fn handle(ctx: Context<Snapshot>) -> Result<UiData> {
        let participant = ctx.accounts.participant.key();
        let record = ctx.accounts.participant_record.to_account_info();
        let cumulative_paid =
            read_cumulative_paid(record.owner, ctx.program_id, &record.try_borrow_data()?)?;

        let entry = ctx.accounts.whitelist_entry.to_account_info();
        let whitelisted =
            entry.owner == ctx.program_id && WhitelistEntry::is_listed(&entry.try_borrow_data()?);
        let slot = Clock::get()?.slot;

        let ui_data = build_snapshot(
            &ctx.accounts.sale_config,
            &ctx.accounts.sale_ledger,
            whitelisted,
            cumulative_paid,
            ctx.accounts.reward_vault.amount,
            ctx.accounts.sale_config.claim_window_open(slot),
        )?;

        msg!("Snapshot for participant: {}", participant);
        msg!("Stage: {:?}", ui_data.stage);
        msg!("Undrawn dividend: {} lamports", ui_data.undrawn_dividend);
        msg!("Cumulative paid: {} lamports", ui_data.cumulative_paid);
        msg!("Max obtainable reward: {} units", ui_data.max_obtainable_reward);

        Ok(ui_data)
    }
}

/// Derives every field from the same helpers `claim` and `draw_dividend` use
/// Currency already accepted from the participant, read from the raw record
/// account. An empty account means no claim yet; anything else must be a
/// record owned by this program.
pub fn read_cumulative_paid(owner: &Pubkey, program_id: &Pubkey, data: &[u8]) -> Result<u64> {
    if data.is_empty() {
        return Ok(0);
    }
    require_keys_eq!(
        *owner,
        *program_id,
        anchor_lang::error::ErrorCode::AccountOwnedByWrongProgram
    );

    let record = ParticipantRecord::try_deserialize(&mut &data[..])?;
    Ok(record.cumulative_paid)
}

pub fn build_snapshot(
    sale_config: &SaleConfig,
    sale_ledger: &SaleLedger,
    whitelisted: bool,
    cumulative_paid: u64,
    reward_balance: u64,
    claim_window_open: bool,
) -> Result<UiData> {
    let allowance = sale_config.allowance(cumulative_paid, sale_ledger.total_currency_received);
    let max_obtainable_reward = sale_config.reward_for(allowance)?.min(reward_balance);

    Ok(UiData {
        stage: sale_ledger.stage,
        undrawn_dividend: sale_ledger.undrawn_dividend,
        total_currency_received: sale_ledger.total_currency_received,
        total_reward_disbursed: sale_ledger.total_reward_disbursed,
        total_dividend_drawn: sale_ledger.total_dividend_drawn,
        reward_rate: sale_config.reward_rate,
        reward_price: sale_config.reward_price(),
        reward_balance,
        whitelisted,
        claim_window_open,
        can_claim: claim_window_open && sale_ledger.stage.admits(whitelisted),
        cumulative_paid,
        remaining_cap: sale_config.max_payment_per_address.saturating_sub(cumulative_paid),
        remaining_campaign_payment: sale_config
            .remaining_campaign_payment(sale_ledger.total_currency_received),
        max_obtainable_reward,
    })
}
