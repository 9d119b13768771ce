use anchor_lang::prelude::*;
use anchor_lang::system_program::{
    allocate, assign, create_account, transfer, Allocate, Assign, CreateAccount, Transfer,
};
use crate::errors::ErrorCode;
use crate::constants::{SALE_CONFIG_SEED, SALE_LEDGER_SEED, WHITELIST_SEED};
use crate::states::{pending_additions, SaleConfig, SaleLedger, WhitelistEntry};

/// Remaining accounts: one writable `WhitelistEntry` PDA per submitted
/// address, in the same order as `addresses`.
#[derive(Accounts)]
pub struct AddAddresses<'info> {
    #[account(mut)]
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

    pub system_program: Program<'info, System>,
}

impl<'info> AddAddresses<'info> {
    pub fn handle(
        ctx: Context<'_, '_, 'info, 'info, AddAddresses<'info>>,
        addresses: Vec<Pubkey>,
    ) -> Result<()> {
        let entries = ctx.remaining_accounts;
        require!(
            entries.len() == addresses.len(),
            ErrorCode::WhitelistAccountMismatch
        );

        let mut bumps: Vec<u8> = Vec::with_capacity(addresses.len());
        let mut listed: Vec<bool> = Vec::with_capacity(addresses.len());
        for (address, entry) in addresses.iter().zip(entries.iter()) {
            let (expected, bump) = WhitelistEntry::find_address(address, ctx.program_id);
            require_keys_eq!(*entry.key, expected, ErrorCode::WhitelistAccountMismatch);

            bumps.push(bump);
            listed.push(
                entry.owner == ctx.program_id && WhitelistEntry::is_listed(&entry.try_borrow_data()?),
            );
        }

        let pending = pending_additions(&addresses, &listed);
        let now = Clock::get()?.unix_timestamp;

        for &index in pending.iter() {
            let address = addresses[index];
            let entry = &entries[index];
            let seeds: &[&[u8]] = &[WHITELIST_SEED, address.as_ref(), &[bumps[index]]];

            create_entry_account(
                &ctx.accounts.admin.to_account_info(),
                entry,
                &ctx.accounts.system_program.to_account_info(),
                seeds,
                ctx.program_id,
            )?;

            let record = WhitelistEntry {
                address,
                added_timestamp: now,
                bump: bumps[index],
            };
            let mut data = entry.try_borrow_mut_data()?;
            record.try_serialize(&mut &mut data[..])?;
        }

        let added = pending.len() as u32;
        let total = ctx.accounts.sale_ledger.record_whitelisted(added)?;

        msg!(
            "Whitelist updated: {} submitted, {} added, {} total",
            addresses.len(),
            added,
            total
        );

        emit!(crate::events::WhitelistUpdated {
            submitted: addresses.len() as u32,
            added,
            total,
            timestamp: now,
        });

        Ok(())
    }
}

/// Creates the entry PDA owned by this program. An address that already
/// holds lamports is topped up, allocated and assigned instead.
fn create_entry_account<'info>(
    payer: &AccountInfo<'info>,
    entry: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<()> {
    let signer_seeds = &[seeds];
    let space = WhitelistEntry::SPACE;
    let required = Rent::get()?.minimum_balance(space);

    if entry.lamports() == 0 {
        return create_account(
            CpiContext::new_with_signer(
                system_program.clone(),
                CreateAccount {
                    from: payer.clone(),
                    to: entry.clone(),
                },
                signer_seeds,
            ),
            required,
            space as u64,
            program_id,
        );
    }

    let shortfall = required.saturating_sub(entry.lamports());
    if shortfall > 0 {
        transfer(
            CpiContext::new(
                system_program.clone(),
                Transfer {
                    from: payer.clone(),
                    to: entry.clone(),
                },
            ),
            shortfall,
        )?;
    }

    allocate(
        CpiContext::new_with_signer(
            system_program.clone(),
            Allocate {
                account_to_allocate: entry.clone(),
            },
            signer_seeds,
        ),
        space as u64,
    )?;

    assign(
        CpiContext::new_with_signer(
            system_program.clone(),
            Assign {
                account_to_assign: entry.clone(),
            },
            signer_seeds,
        ),
        program_id,
    )
}
