use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::{PARTICIPANT_SEED, SALE_SEED, SALE_VAULT_SEED};
use crate::error::TokenomicsError;
use crate::state::{Participant, SaleState};

/// Pays the caller everything unlocked for them so far.
pub fn release_tokens_handler(ctx: Context<ReleaseTokens>) -> Result<()> {
    let accounts = ctx.accounts;
    pay_release(
        &mut accounts.sale,
        &mut accounts.participant,
        &accounts.sale_vault,
        &accounts.destination,
        &accounts.token_program,
    )?;
    Ok(())
}

/// Transfers `unlocked(now) - released` from the pool to `destination`.
/// Zero owed is a no-op.
pub(crate) fn pay_release<'info>(
    sale: &mut Account<'info, SaleState>,
    participant: &mut Account<'info, Participant>,
    sale_vault: &Account<'info, TokenAccount>,
    destination: &Account<'info, TokenAccount>,
    token_program: &Program<'info, Token>,
) -> Result<u64> {
    require_keys_eq!(destination.mint, sale.token_mint, TokenomicsError::InvalidTokenMint);
    require_keys_eq!(
        destination.owner,
        participant.wallet,
        TokenomicsError::InvalidTokenAccount
    );

    let now = Clock::get()?.unix_timestamp;
    let owed = sale.releasable(participant, now)?;
    if owed == 0 {
        msg!("nothing releasable for {}", participant.wallet);
        return Ok(0);
    }
    require!(sale_vault.amount >= owed, TokenomicsError::InsufficientPoolBalance);

    let kind_seed = sale.kind.seed();
    let signer_seeds: &[&[&[u8]]] = &[&[SALE_SEED, &kind_seed, &[sale.bump]]];
    token::transfer(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            Transfer {
                from: sale_vault.to_account_info(),
                to: destination.to_account_info(),
                authority: sale.to_account_info(),
            },
            signer_seeds,
        ),
        owed,
    )?;

    sale.record_release(participant, owed)?;

    emit!(SaleTokensReleased {
        kind: sale.kind as u8,
        wallet: participant.wallet,
        amount: owed,
        released_total: participant.released_amount,
        reserved: participant.reserved_amount,
    });

    Ok(owed)
}

#[derive(Accounts)]
pub struct ReleaseTokens<'info> {
    #[account(mut, seeds = [SALE_SEED, sale.kind.seed().as_ref()], bump = sale.bump)]
    pub sale: Box<Account<'info, SaleState>>,

    #[account(
        mut,
        seeds = [PARTICIPANT_SEED, sale.key().as_ref(), wallet.key().as_ref()],
        bump = participant.bump,
        constraint = participant.sale == sale.key() @ TokenomicsError::ParticipantMismatch,
    )]
    pub participant: Account<'info, Participant>,

    #[account(
        mut,
        seeds = [SALE_VAULT_SEED, sale.key().as_ref()],
        bump,
        constraint = sale_vault.mint == sale.token_mint @ TokenomicsError::InvalidTokenMint,
    )]
    pub sale_vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub destination: Account<'info, TokenAccount>,

    pub wallet: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct SaleTokensReleased {
    pub kind: u8,
    pub wallet: Pubkey,
    pub amount: u64,
    pub released_total: u64,
    pub reserved: u64,
}
