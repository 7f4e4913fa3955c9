use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::{PARTICIPANT_SEED, SALE_SEED, SALE_VAULT_SEED};
use crate::error::TokenomicsError;
use crate::instructions::release_tokens::pay_release;
use crate::state::{Participant, SaleState};

/// Admin-driven payout of a participant's unlocked tokens to their own account.
pub fn release_tokens_for_handler(ctx: Context<ReleaseTokensFor>, wallet: Pubkey) -> Result<()> {
    let accounts = ctx.accounts;
    require_keys_eq!(accounts.admin.key(), accounts.sale.admin, TokenomicsError::Unauthorized);
    require_keys_eq!(
        accounts.participant.wallet,
        wallet,
        TokenomicsError::ParticipantMismatch
    );

    pay_release(
        &mut accounts.sale,
        &mut accounts.participant,
        &accounts.sale_vault,
        &accounts.destination,
        &accounts.token_program,
    )?;
    Ok(())
}

#[derive(Accounts)]
#[instruction(wallet: Pubkey)]
pub struct ReleaseTokensFor<'info> {
    #[account(mut, seeds = [SALE_SEED, sale.kind.seed().as_ref()], bump = sale.bump)]
    pub sale: Box<Account<'info, SaleState>>,

    #[account(
        mut,
        seeds = [PARTICIPANT_SEED, sale.key().as_ref(), wallet.as_ref()],
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

    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
}
