use anchor_lang::prelude::*;

use crate::constants::{PARTICIPANT_SEED, SALE_SEED};
use crate::error::TokenomicsError;
use crate::state::{Participant, SaleState};

/// Registers `wallet` in the sale or updates its buy bounds. Reservations
/// already made are kept.
pub fn add_participant_handler(
    ctx: Context<AddParticipant>,
    wallet: Pubkey,
    min_buy: u64,
    max_buy: u64,
) -> Result<()> {
    require!(wallet != Pubkey::default(), TokenomicsError::InvalidConfig);

    let sale = &mut ctx.accounts.sale;
    require_keys_eq!(ctx.accounts.admin.key(), sale.admin, TokenomicsError::Unauthorized);

    let participant = &mut ctx.accounts.participant;
    participant.set_bounds(min_buy, max_buy)?;

    let is_new = participant.sale == Pubkey::default();
    if is_new {
        participant.sale = sale.key();
        participant.wallet = wallet;
        participant.bump = ctx.bumps.participant;
        sale.participant_count = sale
            .participant_count
            .checked_add(1)
            .ok_or(TokenomicsError::MathOverflow)?;
    }

    emit!(ParticipantUpdated {
        kind: sale.kind as u8,
        wallet,
        min_buy,
        max_buy,
        is_new,
    });

    Ok(())
}

#[derive(Accounts)]
#[instruction(wallet: Pubkey)]
pub struct AddParticipant<'info> {
    #[account(mut, seeds = [SALE_SEED, sale.kind.seed().as_ref()], bump = sale.bump)]
    pub sale: Box<Account<'info, SaleState>>,

    #[account(
        init_if_needed,
        payer = admin,
        space = 8 + Participant::SIZE,
        seeds = [PARTICIPANT_SEED, sale.key().as_ref(), wallet.as_ref()],
        bump
    )]
    pub participant: Account<'info, Participant>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[event]
pub struct ParticipantUpdated {
    pub kind: u8,
    pub wallet: Pubkey,
    pub min_buy: u64,
    pub max_buy: u64,
    pub is_new: bool,
}
