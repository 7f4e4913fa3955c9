use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::{PARTICIPANT_SEED, PAYMENT_VAULT_SEED, SALE_SEED};
use crate::error::TokenomicsError;
use crate::state::{Participant, SaleState};

/// Buys `amount` whole tokens at the sale price. Tokens stay in the pool and
/// are paid out by `release_tokens`.
pub fn lock_tokens_handler(ctx: Context<LockTokens>, amount: u64) -> Result<()> {
    let buyer = ctx.accounts.buyer.key();
    let payment_account = &ctx.accounts.buyer_payment_account;
    require_keys_eq!(
        payment_account.mint,
        ctx.accounts.sale.payment_mint,
        TokenomicsError::InvalidTokenMint
    );
    require_keys_eq!(payment_account.owner, buyer, TokenomicsError::InvalidTokenAccount);
    require_keys_eq!(
        ctx.accounts.participant.wallet,
        buyer,
        TokenomicsError::ParticipantMismatch
    );

    let available = payment_account.amount;
    let sale = &mut ctx.accounts.sale;
    let participant = &mut ctx.accounts.participant;
    // Checks every limit and books the purchase; nothing is written on error.
    let quote = sale.lock(participant, amount, available)?;

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.buyer_payment_account.to_account_info(),
                to: ctx.accounts.payment_vault.to_account_info(),
                authority: ctx.accounts.buyer.to_account_info(),
            },
        ),
        quote.cost,
    )?;

    emit!(TokensLocked {
        kind: ctx.accounts.sale.kind as u8,
        wallet: buyer,
        tokens: quote.tokens,
        reserved: quote.reserved,
        cost: quote.cost,
        bought_total: ctx.accounts.participant.bought,
        sale_reserved_total: ctx.accounts.sale.total_reserved,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct LockTokens<'info> {
    #[account(mut, seeds = [SALE_SEED, sale.kind.seed().as_ref()], bump = sale.bump)]
    pub sale: Box<Account<'info, SaleState>>,

    #[account(
        mut,
        seeds = [PARTICIPANT_SEED, sale.key().as_ref(), buyer.key().as_ref()],
        bump = participant.bump,
        constraint = participant.sale == sale.key() @ TokenomicsError::ParticipantMismatch,
    )]
    pub participant: Account<'info, Participant>,

    #[account(
        mut,
        seeds = [PAYMENT_VAULT_SEED, sale.key().as_ref()],
        bump,
        constraint = payment_vault.mint == sale.payment_mint @ TokenomicsError::InvalidTokenMint,
    )]
    pub payment_vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub buyer_payment_account: Account<'info, TokenAccount>,

    pub buyer: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct TokensLocked {
    pub kind: u8,
    pub wallet: Pubkey,
    pub tokens: u64,
    pub reserved: u64,
    pub cost: u64,
    pub bought_total: u64,
    pub sale_reserved_total: u64,
}
