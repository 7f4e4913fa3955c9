use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::{PAYMENT_VAULT_SEED, SALE_SEED};
use crate::error::TokenomicsError;
use crate::state::SaleState;

/// Withdraws collected payment tokens to the admin.
pub fn pull_payment_handler(ctx: Context<PullPayment>, amount: u64) -> Result<()> {
    let sale = &ctx.accounts.sale;
    require_keys_eq!(ctx.accounts.admin.key(), sale.admin, TokenomicsError::Unauthorized);
    require_keys_eq!(
        ctx.accounts.admin_destination.mint,
        sale.payment_mint,
        TokenomicsError::InvalidTokenMint
    );
    require_keys_eq!(
        ctx.accounts.admin_destination.owner,
        ctx.accounts.admin.key(),
        TokenomicsError::InvalidTokenAccount
    );
    require!(amount > 0, TokenomicsError::InvalidAmount);
    require!(
        ctx.accounts.payment_vault.amount >= amount,
        TokenomicsError::InsufficientPoolBalance
    );

    let kind_seed = sale.kind.seed();
    let signer_seeds: &[&[&[u8]]] = &[&[SALE_SEED, &kind_seed, &[sale.bump]]];
    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.payment_vault.to_account_info(),
                to: ctx.accounts.admin_destination.to_account_info(),
                authority: ctx.accounts.sale.to_account_info(),
            },
            signer_seeds,
        ),
        amount,
    )?;

    let vault_balance = ctx.accounts.payment_vault.amount;
    let sale = &mut ctx.accounts.sale;
    sale.record_payment_withdrawal(amount, vault_balance)?;

    emit!(PaymentPulled {
        kind: sale.kind as u8,
        admin: sale.admin,
        amount,
        withdrawn_total: sale.payment_withdrawn,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct PullPayment<'info> {
    #[account(mut, seeds = [SALE_SEED, sale.kind.seed().as_ref()], bump = sale.bump)]
    pub sale: Box<Account<'info, SaleState>>,

    #[account(
        mut,
        seeds = [PAYMENT_VAULT_SEED, sale.key().as_ref()],
        bump,
        constraint = payment_vault.mint == sale.payment_mint @ TokenomicsError::InvalidTokenMint,
    )]
    pub payment_vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub admin_destination: Account<'info, TokenAccount>,

    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct PaymentPulled {
    pub kind: u8,
    pub admin: Pubkey,
    pub amount: u64,
    pub withdrawn_total: u64,
}
