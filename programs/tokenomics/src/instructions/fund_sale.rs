use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::{SALE_SEED, SALE_VAULT_SEED};
use crate::error::TokenomicsError;
use crate::state::SaleState;

/// Deposits sale tokens into the pool participants lock against.
pub fn fund_sale_handler(ctx: Context<FundSale>, amount: u64) -> Result<()> {
    require!(amount > 0, TokenomicsError::InvalidAmount);

    let sale = &ctx.accounts.sale;
    require_keys_eq!(ctx.accounts.admin.key(), sale.admin, TokenomicsError::Unauthorized);
    require_keys_eq!(
        ctx.accounts.admin_token_account.mint,
        sale.token_mint,
        TokenomicsError::InvalidTokenMint
    );
    require_keys_eq!(
        ctx.accounts.admin_token_account.owner,
        ctx.accounts.admin.key(),
        TokenomicsError::InvalidTokenAccount
    );

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.admin_token_account.to_account_info(),
                to: ctx.accounts.sale_vault.to_account_info(),
                authority: ctx.accounts.admin.to_account_info(),
            },
        ),
        amount,
    )?;

    let sale = &mut ctx.accounts.sale;
    sale.record_funding(amount)?;

    ctx.accounts.sale_vault.reload()?;
    emit!(SaleFunded {
        kind: ctx.accounts.sale.kind as u8,
        amount,
        funded: ctx.accounts.sale.funded,
        vault_balance: ctx.accounts.sale_vault.amount,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct FundSale<'info> {
    #[account(mut, seeds = [SALE_SEED, sale.kind.seed().as_ref()], bump = sale.bump)]
    pub sale: Box<Account<'info, SaleState>>,

    #[account(
        mut,
        seeds = [SALE_VAULT_SEED, sale.key().as_ref()],
        bump,
        constraint = sale_vault.mint == sale.token_mint @ TokenomicsError::InvalidTokenMint,
    )]
    pub sale_vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub admin_token_account: Account<'info, TokenAccount>,

    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct SaleFunded {
    pub kind: u8,
    pub amount: u64,
    pub funded: u64,
    pub vault_balance: u64,
}
