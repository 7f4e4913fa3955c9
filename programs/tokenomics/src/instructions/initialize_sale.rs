use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::{PAYMENT_DECIMALS, PAYMENT_VAULT_SEED, SALE_SEED, SALE_VAULT_SEED};
use crate::error::TokenomicsError;
use crate::state::{SaleConfig, SaleKind, SaleState};

pub fn initialize_sale_handler(
    ctx: Context<InitializeSale>,
    kind: SaleKind,
    config: SaleConfig,
) -> Result<()> {
    require!(
        ctx.accounts.token_mint.key() != ctx.accounts.payment_mint.key(),
        TokenomicsError::InvalidConfig
    );
    require!(
        ctx.accounts.payment_mint.decimals == PAYMENT_DECIMALS,
        TokenomicsError::InvalidTokenMint
    );

    let sale = &mut ctx.accounts.sale;
    sale.apply_config(&config)?;
    sale.admin = ctx.accounts.admin.key();
    sale.kind = kind;
    sale.token_mint = ctx.accounts.token_mint.key();
    sale.payment_mint = ctx.accounts.payment_mint.key();
    sale.token_decimals = ctx.accounts.token_mint.decimals;
    sale.closed_at = 0;
    sale.funded = 0;
    sale.total_reserved = 0;
    sale.total_released = 0;
    sale.payment_collected = 0;
    sale.payment_withdrawn = 0;
    sale.participant_count = 0;
    sale.bump = ctx.bumps.sale;

    emit!(SaleInitialized {
        kind: kind as u8,
        admin: sale.admin,
        token_mint: sale.token_mint,
        payment_mint: sale.payment_mint,
        price: config.price,
        first_release_ts: config.schedule.first_release_ts,
        release_count: config.schedule.release_count,
        close_unlock_bps: config.close_policy.unlock_bps,
    });

    Ok(())
}

#[derive(Accounts)]
#[instruction(kind: SaleKind)]
pub struct InitializeSale<'info> {
    #[account(
        init,
        payer = admin,
        space = 8 + SaleState::SIZE,
        seeds = [SALE_SEED, kind.seed().as_ref()],
        bump
    )]
    pub sale: Box<Account<'info, SaleState>>,

    #[account(
        init,
        payer = admin,
        token::mint = token_mint,
        token::authority = sale,
        seeds = [SALE_VAULT_SEED, sale.key().as_ref()],
        bump
    )]
    pub sale_vault: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = admin,
        token::mint = payment_mint,
        token::authority = sale,
        seeds = [PAYMENT_VAULT_SEED, sale.key().as_ref()],
        bump
    )]
    pub payment_vault: Account<'info, TokenAccount>,

    pub token_mint: Account<'info, Mint>,

    pub payment_mint: Account<'info, Mint>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

#[event]
pub struct SaleInitialized {
    pub kind: u8,
    pub admin: Pubkey,
    pub token_mint: Pubkey,
    pub payment_mint: Pubkey,
    pub price: u64,
    pub first_release_ts: i64,
    pub release_count: u16,
    pub close_unlock_bps: u16,
}
