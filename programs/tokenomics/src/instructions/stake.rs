use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::{STAKE_POOL_SEED, STAKE_POSITION_SEED, STAKE_VAULT_SEED};
use crate::error::TokenomicsError;
use crate::state::{StakePool, StakePosition};

pub fn stake_handler(ctx: Context<Stake>, amount: u64, lock_duration: i64) -> Result<()> {
    let owner = ctx.accounts.owner.key();
    require_keys_eq!(
        ctx.accounts.owner_stake_account.mint,
        ctx.accounts.pool.stake_mint,
        TokenomicsError::InvalidTokenMint
    );
    require_keys_eq!(
        ctx.accounts.owner_stake_account.owner,
        owner,
        TokenomicsError::InvalidTokenAccount
    );

    let now = Clock::get()?.unix_timestamp;
    let pool = &mut ctx.accounts.pool;
    let position = &mut ctx.accounts.position;
    if position.pool == Pubkey::default() {
        position.pool = pool.key();
        position.owner = owner;
        position.bump = ctx.bumps.position;
    }
    position.deposit(pool, amount, lock_duration, now)?;

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.owner_stake_account.to_account_info(),
                to: ctx.accounts.stake_vault.to_account_info(),
                authority: ctx.accounts.owner.to_account_info(),
            },
        ),
        amount,
    )?;

    let position = &ctx.accounts.position;
    emit!(Staked {
        owner,
        amount,
        lock_duration: position.lock_duration,
        unlock_ts: position.unlock_ts()?,
        staked_total: position.staked_amount,
        pool_total: ctx.accounts.pool.total_staked,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct Stake<'info> {
    #[account(mut, seeds = [STAKE_POOL_SEED, pool.stake_mint.as_ref()], bump = pool.bump)]
    pub pool: Account<'info, StakePool>,

    #[account(
        init_if_needed,
        payer = owner,
        space = 8 + StakePosition::SIZE,
        seeds = [STAKE_POSITION_SEED, pool.key().as_ref(), owner.key().as_ref()],
        bump
    )]
    pub position: Account<'info, StakePosition>,

    #[account(
        mut,
        seeds = [STAKE_VAULT_SEED, pool.key().as_ref()],
        bump,
        constraint = stake_vault.mint == pool.stake_mint @ TokenomicsError::InvalidTokenMint,
    )]
    pub stake_vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub owner_stake_account: Account<'info, TokenAccount>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

#[event]
pub struct Staked {
    pub owner: Pubkey,
    pub amount: u64,
    pub lock_duration: i64,
    pub unlock_ts: i64,
    pub staked_total: u64,
    pub pool_total: u64,
}
