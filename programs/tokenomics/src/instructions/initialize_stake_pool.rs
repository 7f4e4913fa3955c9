use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::{REWARD_VAULT_SEED, STAKE_POOL_SEED, STAKE_VAULT_SEED};
use crate::state::{StakeConfig, StakePool};

/// Creates the pool for `stake_mint`. The reward vault is topped up with plain
/// token transfers to its address.
pub fn initialize_stake_pool_handler(
    ctx: Context<InitializeStakePool>,
    config: StakeConfig,
) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    pool.apply_config(&config)?;
    pool.admin = ctx.accounts.admin.key();
    pool.stake_mint = ctx.accounts.stake_mint.key();
    pool.reward_mint = ctx.accounts.reward_mint.key();
    pool.total_staked = 0;
    pool.total_restaked = 0;
    pool.total_rewards_paid = 0;
    pool.bump = ctx.bumps.pool;

    emit!(StakePoolInitialized {
        admin: pool.admin,
        stake_mint: pool.stake_mint,
        reward_mint: pool.reward_mint,
        lock_time_period_min: config.lock_time_period_min,
        lock_time_period_max: config.lock_time_period_max,
        reward_factor: config.reward_factor,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct InitializeStakePool<'info> {
    #[account(
        init,
        payer = admin,
        space = 8 + StakePool::SIZE,
        seeds = [STAKE_POOL_SEED, stake_mint.key().as_ref()],
        bump
    )]
    pub pool: Account<'info, StakePool>,

    #[account(
        init,
        payer = admin,
        token::mint = stake_mint,
        token::authority = pool,
        seeds = [STAKE_VAULT_SEED, pool.key().as_ref()],
        bump
    )]
    pub stake_vault: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = admin,
        token::mint = reward_mint,
        token::authority = pool,
        seeds = [REWARD_VAULT_SEED, pool.key().as_ref()],
        bump
    )]
    pub reward_vault: Account<'info, TokenAccount>,

    pub stake_mint: Account<'info, Mint>,

    pub reward_mint: Account<'info, Mint>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

#[event]
pub struct StakePoolInitialized {
    pub admin: Pubkey,
    pub stake_mint: Pubkey,
    pub reward_mint: Pubkey,
    pub lock_time_period_min: i64,
    pub lock_time_period_max: i64,
    pub reward_factor: u64,
}
