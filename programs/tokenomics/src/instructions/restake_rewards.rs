use anchor_lang::prelude::*;
use anchor_spl::token::TokenAccount;

use crate::constants::{REWARD_VAULT_SEED, STAKE_POOL_SEED, STAKE_POSITION_SEED};
use crate::error::TokenomicsError;
use crate::state::{StakePool, StakePosition};

/// Compounds the earned reward into the position. The reward stays in the
/// reward vault, reserved for this position until `unstake` pays it out.
pub fn restake_rewards_handler(ctx: Context<RestakeRewards>) -> Result<()> {
    let pool = &ctx.accounts.pool;
    let now = Clock::get()?.unix_timestamp;
    let reward = ctx.accounts.position.earned(pool, now)?;
    require!(
        pool.available_rewards(ctx.accounts.reward_vault.amount) >= reward,
        TokenomicsError::InsufficientPoolBalance
    );

    let pool = &mut ctx.accounts.pool;
    let position = &mut ctx.accounts.position;
    let restaked = position.restake(pool, now)?;

    emit!(RewardsRestaked {
        owner: position.owner,
        amount: restaked,
        restaked_total: position.restaked_reward,
        earning_balance: position.earning_balance()?,
        pool_restaked: pool.total_restaked,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct RestakeRewards<'info> {
    #[account(mut, seeds = [STAKE_POOL_SEED, pool.stake_mint.as_ref()], bump = pool.bump)]
    pub pool: Account<'info, StakePool>,

    #[account(
        mut,
        seeds = [STAKE_POSITION_SEED, pool.key().as_ref(), owner.key().as_ref()],
        bump = position.bump,
    )]
    pub position: Account<'info, StakePosition>,

    #[account(
        seeds = [REWARD_VAULT_SEED, pool.key().as_ref()],
        bump,
        constraint = reward_vault.mint == pool.reward_mint @ TokenomicsError::InvalidTokenMint,
    )]
    pub reward_vault: Account<'info, TokenAccount>,

    pub owner: Signer<'info>,
}

#[event]
pub struct RewardsRestaked {
    pub owner: Pubkey,
    pub amount: u64,
    pub restaked_total: u64,
    pub earning_balance: u64,
    pub pool_restaked: u64,
}
