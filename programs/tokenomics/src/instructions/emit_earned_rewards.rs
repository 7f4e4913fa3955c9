use anchor_lang::prelude::*;

use crate::constants::{STAKE_POOL_SEED, STAKE_POSITION_SEED};
use crate::state::{StakePool, StakePosition};

pub fn emit_earned_rewards_handler(ctx: Context<EmitEarnedRewards>, owner: Pubkey) -> Result<()> {
    let pool = &ctx.accounts.pool;
    let position = &ctx.accounts.position;
    let now = Clock::get()?.unix_timestamp;

    emit!(EarnedRewards {
        owner,
        staked_amount: position.staked_amount,
        restaked_reward: position.restaked_reward,
        earned: position.earned(pool, now)?,
        unlock_ts: position.unlock_ts()?,
        ts: now,
    });

    Ok(())
}

#[derive(Accounts)]
#[instruction(owner: Pubkey)]
pub struct EmitEarnedRewards<'info> {
    #[account(seeds = [STAKE_POOL_SEED, pool.stake_mint.as_ref()], bump = pool.bump)]
    pub pool: Account<'info, StakePool>,

    #[account(
        seeds = [STAKE_POSITION_SEED, pool.key().as_ref(), owner.as_ref()],
        bump = position.bump,
    )]
    pub position: Account<'info, StakePosition>,
}

#[event]
pub struct EarnedRewards {
    pub owner: Pubkey,
    pub staked_amount: u64,
    pub restaked_reward: u64,
    pub earned: u64,
    pub unlock_ts: i64,
    pub ts: i64,
}
