use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::{REWARD_VAULT_SEED, STAKE_POOL_SEED, STAKE_POSITION_SEED};
use crate::error::TokenomicsError;
use crate::state::{StakePool, StakePosition};

/// Pays the earned reward; the staked principal is untouched.
pub fn claim_rewards_handler(ctx: Context<ClaimRewards>) -> Result<()> {
    let owner = ctx.accounts.owner.key();
    let pool = &ctx.accounts.pool;
    require_keys_eq!(
        ctx.accounts.owner_reward_account.mint,
        pool.reward_mint,
        TokenomicsError::InvalidTokenMint
    );
    require_keys_eq!(
        ctx.accounts.owner_reward_account.owner,
        owner,
        TokenomicsError::InvalidTokenAccount
    );

    let now = Clock::get()?.unix_timestamp;
    let reward = ctx.accounts.position.earned(pool, now)?;
    if reward == 0 {
        msg!("no reward earned yet");
        return Ok(());
    }
    require!(
        pool.available_rewards(ctx.accounts.reward_vault.amount) >= reward,
        TokenomicsError::InsufficientPoolBalance
    );

    let signer_seeds: &[&[&[u8]]] = &[&[STAKE_POOL_SEED, pool.stake_mint.as_ref(), &[pool.bump]]];
    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.reward_vault.to_account_info(),
                to: ctx.accounts.owner_reward_account.to_account_info(),
                authority: ctx.accounts.pool.to_account_info(),
            },
            signer_seeds,
        ),
        reward,
    )?;

    let pool = &mut ctx.accounts.pool;
    let position = &mut ctx.accounts.position;
    position.claim(pool, now)?;

    emit!(RewardsClaimed {
        owner,
        amount: reward,
        staked_amount: position.staked_amount,
        pool_rewards_paid: pool.total_rewards_paid,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct ClaimRewards<'info> {
    #[account(mut, seeds = [STAKE_POOL_SEED, pool.stake_mint.as_ref()], bump = pool.bump)]
    pub pool: Account<'info, StakePool>,

    #[account(
        mut,
        seeds = [STAKE_POSITION_SEED, pool.key().as_ref(), owner.key().as_ref()],
        bump = position.bump,
    )]
    pub position: Account<'info, StakePosition>,

    #[account(
        mut,
        seeds = [REWARD_VAULT_SEED, pool.key().as_ref()],
        bump,
        constraint = reward_vault.mint == pool.reward_mint @ TokenomicsError::InvalidTokenMint,
    )]
    pub reward_vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub owner_reward_account: Account<'info, TokenAccount>,

    pub owner: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct RewardsClaimed {
    pub owner: Pubkey,
    pub amount: u64,
    pub staked_amount: u64,
    pub pool_rewards_paid: u64,
}
