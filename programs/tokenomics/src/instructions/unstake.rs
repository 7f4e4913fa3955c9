use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::{REWARD_VAULT_SEED, STAKE_POOL_SEED, STAKE_POSITION_SEED, STAKE_VAULT_SEED};
use crate::error::TokenomicsError;
use crate::state::{StakePool, StakePosition};

/// Returns the principal and the outstanding reward, restaked reward
/// included, once the lock has ended.
pub fn unstake_handler(ctx: Context<Unstake>) -> Result<()> {
    let owner = ctx.accounts.owner.key();
    let pool = &ctx.accounts.pool;
    let position = &ctx.accounts.position;
    require_keys_eq!(
        ctx.accounts.owner_stake_account.mint,
        pool.stake_mint,
        TokenomicsError::InvalidTokenMint
    );
    require_keys_eq!(
        ctx.accounts.owner_stake_account.owner,
        owner,
        TokenomicsError::InvalidTokenAccount
    );
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
    let principal = position.staked_amount;
    require!(principal > 0, TokenomicsError::NothingStaked);
    require!(now >= position.unlock_ts()?, TokenomicsError::StakeLocked);
    let reward = position.reward_due(pool, now)?;
    require!(
        ctx.accounts.stake_vault.amount >= principal,
        TokenomicsError::InsufficientPoolBalance
    );
    require!(
        ctx.accounts.reward_vault.amount >= reward,
        TokenomicsError::InsufficientPoolBalance
    );

    let signer_seeds: &[&[&[u8]]] = &[&[STAKE_POOL_SEED, pool.stake_mint.as_ref(), &[pool.bump]]];
    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.stake_vault.to_account_info(),
                to: ctx.accounts.owner_stake_account.to_account_info(),
                authority: ctx.accounts.pool.to_account_info(),
            },
            signer_seeds,
        ),
        principal,
    )?;
    if reward > 0 {
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
    }

    let pool = &mut ctx.accounts.pool;
    let position = &mut ctx.accounts.position;
    let (principal, reward) = position.withdraw(pool, now)?;

    emit!(Unstaked {
        owner,
        principal,
        reward,
        pool_total: pool.total_staked,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct Unstake<'info> {
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
        seeds = [STAKE_VAULT_SEED, pool.key().as_ref()],
        bump,
        constraint = stake_vault.mint == pool.stake_mint @ TokenomicsError::InvalidTokenMint,
    )]
    pub stake_vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [REWARD_VAULT_SEED, pool.key().as_ref()],
        bump,
        constraint = reward_vault.mint == pool.reward_mint @ TokenomicsError::InvalidTokenMint,
    )]
    pub reward_vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub owner_stake_account: Account<'info, TokenAccount>,

    #[account(mut)]
    pub owner_reward_account: Account<'info, TokenAccount>,

    pub owner: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct Unstaked {
    pub owner: Pubkey,
    pub principal: u64,
    pub reward: u64,
    pub pool_total: u64,
}
