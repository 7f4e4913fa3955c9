use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, MintTo, Token, TokenAccount};

use crate::constants::{CATEGORY_COUNT, DISTRIBUTION_SEED};
use crate::error::TokenomicsError;
use crate::state::{CategoryKind, DistributionState};

/// Mints everything that became releasable since the previous call.
///
/// Permissionless. `remaining_accounts` are the nine category wallets in
/// `CategoryKind::ALL` order, writable.
pub fn trigger_release_handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, TriggerRelease<'info>>,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let st = &ctx.accounts.distribution;
    let deltas = st.pending_releases(now)?;

    let mut total: u64 = 0;
    for delta in deltas.iter() {
        total = total
            .checked_add(*delta)
            .ok_or(TokenomicsError::MathOverflow)?;
    }
    if total == 0 {
        msg!("nothing releasable at {}", now);
        return Ok(());
    }

    require!(
        ctx.remaining_accounts.len() == CATEGORY_COUNT,
        TokenomicsError::InvalidCategoryCount
    );
    for ((category, delta), wallet_ai) in st
        .categories
        .iter()
        .zip(deltas.iter())
        .zip(ctx.remaining_accounts.iter())
    {
        require_keys_eq!(
            wallet_ai.key(),
            category.wallet,
            TokenomicsError::InvalidCategoryWallet
        );
        if *delta == 0 {
            continue;
        }
        require!(wallet_ai.is_writable, TokenomicsError::InvalidTokenAccount);
        let wallet = Account::<TokenAccount>::try_from(wallet_ai)?;
        require_keys_eq!(wallet.mint, st.mint, TokenomicsError::InvalidTokenMint);
    }

    let supply_after = ctx
        .accounts
        .mint
        .supply
        .checked_add(total)
        .ok_or(TokenomicsError::MathOverflow)?;
    require!(
        supply_after <= st.supply_cap,
        TokenomicsError::AllocationExceeded
    );

    let signer_seeds: &[&[&[u8]]] = &[&[DISTRIBUTION_SEED, &[st.bump]]];
    for (delta, wallet_ai) in deltas.iter().zip(ctx.remaining_accounts.iter()) {
        if *delta == 0 {
            continue;
        }
        token::mint_to(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                MintTo {
                    mint: ctx.accounts.mint.to_account_info(),
                    to: wallet_ai.clone(),
                    authority: ctx.accounts.distribution.to_account_info(),
                },
                signer_seeds,
            ),
            *delta,
        )?;
    }

    let st = &mut ctx.accounts.distribution;
    st.record_releases(&deltas)?;

    for (kind, delta) in CategoryKind::ALL.iter().zip(deltas.iter()) {
        if *delta == 0 {
            continue;
        }
        let category = st.category(*kind);
        emit!(CategoryReleased {
            kind: category.kind as u8,
            wallet: category.wallet,
            amount: *delta,
            released_total: category.released_amount,
        });
    }
    emit!(ReleaseTriggered {
        caller: ctx.accounts.caller.key(),
        ts: now,
        amount: total,
        total_released: st.total_released,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct TriggerRelease<'info> {
    #[account(mut, seeds = [DISTRIBUTION_SEED], bump = distribution.bump)]
    pub distribution: Box<Account<'info, DistributionState>>,

    #[account(
        mut,
        address = distribution.mint @ TokenomicsError::InvalidTokenMint,
    )]
    pub mint: Account<'info, Mint>,

    pub caller: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct CategoryReleased {
    pub kind: u8,
    pub wallet: Pubkey,
    pub amount: u64,
    pub released_total: u64,
}

#[event]
pub struct ReleaseTriggered {
    pub caller: Pubkey,
    pub ts: i64,
    pub amount: u64,
    pub total_released: u64,
}
