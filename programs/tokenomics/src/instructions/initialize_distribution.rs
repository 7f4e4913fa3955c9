use anchor_lang::prelude::*;
use anchor_spl::token::Mint;

use crate::constants::{DISTRIBUTION_SEED, TOKEN_DECIMALS};
use crate::error::TokenomicsError;
use crate::state::{DistributionState, ReleaseInterval};

pub fn initialize_distribution_handler(
    ctx: Context<InitializeDistribution>,
    supply_cap: u64,
    interval: ReleaseInterval,
) -> Result<()> {
    require!(supply_cap > 0, TokenomicsError::InvalidConfig);
    interval.validate()?;

    let mint = &ctx.accounts.mint;
    require!(mint.decimals == TOKEN_DECIMALS, TokenomicsError::InvalidTokenMint);
    let mint_authority: Option<Pubkey> = mint.mint_authority.into();
    require!(
        mint_authority == Some(ctx.accounts.distribution.key()),
        TokenomicsError::InvalidMintAuthority
    );
    // Everything ever minted goes through the category ledger.
    require!(mint.supply == 0, TokenomicsError::InvalidConfig);

    let st = &mut ctx.accounts.distribution;
    st.admin = ctx.accounts.admin.key();
    st.mint = mint.key();
    st.supply_cap = supply_cap;
    st.interval = interval;
    st.generation_event_ts = 0;
    st.configured = false;
    st.total_allocated = 0;
    st.total_released = 0;
    st.bump = ctx.bumps.distribution;

    emit!(DistributionInitialized {
        admin: st.admin,
        mint: st.mint,
        supply_cap,
        interval,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct InitializeDistribution<'info> {
    #[account(
        init,
        payer = admin,
        space = 8 + DistributionState::SIZE,
        seeds = [DISTRIBUTION_SEED],
        bump
    )]
    pub distribution: Box<Account<'info, DistributionState>>,

    pub mint: Account<'info, Mint>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[event]
pub struct DistributionInitialized {
    pub admin: Pubkey,
    pub mint: Pubkey,
    pub supply_cap: u64,
    pub interval: ReleaseInterval,
}
