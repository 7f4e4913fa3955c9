use anchor_lang::prelude::*;

use crate::constants::DISTRIBUTION_SEED;
use crate::error::TokenomicsError;
use crate::state::{CategoryConfig, DistributionState};

pub fn configure_categories_handler(
    ctx: Context<ConfigureCategories>,
    categories: Vec<CategoryConfig>,
) -> Result<()> {
    let st = &mut ctx.accounts.distribution;
    require_keys_eq!(ctx.accounts.admin.key(), st.admin, TokenomicsError::Unauthorized);

    st.configure(&categories)?;

    for category in st.categories.iter() {
        emit!(CategoryConfigured {
            kind: category.kind as u8,
            wallet: category.wallet,
            total_allocation: category.total_allocation,
            initial_unlock: category.initial_unlock,
            cliff_intervals: category.cliff_intervals,
            release_count: category.release_count,
        });
    }
    msg!(
        "configured {} categories, {} allocated of {}",
        categories.len(),
        st.total_allocated,
        st.supply_cap
    );

    Ok(())
}

#[derive(Accounts)]
pub struct ConfigureCategories<'info> {
    #[account(mut, seeds = [DISTRIBUTION_SEED], bump = distribution.bump)]
    pub distribution: Box<Account<'info, DistributionState>>,

    pub admin: Signer<'info>,
}

#[event]
pub struct CategoryConfigured {
    pub kind: u8,
    pub wallet: Pubkey,
    pub total_allocation: u64,
    pub initial_unlock: u64,
    pub cliff_intervals: u16,
    pub release_count: u16,
}
