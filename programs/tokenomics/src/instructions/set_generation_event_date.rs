use anchor_lang::prelude::*;

use crate::constants::DISTRIBUTION_SEED;
use crate::error::TokenomicsError;
use crate::state::DistributionState;

pub fn set_generation_event_date_handler(
    ctx: Context<SetGenerationEventDate>,
    ts: i64,
) -> Result<()> {
    let st = &mut ctx.accounts.distribution;
    require_keys_eq!(ctx.accounts.admin.key(), st.admin, TokenomicsError::Unauthorized);

    let previous_ts = st.generation_event_ts;
    st.set_generation_event_date(ts)?;

    emit!(GenerationEventDateSet {
        previous_ts,
        generation_event_ts: ts,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct SetGenerationEventDate<'info> {
    #[account(mut, seeds = [DISTRIBUTION_SEED], bump = distribution.bump)]
    pub distribution: Box<Account<'info, DistributionState>>,

    pub admin: Signer<'info>,
}

#[event]
pub struct GenerationEventDateSet {
    pub previous_ts: i64,
    pub generation_event_ts: i64,
}
