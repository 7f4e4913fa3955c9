use anchor_lang::prelude::*;

use crate::constants::{PARTICIPANT_SEED, SALE_SEED};
use crate::error::TokenomicsError;
use crate::state::{Participant, SaleState, SaleStatus};

pub fn emit_sale_quote_handler(ctx: Context<EmitSaleQuote>, wallet: Pubkey) -> Result<()> {
    let sale = &ctx.accounts.sale;
    let participant = &ctx.accounts.participant;
    require_keys_eq!(participant.wallet, wallet, TokenomicsError::ParticipantMismatch);

    let now = Clock::get()?.unix_timestamp;
    let unlocked = sale.unlocked_for(participant, now)?;
    let releasable = sale.releasable(participant, now)?;
    let status = match sale.status(now)? {
        SaleStatus::Unfunded => 0,
        SaleStatus::PreRelease => 1,
        SaleStatus::Releasing => 2,
        SaleStatus::FullyReleased => 3,
    };

    emit!(SaleQuote {
        kind: sale.kind as u8,
        wallet,
        status,
        release_index: sale.schedule.release_index(now)?,
        bought: participant.bought,
        reserved: participant.reserved_amount,
        unlocked,
        released_amount: participant.released_amount,
        releasable,
        outstanding: participant.outstanding(),
    });

    Ok(())
}

#[derive(Accounts)]
#[instruction(wallet: Pubkey)]
pub struct EmitSaleQuote<'info> {
    #[account(seeds = [SALE_SEED, sale.kind.seed().as_ref()], bump = sale.bump)]
    pub sale: Box<Account<'info, SaleState>>,

    #[account(
        seeds = [PARTICIPANT_SEED, sale.key().as_ref(), wallet.as_ref()],
        bump = participant.bump,
    )]
    pub participant: Account<'info, Participant>,
}

#[event]
pub struct SaleQuote {
    pub kind: u8,
    pub wallet: Pubkey,
    /// 0 unfunded, 1 pre-release, 2 releasing, 3 fully released.
    pub status: u8,
    pub release_index: u16,
    pub bought: u64,
    pub reserved: u64,
    pub unlocked: u64,
    pub released_amount: u64,
    pub releasable: u64,
    pub outstanding: u64,
}
