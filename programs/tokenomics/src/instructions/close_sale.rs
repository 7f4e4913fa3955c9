use anchor_lang::prelude::*;

use crate::constants::SALE_SEED;
use crate::error::TokenomicsError;
use crate::state::SaleState;

pub fn close_sale_handler(ctx: Context<CloseSale>) -> Result<()> {
    let sale = &mut ctx.accounts.sale;
    require_keys_eq!(ctx.accounts.admin.key(), sale.admin, TokenomicsError::Unauthorized);

    let now = Clock::get()?.unix_timestamp;
    sale.mark_closed(now)?;

    emit!(SaleClosed {
        kind: sale.kind as u8,
        closed_at: now,
        unlock_bps: sale.close_policy.unlock_bps,
        total_reserved: sale.total_reserved,
        funded: sale.funded,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct CloseSale<'info> {
    #[account(mut, seeds = [SALE_SEED, sale.kind.seed().as_ref()], bump = sale.bump)]
    pub sale: Box<Account<'info, SaleState>>,

    pub admin: Signer<'info>,
}

#[event]
pub struct SaleClosed {
    pub kind: u8,
    pub closed_at: i64,
    pub unlock_bps: u16,
    pub total_reserved: u64,
    pub funded: u64,
}
