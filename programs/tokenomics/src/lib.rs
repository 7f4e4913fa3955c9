//! Fixed-supply token program: category vesting mints, locked token sales
//! and time-proportional staking rewards.

use anchor_lang::prelude::*;

pub mod constants;
pub mod error;
pub mod instructions;
pub mod state;
pub mod utils;

pub use instructions::*;
use state::{CategoryConfig, ReleaseInterval, SaleConfig, SaleKind, StakeConfig};

declare_id!("61EiRiRNSU4ZEhnn8JpC6L9VRHz6oKvD9YzSP6bNZNWp");

#[program]
pub mod tokenomics {
    use super::*;

    // Distribution ledger

    pub fn initialize_distribution(
        ctx: Context<InitializeDistribution>,
        supply_cap: u64,
        interval: ReleaseInterval,
    ) -> Result<()> {
        instructions::initialize_distribution::initialize_distribution_handler(
            ctx, supply_cap, interval,
        )
    }

    pub fn configure_categories(
        ctx: Context<ConfigureCategories>,
        categories: Vec<CategoryConfig>,
    ) -> Result<()> {
        instructions::configure_categories::configure_categories_handler(ctx, categories)
    }

    pub fn set_generation_event_date(ctx: Context<SetGenerationEventDate>, ts: i64) -> Result<()> {
        instructions::set_generation_event_date::set_generation_event_date_handler(ctx, ts)
    }

    pub fn trigger_release<'info>(
        ctx: Context<'_, '_, 'info, 'info, TriggerRelease<'info>>,
    ) -> Result<()> {
        instructions::trigger_release::trigger_release_handler(ctx)
    }

    // Sale ledger

    pub fn initialize_sale(
        ctx: Context<InitializeSale>,
        kind: SaleKind,
        config: SaleConfig,
    ) -> Result<()> {
        instructions::initialize_sale::initialize_sale_handler(ctx, kind, config)
    }

    pub fn fund_sale(ctx: Context<FundSale>, amount: u64) -> Result<()> {
        instructions::fund_sale::fund_sale_handler(ctx, amount)
    }

    pub fn add_participant(
        ctx: Context<AddParticipant>,
        wallet: Pubkey,
        min_buy: u64,
        max_buy: u64,
    ) -> Result<()> {
        instructions::add_participant::add_participant_handler(ctx, wallet, min_buy, max_buy)
    }

    pub fn lock_tokens(ctx: Context<LockTokens>, amount: u64) -> Result<()> {
        instructions::lock_tokens::lock_tokens_handler(ctx, amount)
    }

    pub fn release_tokens(ctx: Context<ReleaseTokens>) -> Result<()> {
        instructions::release_tokens::release_tokens_handler(ctx)
    }

    pub fn release_tokens_for(ctx: Context<ReleaseTokensFor>, wallet: Pubkey) -> Result<()> {
        instructions::release_tokens_for::release_tokens_for_handler(ctx, wallet)
    }

    pub fn close_sale(ctx: Context<CloseSale>) -> Result<()> {
        instructions::close_sale::close_sale_handler(ctx)
    }

    pub fn pull_payment(ctx: Context<PullPayment>, amount: u64) -> Result<()> {
        instructions::pull_payment::pull_payment_handler(ctx, amount)
    }

    pub fn emit_sale_quote(ctx: Context<EmitSaleQuote>, wallet: Pubkey) -> Result<()> {
        instructions::emit_sale_quote::emit_sale_quote_handler(ctx, wallet)
    }

    // Stake ledger

    pub fn initialize_stake_pool(
        ctx: Context<InitializeStakePool>,
        config: StakeConfig,
    ) -> Result<()> {
        instructions::initialize_stake_pool::initialize_stake_pool_handler(ctx, config)
    }

    pub fn stake(ctx: Context<Stake>, amount: u64, lock_duration: i64) -> Result<()> {
        instructions::stake::stake_handler(ctx, amount, lock_duration)
    }

    pub fn claim_rewards(ctx: Context<ClaimRewards>) -> Result<()> {
        instructions::claim_rewards::claim_rewards_handler(ctx)
    }

    pub fn restake_rewards(ctx: Context<RestakeRewards>) -> Result<()> {
        instructions::restake_rewards::restake_rewards_handler(ctx)
    }

    pub fn unstake(ctx: Context<Unstake>) -> Result<()> {
        instructions::unstake::unstake_handler(ctx)
    }

    pub fn emit_earned_rewards(ctx: Context<EmitEarnedRewards>, owner: Pubkey) -> Result<()> {
        instructions::emit_earned_rewards::emit_earned_rewards_handler(ctx, owner)
    }
}
