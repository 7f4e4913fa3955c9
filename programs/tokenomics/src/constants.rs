//! Program-wide constants.

/// Number of stakeholder categories held by the distribution ledger.
pub const CATEGORY_COUNT: usize = 9;

/// Decimals of the distributed token mint.
pub const TOKEN_DECIMALS: u8 = 9;

/// Decimals of the stable payment token (USDT).
pub const PAYMENT_DECIMALS: u8 = 6;

/// Basis points denominator (10_000 = 100%).
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Share of the reservation unlocked immediately when a sale is closed early.
pub const DEFAULT_CLOSE_UNLOCK_BPS: u16 = 1_000;

/// Seconds per day (UTC).
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Fixed-length month used by second-based schedules.
pub const SECONDS_PER_MONTH: i64 = 30 * SECONDS_PER_DAY;

pub const DISTRIBUTION_SEED: &[u8] = b"distribution";
pub const SALE_SEED: &[u8] = b"sale";
pub const SALE_VAULT_SEED: &[u8] = b"sale_vault";
pub const PAYMENT_VAULT_SEED: &[u8] = b"payment_vault";
pub const PARTICIPANT_SEED: &[u8] = b"participant";
pub const STAKE_POOL_SEED: &[u8] = b"stake_pool";
pub const STAKE_VAULT_SEED: &[u8] = b"stake_vault";
pub const REWARD_VAULT_SEED: &[u8] = b"reward_vault";
pub const STAKE_POSITION_SEED: &[u8] = b"stake";
