use anchor_lang::prelude::*;

/// Error codes shared by the distribution, sale and stake ledgers.
#[error_code]
pub enum TokenomicsError {
    #[msg("Unauthorized: admin signature required")]
    Unauthorized,

    #[msg("Invalid configuration")]
    InvalidConfig,

    #[msg("Invalid timestamp")]
    InvalidTimestamp,

    #[msg("Invalid vesting schedule (release count and interval must be > 0)")]
    InvalidSchedule,

    #[msg("Invalid amount")]
    InvalidAmount,

    #[msg("Distribution categories are already configured")]
    AlreadyConfigured,

    #[msg("Distribution categories are not configured")]
    NotConfigured,

    #[msg("Expected exactly one entry per stakeholder category")]
    InvalidCategoryCount,

    #[msg("Duplicate stakeholder category")]
    DuplicateCategory,

    #[msg("Category wallet does not match the configured destination")]
    InvalidCategoryWallet,

    #[msg("Generation event date is not set")]
    GenerationEventNotSet,

    #[msg("Generation event date is already set")]
    GenerationEventAlreadySet,

    #[msg("Tokens have already started releasing")]
    ReleaseAlreadyStarted,

    #[msg("Mint authority must be the distribution account")]
    InvalidMintAuthority,

    #[msg("Allocation would exceed the supply cap or pool funding")]
    AllocationExceeded,

    #[msg("User tried to exceed their buy-high limit")]
    BuyLimitExceeded,

    #[msg("User doesn't have enough USDT to buy requested tokens")]
    InsufficientFunds,

    #[msg("Pool balance is too low for this release or withdrawal")]
    InsufficientPoolBalance,

    #[msg("Sale is closed")]
    SaleClosed,

    #[msg("Participant record does not belong to this sale or wallet")]
    ParticipantMismatch,

    #[msg("Lock duration outside of the allowed lock time period")]
    LockDurationOutOfRange,

    #[msg("Stake is still locked")]
    StakeLocked,

    #[msg("Nothing staked")]
    NothingStaked,

    #[msg("Invalid token mint")]
    InvalidTokenMint,

    #[msg("Invalid token account")]
    InvalidTokenAccount,

    #[msg("Math overflow")]
    MathOverflow,
}
