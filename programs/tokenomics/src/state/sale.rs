use anchor_lang::prelude::*;

use crate::constants::{BPS_DENOMINATOR, DEFAULT_CLOSE_UNLOCK_BPS};
use crate::error::TokenomicsError;
use crate::state::VestingSchedule;
use crate::utils::amount::{bps_of, to_base_units};

/// The four sale rounds; each is its own `SaleState` PDA.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SaleKind {
    #[default]
    Seed,
    Private,
    Strategic,
    Public,
}

impl SaleKind {
    pub fn seed(self) -> [u8; 1] {
        [self as u8]
    }
}

/// How the part above the close unlock is released after an early close.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CloseRemainder {
    /// Keep the original schedule.
    #[default]
    KeepSchedule,
    /// Restart the full release count one interval after the close.
    Restart,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClosePolicy {
    /// Share of each reservation unlocked as soon as the sale is closed.
    pub unlock_bps: u16,
    pub remainder: CloseRemainder,
}

impl Default for ClosePolicy {
    fn default() -> Self {
        Self {
            unlock_bps: DEFAULT_CLOSE_UNLOCK_BPS,
            remainder: CloseRemainder::KeepSchedule,
        }
    }
}

impl ClosePolicy {
    pub const SIZE: usize = 2 + 1;
}

/// Instruction input for `initialize_sale`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaleConfig {
    /// Payment-token base units per whole sale token.
    pub price: u64,
    pub schedule: VestingSchedule,
    pub close_policy: ClosePolicy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaleStatus {
    Unfunded,
    PreRelease,
    Releasing,
    FullyReleased,
}

/// Result of pricing a lock request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LockQuote {
    /// Whole tokens requested.
    pub tokens: u64,
    /// Sale-token base units reserved.
    pub reserved: u64,
    /// Payment-token base units owed.
    pub cost: u64,
}

/// One sale round: buy limits, payment collection and a locked pool released
/// on a schedule shared by all participants.
#[account]
#[derive(Default, Debug)]
pub struct SaleState {
    pub admin: Pubkey,
    pub kind: SaleKind,
    /// Token being sold.
    pub token_mint: Pubkey,
    /// Stable token collected as payment.
    pub payment_mint: Pubkey,
    pub token_decimals: u8,
    pub price: u64,
    pub schedule: VestingSchedule,
    pub close_policy: ClosePolicy,
    /// Close timestamp; 0 while open.
    pub closed_at: i64,
    /// Sale tokens deposited into the pool.
    pub funded: u64,
    pub total_reserved: u64,
    pub total_released: u64,
    pub payment_collected: u64,
    pub payment_withdrawn: u64,
    pub participant_count: u32,
    pub bump: u8,
}

impl SaleState {
    pub const SIZE: usize =
        32 + // admin
        1 +  // kind
        32 + // token_mint
        32 + // payment_mint
        1 +  // token_decimals
        8 +  // price
        VestingSchedule::SIZE + // schedule
        ClosePolicy::SIZE +     // close_policy
        8 +  // closed_at
        8 +  // funded
        8 +  // total_reserved
        8 +  // total_released
        8 +  // payment_collected
        8 +  // payment_withdrawn
        4 +  // participant_count
        1;   // bump

    pub fn apply_config(
        &mut self,
        config: &SaleConfig,
    ) -> core::result::Result<(), TokenomicsError> {
        if config.price == 0 || config.close_policy.unlock_bps as u64 > BPS_DENOMINATOR {
            return Err(TokenomicsError::InvalidConfig);
        }
        config.schedule.validate()?;
        self.price = config.price;
        self.schedule = config.schedule;
        self.close_policy = config.close_policy;
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed_at != 0
    }

    pub fn status(&self, now_ts: i64) -> core::result::Result<SaleStatus, TokenomicsError> {
        if self.funded == 0 {
            return Ok(SaleStatus::Unfunded);
        }
        let closed_now = self.is_closed() && now_ts >= self.closed_at;
        if self.schedule.is_complete(now_ts)?
            || (closed_now
                && (self.close_policy.unlock_bps as u64 == BPS_DENOMINATOR
                    || (self.close_policy.remainder == CloseRemainder::Restart
                        && self.restart_schedule()?.is_complete(now_ts)?)))
        {
            return Ok(SaleStatus::FullyReleased);
        }
        if self.schedule.release_index(now_ts)? == 0 && !closed_now {
            return Ok(SaleStatus::PreRelease);
        }
        Ok(SaleStatus::Releasing)
    }

    pub fn quote(&self, tokens: u64) -> core::result::Result<LockQuote, TokenomicsError> {
        if tokens == 0 {
            return Err(TokenomicsError::InvalidAmount);
        }
        Ok(LockQuote {
            tokens,
            reserved: to_base_units(tokens, self.token_decimals)?,
            cost: tokens
                .checked_mul(self.price)
                .ok_or(TokenomicsError::MathOverflow)?,
        })
    }

    /// Reserves `tokens` for `participant`, paid from `available_payment`.
    /// Nothing is written unless every check passes.
    pub fn lock(
        &mut self,
        participant: &mut Participant,
        tokens: u64,
        available_payment: u64,
    ) -> core::result::Result<LockQuote, TokenomicsError> {
        if self.is_closed() {
            return Err(TokenomicsError::SaleClosed);
        }
        let quote = self.quote(tokens)?;
        if available_payment < quote.cost {
            return Err(TokenomicsError::InsufficientFunds);
        }

        let bought = participant
            .bought
            .checked_add(tokens)
            .ok_or(TokenomicsError::MathOverflow)?;
        if bought < participant.min_buy || bought > participant.max_buy {
            return Err(TokenomicsError::BuyLimitExceeded);
        }

        let total_reserved = self
            .total_reserved
            .checked_add(quote.reserved)
            .ok_or(TokenomicsError::MathOverflow)?;
        if total_reserved > self.funded {
            return Err(TokenomicsError::AllocationExceeded);
        }
        let reserved_amount = participant
            .reserved_amount
            .checked_add(quote.reserved)
            .ok_or(TokenomicsError::MathOverflow)?;
        let payment_collected = self
            .payment_collected
            .checked_add(quote.cost)
            .ok_or(TokenomicsError::MathOverflow)?;

        participant.bought = bought;
        participant.reserved_amount = reserved_amount;
        self.total_reserved = total_reserved;
        self.payment_collected = payment_collected;
        Ok(quote)
    }

    /// Schedule the remainder follows after a `Restart` close.
    fn restart_schedule(&self) -> core::result::Result<VestingSchedule, TokenomicsError> {
        VestingSchedule::new(
            self.schedule.interval.advance(self.closed_at, 1)?,
            self.schedule.interval,
            self.schedule.release_count,
        )
    }

    /// Cumulative amount `participant` may have received at `now_ts`.
    pub fn unlocked_for(
        &self,
        participant: &Participant,
        now_ts: i64,
    ) -> core::result::Result<u64, TokenomicsError> {
        let reserved = participant.reserved_amount;
        let linear = self.schedule.unlocked_amount(reserved, now_ts)?;
        if !self.is_closed() || now_ts < self.closed_at {
            return Ok(linear);
        }

        let floor = bps_of(reserved, self.close_policy.unlock_bps)?;
        let accelerated = match self.close_policy.remainder {
            CloseRemainder::KeepSchedule => floor,
            CloseRemainder::Restart => {
                let rest = reserved - floor;
                floor
                    .checked_add(self.restart_schedule()?.unlocked_amount(rest, now_ts)?)
                    .ok_or(TokenomicsError::MathOverflow)?
            }
        };
        Ok(linear.max(accelerated))
    }

    pub fn releasable(
        &self,
        participant: &Participant,
        now_ts: i64,
    ) -> core::result::Result<u64, TokenomicsError> {
        self.unlocked_for(participant, now_ts)?
            .checked_sub(participant.released_amount)
            .ok_or(TokenomicsError::MathOverflow)
    }

    pub fn record_release(
        &mut self,
        participant: &mut Participant,
        amount: u64,
    ) -> core::result::Result<(), TokenomicsError> {
        let released = participant
            .released_amount
            .checked_add(amount)
            .ok_or(TokenomicsError::MathOverflow)?;
        if released > participant.reserved_amount {
            return Err(TokenomicsError::AllocationExceeded);
        }
        let total_released = self
            .total_released
            .checked_add(amount)
            .ok_or(TokenomicsError::MathOverflow)?;

        participant.released_amount = released;
        self.total_released = total_released;
        Ok(())
    }

    /// Computes and books the release due to `participant` at `now_ts`.
    pub fn release(
        &mut self,
        participant: &mut Participant,
        now_ts: i64,
    ) -> core::result::Result<u64, TokenomicsError> {
        let owed = self.releasable(participant, now_ts)?;
        if owed > 0 {
            self.record_release(participant, owed)?;
        }
        Ok(owed)
    }

    pub fn mark_closed(&mut self, now_ts: i64) -> core::result::Result<(), TokenomicsError> {
        if self.is_closed() {
            return Err(TokenomicsError::SaleClosed);
        }
        if now_ts <= 0 {
            return Err(TokenomicsError::InvalidTimestamp);
        }
        self.closed_at = now_ts;
        Ok(())
    }

    pub fn record_funding(&mut self, amount: u64) -> core::result::Result<(), TokenomicsError> {
        if amount == 0 {
            return Err(TokenomicsError::InvalidAmount);
        }
        self.funded = self
            .funded
            .checked_add(amount)
            .ok_or(TokenomicsError::MathOverflow)?;
        Ok(())
    }

    pub fn record_payment_withdrawal(
        &mut self,
        amount: u64,
        vault_balance: u64,
    ) -> core::result::Result<(), TokenomicsError> {
        if amount == 0 {
            return Err(TokenomicsError::InvalidAmount);
        }
        if amount > vault_balance {
            return Err(TokenomicsError::InsufficientPoolBalance);
        }
        self.payment_withdrawn = self
            .payment_withdrawn
            .checked_add(amount)
            .ok_or(TokenomicsError::MathOverflow)?;
        Ok(())
    }
}

/// Per-wallet buy bounds and reservation in one sale.
#[account]
#[derive(Default, Debug)]
pub struct Participant {
    pub sale: Pubkey,
    pub wallet: Pubkey,
    /// Minimum cumulative purchase, whole tokens.
    pub min_buy: u64,
    /// Maximum cumulative purchase (buy-high limit), whole tokens.
    pub max_buy: u64,
    /// Whole tokens bought so far.
    pub bought: u64,
    /// Base units reserved.
    pub reserved_amount: u64,
    /// Base units already released.
    pub released_amount: u64,
    pub bump: u8,
}

impl Participant {
    pub const SIZE: usize =
        32 + // sale
        32 + // wallet
        8 +  // min_buy
        8 +  // max_buy
        8 +  // bought
        8 +  // reserved_amount
        8 +  // released_amount
        1;   // bump

    pub fn set_bounds(
        &mut self,
        min_buy: u64,
        max_buy: u64,
    ) -> core::result::Result<(), TokenomicsError> {
        if max_buy == 0 || min_buy > max_buy {
            return Err(TokenomicsError::InvalidConfig);
        }
        self.min_buy = min_buy;
        self.max_buy = max_buy;
        Ok(())
    }

    pub fn outstanding(&self) -> u64 {
        self.reserved_amount.saturating_sub(self.released_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{SECONDS_PER_MONTH, TOKEN_DECIMALS};
    use crate::state::ReleaseInterval;

    const FIRST_RELEASE: i64 = 1_648_771_200; // 2022-04-01
    const PRICE: u64 = 150_000; // 0.15 USDT (6 decimals)
    const FUNDED: u64 = 100_000_000_000_000; // 100k tokens (9 decimals)

    fn sale_with(close_policy: ClosePolicy) -> SaleState {
        let mut sale = SaleState {
            kind: SaleKind::Private,
            token_decimals: TOKEN_DECIMALS,
            ..Default::default()
        };
        sale.apply_config(&SaleConfig {
            price: PRICE,
            schedule: VestingSchedule::new(
                FIRST_RELEASE,
                ReleaseInterval::Seconds(SECONDS_PER_MONTH),
                23,
            )
            .unwrap(),
            close_policy,
        })
        .unwrap();
        sale.record_funding(FUNDED).unwrap();
        sale
    }

    fn sale() -> SaleState {
        sale_with(ClosePolicy::default())
    }

    fn participant(min_buy: u64, max_buy: u64) -> Participant {
        let mut p = Participant::default();
        p.set_bounds(min_buy, max_buy).unwrap();
        p
    }

    fn month(n: i64) -> i64 {
        FIRST_RELEASE + n * SECONDS_PER_MONTH
    }

    #[test]
    fn lock_collects_price_times_amount() {
        let mut sale = sale();
        let mut p = participant(1, 100);
        let quote = sale.lock(&mut p, 10, u64::MAX).unwrap();
        assert_eq!(quote.cost, 1_500_000);
        assert_eq!(p.reserved_amount, 10_000_000_000);
        assert_eq!(p.bought, 10);
        assert_eq!(sale.payment_collected, 1_500_000);
        assert_eq!(sale.total_reserved, 10_000_000_000);
    }

    #[test]
    fn repeated_locks_match_single_lock() {
        let mut split_sale = sale();
        let mut split = participant(1, 100);
        split_sale.lock(&mut split, 23, u64::MAX).unwrap();
        split_sale.lock(&mut split, 23, u64::MAX).unwrap();

        let mut single_sale = sale();
        let mut single = participant(1, 100);
        single_sale.lock(&mut single, 46, u64::MAX).unwrap();

        assert_eq!(split.reserved_amount, single.reserved_amount);
        assert_eq!(split.bought, single.bought);
        assert_eq!(split_sale.total_reserved, single_sale.total_reserved);
        assert_eq!(split_sale.payment_collected, single_sale.payment_collected);
    }

    #[test]
    fn buy_limit_boundaries() {
        let mut sale = sale();
        let mut p = participant(1, 100);
        sale.lock(&mut p, 100, u64::MAX).unwrap();

        let mut over = participant(1, 100);
        assert!(matches!(
            sale.lock(&mut over, 101, u64::MAX),
            Err(TokenomicsError::BuyLimitExceeded)
        ));

        let mut cumulative = participant(1, 49);
        sale.lock(&mut cumulative, 40, u64::MAX).unwrap();
        let before = sale.total_reserved;
        assert!(matches!(
            sale.lock(&mut cumulative, 10, u64::MAX),
            Err(TokenomicsError::BuyLimitExceeded)
        ));
        assert_eq!(cumulative.bought, 40);
        assert_eq!(sale.total_reserved, before);

        let mut below_min = participant(5, 100);
        assert!(matches!(
            sale.lock(&mut below_min, 4, u64::MAX),
            Err(TokenomicsError::BuyLimitExceeded)
        ));
        sale.lock(&mut below_min, 5, u64::MAX).unwrap();
        // Min applies to the cumulative amount.
        sale.lock(&mut below_min, 1, u64::MAX).unwrap();
    }

    #[test]
    fn lock_without_enough_payment_fails() {
        let mut sale = sale();
        let mut p = participant(1, 100);
        assert!(matches!(
            sale.lock(&mut p, 10, 1_499_999),
            Err(TokenomicsError::InsufficientFunds)
        ));
        assert_eq!(p.reserved_amount, 0);
        assert_eq!(sale.payment_collected, 0);
        sale.lock(&mut p, 10, 1_500_000).unwrap();
    }

    #[test]
    fn lock_cannot_exceed_pool_funding() {
        let mut sale = sale();
        let mut whale = participant(1, 200_000);
        assert!(matches!(
            sale.lock(&mut whale, 100_001, u64::MAX),
            Err(TokenomicsError::AllocationExceeded)
        ));
        sale.lock(&mut whale, 100_000, u64::MAX).unwrap();

        let mut unfunded = SaleState {
            token_decimals: 9,
            price: PRICE,
            ..Default::default()
        };
        let mut p = participant(1, 100);
        assert!(matches!(
            unfunded.lock(&mut p, 1, u64::MAX),
            Err(TokenomicsError::AllocationExceeded)
        ));
    }

    #[test]
    fn releases_follow_shared_schedule() {
        let mut sale = sale();
        let mut p = participant(1, 100);
        sale.lock(&mut p, 23, u64::MAX).unwrap();
        sale.lock(&mut p, 23, u64::MAX).unwrap();

        assert_eq!(sale.release(&mut p, month(0) - 1).unwrap(), 0);

        let mut balance = 0;
        for m in 0..22 {
            balance += sale.release(&mut p, month(m)).unwrap();
        }
        // Cliff plus 22 of 23 releases.
        let expected = 46_000_000_000u64 * 22 / 23;
        assert_eq!(balance, expected);
        let slack = balance.abs_diff(44_000_000_000);
        assert!(slack * 1_000 <= 44_000_000_000);

        balance += sale.release(&mut p, month(22)).unwrap();
        assert_eq!(balance, 46_000_000_000);
        assert_eq!(p.released_amount, p.reserved_amount);
        assert_eq!(sale.release(&mut p, month(40)).unwrap(), 0);
    }

    #[test]
    fn late_release_pays_skipped_intervals_once() {
        let mut sale = sale();
        let mut p = participant(1, 100);
        sale.lock(&mut p, 69, u64::MAX).unwrap();

        assert_eq!(sale.release(&mut p, month(0)).unwrap(), 3_000_000_000);
        assert_eq!(sale.release(&mut p, month(9) + 17).unwrap(), 27_000_000_000);
        assert_eq!(sale.release(&mut p, month(9) + 18).unwrap(), 0);
        assert_eq!(sale.release(&mut p, month(60)).unwrap(), 39_000_000_000);
        assert_eq!(p.outstanding(), 0);
    }

    #[test]
    fn terminal_release_is_exact_for_every_participant() {
        let mut sale = sale();
        let mut participants: Vec<Participant> =
            [1, 7, 13, 29, 97].iter().map(|_| participant(1, 1_000)).collect();
        for (p, tokens) in participants.iter_mut().zip([1u64, 7, 13, 29, 97]) {
            sale.lock(p, tokens, u64::MAX).unwrap();
        }

        for m in [0, 1, 5, 6, 7, 15, 21, 22] {
            for p in participants.iter_mut() {
                sale.release(p, month(m)).unwrap();
                assert!(p.released_amount <= p.reserved_amount);
            }
        }
        for p in participants.iter() {
            assert_eq!(p.released_amount, p.reserved_amount);
        }
        assert_eq!(sale.total_released, sale.total_reserved);
    }

    #[test]
    fn close_unlocks_fixed_share_then_resumes_linear() {
        let mut sale = sale();
        let mut p = participant(1, 100);
        sale.lock(&mut p, 46, u64::MAX).unwrap();

        let closed_at = month(0) - 10 * 86_400;
        sale.mark_closed(closed_at).unwrap();
        assert!(matches!(sale.mark_closed(closed_at), Err(TokenomicsError::SaleClosed)));

        assert_eq!(sale.release(&mut p, closed_at).unwrap(), 4_600_000_000);
        assert_eq!(sale.release(&mut p, month(0)).unwrap(), 0);
        // 3/23 of 46 is 6 tokens, above the 10% floor.
        assert_eq!(sale.release(&mut p, month(2)).unwrap(), 1_400_000_000);
        assert_eq!(sale.release(&mut p, month(22)).unwrap(), 40_000_000_000);

        let mut late = participant(1, 100);
        assert!(matches!(
            sale.lock(&mut late, 1, u64::MAX),
            Err(TokenomicsError::SaleClosed)
        ));
    }

    #[test]
    fn mark_closed_records_close_time() {
        let mut sale = sale();
        assert!(!sale.is_closed());
        assert!(matches!(sale.mark_closed(0), Err(TokenomicsError::InvalidTimestamp)));
        assert!(!sale.is_closed());

        sale.mark_closed(month(1)).unwrap();
        assert!(sale.is_closed());
        assert_eq!(sale.closed_at, month(1));
    }

    #[test]
    fn close_with_restart_reschedules_remainder() {
        let mut sale = sale_with(ClosePolicy {
            unlock_bps: 1_000,
            remainder: CloseRemainder::Restart,
        });
        let mut p = participant(1, 100);
        sale.lock(&mut p, 46, u64::MAX).unwrap();

        let closed_at = month(-5);
        sale.mark_closed(closed_at).unwrap();
        assert_eq!(sale.status(closed_at).unwrap(), SaleStatus::Releasing);
        assert_eq!(sale.release(&mut p, closed_at).unwrap(), 4_600_000_000);

        // First restarted step one interval after the close: 1/23 of 41.4 tokens.
        let step = 41_400_000_000u64 / 23;
        assert_eq!(
            sale.release(&mut p, closed_at + SECONDS_PER_MONTH).unwrap(),
            step
        );
        let restart_end = closed_at + 23 * SECONDS_PER_MONTH;
        assert_eq!(sale.status(restart_end).unwrap(), SaleStatus::FullyReleased);
        sale.release(&mut p, restart_end).unwrap();
        assert_eq!(p.released_amount, 46_000_000_000);
    }

    #[test]
    fn status_transitions() {
        let mut unfunded = SaleState::default();
        assert_eq!(unfunded.status(month(0)).unwrap(), SaleStatus::Unfunded);
        unfunded.record_funding(1).unwrap();

        let sale = sale();
        assert_eq!(sale.status(month(0) - 1).unwrap(), SaleStatus::PreRelease);
        assert_eq!(sale.status(month(0)).unwrap(), SaleStatus::Releasing);
        assert_eq!(sale.status(month(21)).unwrap(), SaleStatus::Releasing);
        assert_eq!(sale.status(month(22)).unwrap(), SaleStatus::FullyReleased);
    }

    #[test]
    fn payment_withdrawal_is_bounded_by_vault() {
        let mut sale = sale();
        assert!(matches!(
            sale.record_payment_withdrawal(1_500_001, 1_500_000),
            Err(TokenomicsError::InsufficientPoolBalance)
        ));
        sale.record_payment_withdrawal(1_500_000, 1_500_000).unwrap();
        assert_eq!(sale.payment_withdrawn, 1_500_000);
    }

    #[test]
    fn bounds_validation() {
        let mut p = Participant::default();
        assert!(matches!(p.set_bounds(5, 4), Err(TokenomicsError::InvalidConfig)));
        assert!(matches!(p.set_bounds(0, 0), Err(TokenomicsError::InvalidConfig)));
        p.set_bounds(1, 100).unwrap();
        p.reserved_amount = 7;
        p.set_bounds(2, 50).unwrap();
        assert_eq!(p.reserved_amount, 7);
    }

    #[test]
    fn config_validation() {
        let mut sale = SaleState::default();
        let schedule =
            VestingSchedule::new(FIRST_RELEASE, ReleaseInterval::Seconds(SECONDS_PER_MONTH), 4)
                .unwrap();
        assert!(matches!(
            sale.apply_config(&SaleConfig {
                price: 0,
                schedule,
                close_policy: ClosePolicy::default(),
            }),
            Err(TokenomicsError::InvalidConfig)
        ));
        assert!(matches!(
            sale.apply_config(&SaleConfig {
                price: PRICE,
                schedule,
                close_policy: ClosePolicy {
                    unlock_bps: 10_001,
                    remainder: CloseRemainder::KeepSchedule,
                },
            }),
            Err(TokenomicsError::InvalidConfig)
        ));
    }
}
