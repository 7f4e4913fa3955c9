use anchor_lang::prelude::*;

use crate::error::TokenomicsError;
use crate::utils::{amount, time};

/// Spacing between two consecutive linear releases.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseInterval {
    /// Fixed number of seconds.
    Seconds(i64),
    /// Calendar months, same day-of-month as the anchor (clamped).
    CalendarMonths(u8),
}

impl Default for ReleaseInterval {
    fn default() -> Self {
        ReleaseInterval::Seconds(crate::constants::SECONDS_PER_MONTH)
    }
}

impl ReleaseInterval {
    /// Borsh tag + largest payload.
    pub const SIZE: usize = 1 + 8;

    pub fn validate(&self) -> core::result::Result<(), TokenomicsError> {
        match *self {
            ReleaseInterval::Seconds(s) if s > 0 => Ok(()),
            ReleaseInterval::CalendarMonths(m) if m > 0 => Ok(()),
            _ => Err(TokenomicsError::InvalidSchedule),
        }
    }

    /// Timestamp `steps` intervals after `anchor_ts`.
    pub fn advance(
        &self,
        anchor_ts: i64,
        steps: u32,
    ) -> core::result::Result<i64, TokenomicsError> {
        match *self {
            ReleaseInterval::Seconds(s) => s
                .checked_mul(steps as i64)
                .and_then(|d| anchor_ts.checked_add(d))
                .ok_or(TokenomicsError::MathOverflow),
            ReleaseInterval::CalendarMonths(m) => {
                let months = (m as u32)
                    .checked_mul(steps)
                    .ok_or(TokenomicsError::MathOverflow)?;
                time::add_months(anchor_ts, months)
            }
        }
    }

    /// Whole intervals elapsed from `anchor_ts` to `now_ts` (0 before the anchor).
    pub fn elapsed(
        &self,
        anchor_ts: i64,
        now_ts: i64,
    ) -> core::result::Result<u64, TokenomicsError> {
        if now_ts < anchor_ts {
            return Ok(0);
        }
        match *self {
            ReleaseInterval::Seconds(s) => {
                self.validate()?;
                Ok(((now_ts - anchor_ts) / s) as u64)
            }
            ReleaseInterval::CalendarMonths(m) => {
                self.validate()?;
                Ok((time::months_elapsed(anchor_ts, now_ts)? / m as u32) as u64)
            }
        }
    }

    /// Steps unlocked at `now_ts` out of `release_count`, where step `k` falls
    /// `skip + k` intervals after `anchor_ts`. Every boundary is derived from
    /// the anchor itself, so month-end clamping never carries over.
    pub fn steps_unlocked(
        &self,
        anchor_ts: i64,
        skip: u32,
        release_count: u16,
        now_ts: i64,
    ) -> core::result::Result<u16, TokenomicsError> {
        if release_count == 0 {
            return Err(TokenomicsError::InvalidSchedule);
        }
        let elapsed = self.elapsed(anchor_ts, now_ts)?;
        if now_ts < anchor_ts || elapsed < skip as u64 {
            return Ok(0);
        }
        let index = (elapsed - skip as u64)
            .saturating_add(1)
            .min(release_count as u64);
        Ok(index as u16)
    }
}

/// Unlocked share of an allocation, `numerator / denominator` in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fraction {
    pub numerator: u64,
    pub denominator: u64,
}

impl Fraction {
    pub fn is_zero(&self) -> bool {
        self.numerator == 0
    }

    pub fn is_whole(&self) -> bool {
        self.numerator == self.denominator
    }

    /// `total * numerator / denominator`, exact when the fraction is whole.
    pub fn of(&self, total: u64) -> core::result::Result<u64, TokenomicsError> {
        if self.is_whole() {
            return Ok(total);
        }
        amount::mul_div(total, self.numerator, self.denominator)
    }
}

/// Cliff plus equal-step linear release.
///
/// The first step unlocks at `first_release_ts`, every following step one
/// `interval` later, until `release_count` steps have unlocked the whole amount.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VestingSchedule {
    pub first_release_ts: i64,
    pub interval: ReleaseInterval,
    pub release_count: u16,
}

impl VestingSchedule {
    pub const SIZE: usize =
        8 +                     // first_release_ts
        ReleaseInterval::SIZE + // interval
        2;                      // release_count

    pub fn new(
        first_release_ts: i64,
        interval: ReleaseInterval,
        release_count: u16,
    ) -> core::result::Result<Self, TokenomicsError> {
        let schedule = Self {
            first_release_ts,
            interval,
            release_count,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn validate(&self) -> core::result::Result<(), TokenomicsError> {
        if self.release_count == 0 {
            return Err(TokenomicsError::InvalidSchedule);
        }
        if self.first_release_ts < 0 {
            return Err(TokenomicsError::InvalidTimestamp);
        }
        self.interval.validate()
    }

    /// Number of releases unlocked at `now_ts`, in `[0, release_count]`.
    pub fn release_index(&self, now_ts: i64) -> core::result::Result<u16, TokenomicsError> {
        self.validate()?;
        self.interval
            .steps_unlocked(self.first_release_ts, 0, self.release_count, now_ts)
    }

    pub fn unlocked_fraction(
        &self,
        now_ts: i64,
    ) -> core::result::Result<Fraction, TokenomicsError> {
        Ok(Fraction {
            numerator: self.release_index(now_ts)? as u64,
            denominator: self.release_count as u64,
        })
    }

    pub fn unlocked_amount(
        &self,
        total: u64,
        now_ts: i64,
    ) -> core::result::Result<u64, TokenomicsError> {
        self.unlocked_fraction(now_ts)?.of(total)
    }

    /// Timestamp of the last release step.
    pub fn final_release_ts(&self) -> core::result::Result<i64, TokenomicsError> {
        self.validate()?;
        self.interval
            .advance(self.first_release_ts, self.release_count as u32 - 1)
    }

    pub fn is_complete(&self, now_ts: i64) -> core::result::Result<bool, TokenomicsError> {
        Ok(now_ts >= self.final_release_ts()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SECONDS_PER_MONTH;
    use crate::utils::time::CivilDateTime;

    const START: i64 = 1_648_771_200; // 2022-04-01

    fn monthly(count: u16) -> VestingSchedule {
        VestingSchedule::new(START, ReleaseInterval::Seconds(SECONDS_PER_MONTH), count).unwrap()
    }

    #[test]
    fn zero_before_first_release() {
        let s = monthly(4);
        assert!(s.unlocked_fraction(0).unwrap().is_zero());
        assert!(s.unlocked_fraction(START - 1).unwrap().is_zero());
        assert_eq!(s.unlocked_amount(1_000, START - 1).unwrap(), 0);
    }

    #[test]
    fn steps_at_each_boundary() {
        let s = monthly(4);
        assert_eq!(s.release_index(START).unwrap(), 1);
        assert_eq!(s.release_index(START + SECONDS_PER_MONTH - 1).unwrap(), 1);
        assert_eq!(s.release_index(START + SECONDS_PER_MONTH).unwrap(), 2);
        assert_eq!(s.release_index(START + 3 * SECONDS_PER_MONTH).unwrap(), 4);
        assert_eq!(s.unlocked_amount(1_000, START + SECONDS_PER_MONTH).unwrap(), 500);
    }

    #[test]
    fn saturates_and_stays_monotonic() {
        let s = monthly(23);
        let mut previous = 0;
        for month in 0..60 {
            let now = START - SECONDS_PER_MONTH + month * SECONDS_PER_MONTH / 2;
            let f = s.unlocked_fraction(now).unwrap();
            assert!(f.numerator >= previous);
            assert!(f.numerator <= f.denominator);
            assert_eq!(f, s.unlocked_fraction(now).unwrap());
            previous = f.numerator;
        }
        let far = START + 100 * SECONDS_PER_MONTH;
        assert!(s.unlocked_fraction(far).unwrap().is_whole());
        assert!(s.is_complete(far).unwrap());
        assert_eq!(s.unlocked_amount(46_000_000_001, far).unwrap(), 46_000_000_001);
    }

    #[test]
    fn final_release_is_exact() {
        let s = monthly(23);
        let last = s.final_release_ts().unwrap();
        assert_eq!(last, START + 22 * SECONDS_PER_MONTH);
        assert_eq!(s.unlocked_amount(1_000_000_007, last - 1).unwrap(), 956_521_745);
        assert_eq!(s.unlocked_amount(1_000_000_007, last).unwrap(), 1_000_000_007);
    }

    #[test]
    fn calendar_month_interval() {
        let first = CivilDateTime::new(2024, 1, 31, 0).to_unix().unwrap();
        let s = VestingSchedule::new(first, ReleaseInterval::CalendarMonths(1), 3).unwrap();
        let feb29 = CivilDateTime::new(2024, 2, 29, 0).to_unix().unwrap();
        let mar31 = CivilDateTime::new(2024, 3, 31, 0).to_unix().unwrap();
        assert_eq!(s.release_index(feb29 - 1).unwrap(), 1);
        assert_eq!(s.release_index(feb29).unwrap(), 2);
        assert_eq!(s.release_index(mar31 - 1).unwrap(), 2);
        assert_eq!(s.final_release_ts().unwrap(), mar31);

        let quarterly = VestingSchedule::new(first, ReleaseInterval::CalendarMonths(3), 2).unwrap();
        assert_eq!(quarterly.release_index(mar31).unwrap(), 1);
        assert_eq!(
            quarterly.final_release_ts().unwrap(),
            CivilDateTime::new(2024, 4, 30, 0).to_unix().unwrap()
        );
    }

    #[test]
    fn rejects_invalid_schedules() {
        assert!(matches!(
            VestingSchedule::new(START, ReleaseInterval::Seconds(0), 3),
            Err(TokenomicsError::InvalidSchedule)
        ));
        assert!(matches!(
            VestingSchedule::new(START, ReleaseInterval::CalendarMonths(0), 3),
            Err(TokenomicsError::InvalidSchedule)
        ));
        assert!(matches!(
            VestingSchedule::new(START, ReleaseInterval::Seconds(60), 0),
            Err(TokenomicsError::InvalidSchedule)
        ));
    }
}
