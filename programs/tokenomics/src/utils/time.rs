//! UTC calendar-month arithmetic for month-based release intervals.
//! - boundary(anchor, k) = anchor date/time + k calendar months, day clamped to
//!   the last valid day of the target month, always derived from the anchor
//! - months_elapsed = largest k such that now >= boundary(anchor, k), inclusive

use crate::constants::SECONDS_PER_DAY;
use crate::error::TokenomicsError;

/// Days between 0000-03-01 and 1970-01-01 in the proleptic Gregorian calendar.
const EPOCH_SHIFT_DAYS: i64 = 719_468;
const DAYS_PER_ERA: i64 = 146_097;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CivilDateTime {
    pub year: i32,
    pub month: u32, // 1-12
    pub day: u32,   // 1-31
    pub second_of_day: u32,
}

impl CivilDateTime {
    pub fn new(year: i32, month: u32, day: u32, second_of_day: u32) -> Self {
        Self {
            year,
            month,
            day,
            second_of_day,
        }
    }

    pub fn from_unix(ts: i64) -> Result<Self, TokenomicsError> {
        if ts < 0 {
            return Err(TokenomicsError::InvalidTimestamp);
        }
        let (year, month, day) = civil_from_days(ts.div_euclid(SECONDS_PER_DAY));
        Ok(Self::new(
            year,
            month,
            day,
            ts.rem_euclid(SECONDS_PER_DAY) as u32,
        ))
    }

    pub fn to_unix(self) -> Result<i64, TokenomicsError> {
        if self.second_of_day as i64 >= SECONDS_PER_DAY
            || self.day == 0
            || self.day > days_in_month(self.year, self.month)?
        {
            return Err(TokenomicsError::InvalidTimestamp);
        }
        days_from_civil(self.year, self.month, self.day)
            .checked_mul(SECONDS_PER_DAY)
            .and_then(|s| s.checked_add(self.second_of_day as i64))
            .ok_or(TokenomicsError::MathOverflow)
    }

    /// Months since year 0, January.
    fn month_ordinal(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    fn shifted_by_months(self, months: u32) -> Result<Self, TokenomicsError> {
        let ordinal = self
            .month_ordinal()
            .checked_add(months as i64)
            .ok_or(TokenomicsError::MathOverflow)?;
        let year = i32::try_from(ordinal.div_euclid(12))
            .map_err(|_| TokenomicsError::MathOverflow)?;
        let month = ordinal.rem_euclid(12) as u32 + 1;
        let day = self.day.min(days_in_month(year, month)?);
        Ok(Self::new(year, month, day, self.second_of_day))
    }
}

/// Timestamp of the `months`-th calendar-month boundary after `anchor_ts`.
pub fn add_months(anchor_ts: i64, months: u32) -> Result<i64, TokenomicsError> {
    CivilDateTime::from_unix(anchor_ts)?
        .shifted_by_months(months)?
        .to_unix()
}

/// Number of whole calendar-month boundaries crossed between `anchor_ts` and
/// `now_ts`. Zero when `now_ts` precedes the anchor.
pub fn months_elapsed(anchor_ts: i64, now_ts: i64) -> Result<u32, TokenomicsError> {
    if now_ts < anchor_ts {
        return Ok(0);
    }
    let anchor = CivilDateTime::from_unix(anchor_ts)?;
    let now = CivilDateTime::from_unix(now_ts)?;
    let diff = now.month_ordinal() - anchor.month_ordinal();
    let mut months = u32::try_from(diff).map_err(|_| TokenomicsError::MathOverflow)?;
    // The boundary in the current month may still lie ahead of `now`.
    if months > 0 && add_months(anchor_ts, months)? > now_ts {
        months -= 1;
    }
    Ok(months)
}

fn days_in_month(year: i32, month: u32) -> Result<u32, TokenomicsError> {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Ok(31),
        4 | 6 | 9 | 11 => Ok(30),
        2 if is_leap_year(year) => Ok(29),
        2 => Ok(28),
        _ => Err(TokenomicsError::InvalidTimestamp),
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Days since 1970-01-01 for a civil date (Howard Hinnant's algorithm, years
/// counted from March so the leap day is last).
fn days_from_civil(year: i32, month: u32, day: u32) -> i64 {
    let year = year as i64 - i64::from(month <= 2);
    let era = year.div_euclid(400);
    let year_of_era = year - era * 400;
    let march_month = (month as i64 + 9) % 12;
    let day_of_year = (153 * march_month + 2) / 5 + day as i64 - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * DAYS_PER_ERA + day_of_era - EPOCH_SHIFT_DAYS
}

/// Inverse of [`days_from_civil`].
fn civil_from_days(days: i64) -> (i32, u32, u32) {
    let shifted = days + EPOCH_SHIFT_DAYS;
    let era = shifted.div_euclid(DAYS_PER_ERA);
    let day_of_era = shifted - era * DAYS_PER_ERA;
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let march_month = (5 * day_of_year + 2) / 153;
    let day = (day_of_year - (153 * march_month + 2) / 5 + 1) as u32;
    let month = ((march_month + 2) % 12 + 1) as u32;
    let year = year_of_era + era * 400 + i64::from(month <= 2);
    (year as i32, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: i32, m: u32, d: u32, sod: u32) -> i64 {
        CivilDateTime::new(y, m, d, sod).to_unix().unwrap()
    }

    #[test]
    fn known_unix_dates() {
        assert_eq!(ts(1970, 1, 1, 0), 0);
        assert_eq!(ts(2000, 3, 1, 0), 951_868_800);
        assert_eq!(ts(2022, 4, 1, 0), 1_648_771_200);
        assert_eq!(
            CivilDateTime::from_unix(1_648_771_200 + 3_600).unwrap(),
            CivilDateTime::new(2022, 4, 1, 3_600)
        );
        assert!(CivilDateTime::new(2023, 2, 29, 0).to_unix().is_err());
    }

    #[test]
    fn month_boundary_inclusive() {
        let start = ts(2026, 4, 11, 0);
        assert_eq!(months_elapsed(start, start).unwrap(), 0);

        let b1 = ts(2026, 5, 11, 0);
        assert_eq!(add_months(start, 1).unwrap(), b1);
        assert_eq!(months_elapsed(start, b1).unwrap(), 1);
        assert_eq!(months_elapsed(start, b1 - 1).unwrap(), 0);
        assert_eq!(months_elapsed(start, start - 1).unwrap(), 0);
    }

    #[test]
    fn short_month_clamp_without_drift() {
        // 2024 is a leap year: Jan 31 + 1 month => Feb 29, + 2 months => Mar 31.
        let start = ts(2024, 1, 31, 0);
        assert_eq!(add_months(start, 1).unwrap(), ts(2024, 2, 29, 0));
        assert_eq!(add_months(start, 2).unwrap(), ts(2024, 3, 31, 0));
        assert_eq!(add_months(start, 13).unwrap(), ts(2025, 2, 28, 0));

        let feb29 = ts(2024, 2, 29, 0);
        assert_eq!(months_elapsed(start, feb29).unwrap(), 1);
        assert_eq!(months_elapsed(start, feb29 - 1).unwrap(), 0);
        assert_eq!(months_elapsed(start, ts(2024, 3, 30, 0)).unwrap(), 1);
    }

    #[test]
    fn months_elapsed_over_years() {
        let start = ts(2022, 4, 1, 0);
        assert_eq!(months_elapsed(start, ts(2030, 4, 1, 0)).unwrap(), 96);
        assert_eq!(months_elapsed(start, ts(2030, 3, 31, 86_399)).unwrap(), 95);
    }
}
