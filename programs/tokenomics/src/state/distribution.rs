use anchor_lang::prelude::*;

use crate::constants::CATEGORY_COUNT;
use crate::error::TokenomicsError;
use crate::state::{Fraction, ReleaseInterval};

/// Stakeholder categories, in the order their wallets are passed to `trigger_release`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CategoryKind {
    #[default]
    Seed,
    Private,
    StrategicSale,
    Public,
    Team,
    Advisors,
    Liquidity,
    StrategicReserve,
    Community,
}

impl CategoryKind {
    pub const ALL: [CategoryKind; CATEGORY_COUNT] = [
        CategoryKind::Seed,
        CategoryKind::Private,
        CategoryKind::StrategicSale,
        CategoryKind::Public,
        CategoryKind::Team,
        CategoryKind::Advisors,
        CategoryKind::Liquidity,
        CategoryKind::StrategicReserve,
        CategoryKind::Community,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Instruction input for one category.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoryConfig {
    pub kind: CategoryKind,
    /// Destination token account.
    pub wallet: Pubkey,
    pub total_allocation: u64,
    /// Lump sum unlocked once at the generation event.
    pub initial_unlock: u64,
    /// Intervals between the generation event and the first linear release.
    pub cliff_intervals: u16,
    pub release_count: u16,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Category {
    pub kind: CategoryKind,
    pub wallet: Pubkey,
    pub total_allocation: u64,
    pub initial_unlock: u64,
    pub cliff_intervals: u16,
    pub release_count: u16,
    pub released_amount: u64,
}

impl Category {
    pub const SIZE: usize =
        1 +  // kind
        32 + // wallet
        8 +  // total_allocation
        8 +  // initial_unlock
        2 +  // cliff_intervals
        2 +  // release_count
        8;   // released_amount

    /// Share of the linear part unlocked at `now_ts`. Release `k` falls
    /// `cliff_intervals + k` intervals after the generation event.
    pub fn linear_fraction(
        &self,
        generation_event_ts: i64,
        interval: ReleaseInterval,
        now_ts: i64,
    ) -> core::result::Result<Fraction, TokenomicsError> {
        interval.validate()?;
        let unlocked = interval.steps_unlocked(
            generation_event_ts,
            self.cliff_intervals as u32,
            self.release_count,
            now_ts,
        )?;
        Ok(Fraction {
            numerator: unlocked as u64,
            denominator: self.release_count as u64,
        })
    }

    /// Cumulative amount this category may have received at `now_ts`.
    pub fn unlocked_amount(
        &self,
        generation_event_ts: i64,
        interval: ReleaseInterval,
        now_ts: i64,
    ) -> core::result::Result<u64, TokenomicsError> {
        if now_ts < generation_event_ts {
            return Ok(0);
        }
        let linear_total = self
            .total_allocation
            .checked_sub(self.initial_unlock)
            .ok_or(TokenomicsError::MathOverflow)?;
        let linear = self
            .linear_fraction(generation_event_ts, interval, now_ts)?
            .of(linear_total)?;
        self.initial_unlock
            .checked_add(linear)
            .ok_or(TokenomicsError::MathOverflow)
    }

    pub fn releasable(
        &self,
        generation_event_ts: i64,
        interval: ReleaseInterval,
        now_ts: i64,
    ) -> core::result::Result<u64, TokenomicsError> {
        self.unlocked_amount(generation_event_ts, interval, now_ts)?
            .checked_sub(self.released_amount)
            .ok_or(TokenomicsError::MathOverflow)
    }
}

/// Singleton PDA of the category distribution ledger.
#[account]
#[derive(Default, Debug)]
pub struct DistributionState {
    /// Admin authority.
    pub admin: Pubkey,
    /// Distributed token mint (mint authority = this PDA).
    pub mint: Pubkey,
    /// Hard cap on the token supply.
    pub supply_cap: u64,
    /// Release interval shared by every category.
    pub interval: ReleaseInterval,
    /// Generation event (TGE) timestamp; 0 while unset.
    pub generation_event_ts: i64,
    /// Categories were configured (one-time).
    pub configured: bool,
    /// Sum of all category allocations.
    pub total_allocated: u64,
    /// Sum of all category `released_amount`s.
    pub total_released: u64,
    pub categories: [Category; CATEGORY_COUNT],
    pub bump: u8,
}

impl DistributionState {
    pub const SIZE: usize =
        32 + // admin
        32 + // mint
        8 +  // supply_cap
        ReleaseInterval::SIZE + // interval
        8 +  // generation_event_ts
        1 +  // configured
        8 +  // total_allocated
        8 +  // total_released
        Category::SIZE * CATEGORY_COUNT + // categories
        1;   // bump

    pub fn configure(
        &mut self,
        inputs: &[CategoryConfig],
    ) -> core::result::Result<(), TokenomicsError> {
        if self.configured {
            return Err(TokenomicsError::AlreadyConfigured);
        }
        if inputs.len() != CATEGORY_COUNT {
            return Err(TokenomicsError::InvalidCategoryCount);
        }

        let mut categories = [Category::default(); CATEGORY_COUNT];
        let mut seen = [false; CATEGORY_COUNT];
        let mut total: u64 = 0;
        for input in inputs {
            let idx = input.kind.index();
            if seen[idx] {
                return Err(TokenomicsError::DuplicateCategory);
            }
            seen[idx] = true;

            if input.wallet == Pubkey::default() || input.initial_unlock > input.total_allocation {
                return Err(TokenomicsError::InvalidConfig);
            }
            if input.release_count == 0 {
                return Err(TokenomicsError::InvalidSchedule);
            }
            total = total
                .checked_add(input.total_allocation)
                .ok_or(TokenomicsError::AllocationExceeded)?;

            categories[idx] = Category {
                kind: input.kind,
                wallet: input.wallet,
                total_allocation: input.total_allocation,
                initial_unlock: input.initial_unlock,
                cliff_intervals: input.cliff_intervals,
                release_count: input.release_count,
                released_amount: 0,
            };
        }
        if total > self.supply_cap {
            return Err(TokenomicsError::AllocationExceeded);
        }

        self.categories = categories;
        self.total_allocated = total;
        self.configured = true;
        Ok(())
    }

    pub fn has_started_releasing(&self) -> bool {
        self.total_released > 0
    }

    pub fn set_generation_event_date(
        &mut self,
        ts: i64,
    ) -> core::result::Result<(), TokenomicsError> {
        if self.has_started_releasing() {
            return Err(TokenomicsError::ReleaseAlreadyStarted);
        }
        if self.generation_event_ts != 0 {
            return Err(TokenomicsError::GenerationEventAlreadySet);
        }
        if ts <= 0 {
            return Err(TokenomicsError::InvalidTimestamp);
        }
        self.generation_event_ts = ts;
        Ok(())
    }

    /// Per-category amounts that became releasable since the last release.
    pub fn pending_releases(
        &self,
        now_ts: i64,
    ) -> core::result::Result<[u64; CATEGORY_COUNT], TokenomicsError> {
        if !self.configured {
            return Err(TokenomicsError::NotConfigured);
        }
        if self.generation_event_ts == 0 {
            return Err(TokenomicsError::GenerationEventNotSet);
        }
        let mut deltas = [0u64; CATEGORY_COUNT];
        for (delta, category) in deltas.iter_mut().zip(self.categories.iter()) {
            *delta = category.releasable(self.generation_event_ts, self.interval, now_ts)?;
        }
        Ok(deltas)
    }

    /// Books released amounts; returns their sum.
    pub fn record_releases(
        &mut self,
        deltas: &[u64; CATEGORY_COUNT],
    ) -> core::result::Result<u64, TokenomicsError> {
        let mut updated = self.categories;
        let mut sum: u64 = 0;
        for (category, delta) in updated.iter_mut().zip(deltas.iter()) {
            category.released_amount = category
                .released_amount
                .checked_add(*delta)
                .ok_or(TokenomicsError::MathOverflow)?;
            if category.released_amount > category.total_allocation {
                return Err(TokenomicsError::AllocationExceeded);
            }
            sum = sum.checked_add(*delta).ok_or(TokenomicsError::MathOverflow)?;
        }
        let total_released = self
            .total_released
            .checked_add(sum)
            .ok_or(TokenomicsError::MathOverflow)?;
        if total_released > self.supply_cap {
            return Err(TokenomicsError::AllocationExceeded);
        }

        self.categories = updated;
        self.total_released = total_released;
        Ok(sum)
    }

    /// Computes and books the release due at `now_ts`.
    pub fn release(
        &mut self,
        now_ts: i64,
    ) -> core::result::Result<[u64; CATEGORY_COUNT], TokenomicsError> {
        let deltas = self.pending_releases(now_ts)?;
        self.record_releases(&deltas)?;
        Ok(deltas)
    }

    pub fn category(&self, kind: CategoryKind) -> &Category {
        &self.categories[kind.index()]
    }
}
