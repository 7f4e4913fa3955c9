use anchor_lang::prelude::*;

use crate::error::TokenomicsError;
use crate::utils::amount::mul_div;

/// Instruction input for `initialize_stake_pool`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StakeConfig {
    /// Shortest accepted lock, seconds.
    pub lock_time_period_min: i64,
    /// Longest accepted lock, seconds.
    pub lock_time_period_max: i64,
    /// Staked base units x seconds per reward base unit.
    pub reward_factor: u64,
}

impl StakeConfig {
    pub fn validate(&self) -> core::result::Result<(), TokenomicsError> {
        if self.lock_time_period_min < 0
            || self.lock_time_period_min > self.lock_time_period_max
            || self.reward_factor == 0
        {
            return Err(TokenomicsError::InvalidConfig);
        }
        Ok(())
    }
}

#[account]
#[derive(Default, Debug)]
pub struct StakePool {
    pub admin: Pubkey,
    pub stake_mint: Pubkey,
    /// May equal `stake_mint`.
    pub reward_mint: Pubkey,
    pub lock_time_period_min: i64,
    pub lock_time_period_max: i64,
    pub reward_factor: u64,
    pub total_staked: u64,
    /// Reward folded into positions, still held by the reward vault.
    pub total_restaked: u64,
    pub total_rewards_paid: u64,
    pub bump: u8,
}

impl StakePool {
    pub const SIZE: usize =
        32 + // admin
        32 + // stake_mint
        32 + // reward_mint
        8 +  // lock_time_period_min
        8 +  // lock_time_period_max
        8 +  // reward_factor
        8 +  // total_staked
        8 +  // total_restaked
        8 +  // total_rewards_paid
        1;   // bump

    pub fn apply_config(
        &mut self,
        config: &StakeConfig,
    ) -> core::result::Result<(), TokenomicsError> {
        config.validate()?;
        self.lock_time_period_min = config.lock_time_period_min;
        self.lock_time_period_max = config.lock_time_period_max;
        self.reward_factor = config.reward_factor;
        Ok(())
    }

    pub fn check_lock_duration(
        &self,
        lock_duration: i64,
    ) -> core::result::Result<(), TokenomicsError> {
        if lock_duration < self.lock_time_period_min || lock_duration > self.lock_time_period_max {
            return Err(TokenomicsError::LockDurationOutOfRange);
        }
        Ok(())
    }

    /// Part of the reward vault balance not owed back to restaked positions.
    pub fn available_rewards(&self, reward_vault_amount: u64) -> u64 {
        reward_vault_amount.saturating_sub(self.total_restaked)
    }
}

/// A staker's locked principal and reward accrual baseline.
#[account]
#[derive(Default, Debug)]
pub struct StakePosition {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub staked_amount: u64,
    pub lock_duration: i64,
    pub stake_start_ts: i64,
    /// Reward accrues on `staked_amount` from here.
    pub last_accrual_ts: i64,
    /// Reward accrued before the latest deposit, not yet paid.
    pub pending_reward: u64,
    /// Restaked reward. Earns like principal, paid from the reward vault on unstake.
    pub restaked_reward: u64,
    pub bump: u8,
}

impl StakePosition {
    pub const SIZE: usize =
        32 + // pool
        32 + // owner
        8 +  // staked_amount
        8 +  // lock_duration
        8 +  // stake_start_ts
        8 +  // last_accrual_ts
        8 +  // pending_reward
        8 +  // restaked_reward
        1;   // bump

    pub fn unlock_ts(&self) -> core::result::Result<i64, TokenomicsError> {
        self.stake_start_ts
            .checked_add(self.lock_duration)
            .ok_or(TokenomicsError::MathOverflow)
    }

    /// Amount reward accrues on: deposits plus restaked reward.
    pub fn earning_balance(&self) -> core::result::Result<u64, TokenomicsError> {
        self.staked_amount
            .checked_add(self.restaked_reward)
            .ok_or(TokenomicsError::MathOverflow)
    }

    /// Reward earned and not yet paid at `now_ts`.
    pub fn earned(
        &self,
        pool: &StakePool,
        now_ts: i64,
    ) -> core::result::Result<u64, TokenomicsError> {
        let elapsed = now_ts.saturating_sub(self.last_accrual_ts).max(0) as u64;
        let accrued = mul_div(self.earning_balance()?, elapsed, pool.reward_factor)?;
        self.pending_reward
            .checked_add(accrued)
            .ok_or(TokenomicsError::MathOverflow)
    }

    fn accrue(
        &mut self,
        pool: &StakePool,
        now_ts: i64,
    ) -> core::result::Result<(), TokenomicsError> {
        self.pending_reward = self.earned(pool, now_ts)?;
        self.last_accrual_ts = now_ts;
        Ok(())
    }

    /// Adds principal. Reward accrued so far is kept aside so the new amount
    /// only earns from `now_ts`; the lock ends at the later of the old and new end.
    pub fn deposit(
        &mut self,
        pool: &mut StakePool,
        amount: u64,
        lock_duration: i64,
        now_ts: i64,
    ) -> core::result::Result<(), TokenomicsError> {
        pool.check_lock_duration(lock_duration)?;
        if amount == 0 {
            return Err(TokenomicsError::InvalidAmount);
        }
        let staked_amount = self
            .staked_amount
            .checked_add(amount)
            .ok_or(TokenomicsError::MathOverflow)?;
        let total_staked = pool
            .total_staked
            .checked_add(amount)
            .ok_or(TokenomicsError::MathOverflow)?;
        let new_unlock = now_ts
            .checked_add(lock_duration)
            .ok_or(TokenomicsError::MathOverflow)?;

        self.accrue(pool, now_ts)?;
        if self.staked_amount == 0 || new_unlock >= self.unlock_ts()? {
            self.stake_start_ts = now_ts;
            self.lock_duration = lock_duration;
        }
        self.staked_amount = staked_amount;
        pool.total_staked = total_staked;
        Ok(())
    }

    /// Takes the earned reward for payout and resets the accrual baseline.
    pub fn claim(
        &mut self,
        pool: &mut StakePool,
        now_ts: i64,
    ) -> core::result::Result<u64, TokenomicsError> {
        let reward = self.earned(pool, now_ts)?;
        let total_rewards_paid = pool
            .total_rewards_paid
            .checked_add(reward)
            .ok_or(TokenomicsError::MathOverflow)?;
        self.pending_reward = 0;
        self.last_accrual_ts = now_ts;
        pool.total_rewards_paid = total_rewards_paid;
        Ok(reward)
    }

    /// Folds the earned reward into the earning balance and resets the accrual
    /// baseline. The tokens stay in the reward vault until `withdraw`, which
    /// works whether or not the reward and stake mints match.
    pub fn restake(
        &mut self,
        pool: &mut StakePool,
        now_ts: i64,
    ) -> core::result::Result<u64, TokenomicsError> {
        if self.staked_amount == 0 {
            return Err(TokenomicsError::NothingStaked);
        }
        let reward = self.earned(pool, now_ts)?;
        let restaked_reward = self
            .restaked_reward
            .checked_add(reward)
            .ok_or(TokenomicsError::MathOverflow)?;
        let total_restaked = pool
            .total_restaked
            .checked_add(reward)
            .ok_or(TokenomicsError::MathOverflow)?;

        self.restaked_reward = restaked_reward;
        self.pending_reward = 0;
        self.last_accrual_ts = now_ts;
        pool.total_restaked = total_restaked;
        Ok(reward)
    }

    /// Reward paid out by `withdraw` at `now_ts`: earned plus restaked.
    pub fn reward_due(
        &self,
        pool: &StakePool,
        now_ts: i64,
    ) -> core::result::Result<u64, TokenomicsError> {
        self.earned(pool, now_ts)?
            .checked_add(self.restaked_reward)
            .ok_or(TokenomicsError::MathOverflow)
    }

    /// Closes out the position once the lock has ended; returns
    /// `(principal, reward)` to pay from the stake and reward vaults.
    pub fn withdraw(
        &mut self,
        pool: &mut StakePool,
        now_ts: i64,
    ) -> core::result::Result<(u64, u64), TokenomicsError> {
        if self.staked_amount == 0 {
            return Err(TokenomicsError::NothingStaked);
        }
        if now_ts < self.unlock_ts()? {
            return Err(TokenomicsError::StakeLocked);
        }
        let principal = self.staked_amount;
        let reward = self.reward_due(pool, now_ts)?;
        let total_staked = pool
            .total_staked
            .checked_sub(principal)
            .ok_or(TokenomicsError::MathOverflow)?;
        let total_restaked = pool
            .total_restaked
            .checked_sub(self.restaked_reward)
            .ok_or(TokenomicsError::MathOverflow)?;
        let total_rewards_paid = pool
            .total_rewards_paid
            .checked_add(reward)
            .ok_or(TokenomicsError::MathOverflow)?;

        self.staked_amount = 0;
        self.restaked_reward = 0;
        self.pending_reward = 0;
        self.last_accrual_ts = now_ts;
        pool.total_staked = total_staked;
        pool.total_restaked = total_restaked;
        pool.total_rewards_paid = total_rewards_paid;
        Ok((principal, reward))
    }
}
