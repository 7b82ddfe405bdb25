// 🚦 Withdrawal Policy - per-transaction limit, withdrawal cap, balance check
//
// Checks run in a fixed order and the first failing one wins:
//   1. insufficient funds
//   2. per-transaction limit
//   3. withdrawal count
//   4. non-positive amount

use crate::error::{BankError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_WITHDRAWAL_LIMIT: f64 = 500.0;
pub const DEFAULT_MAX_WITHDRAWALS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalPolicy {
    /// Largest amount a single withdrawal may take
    pub limit: f64,

    /// Successful withdrawals allowed per session
    pub max_withdrawals: u32,
}

impl WithdrawalPolicy {
    pub fn new(limit: f64, max_withdrawals: u32) -> Self {
        WithdrawalPolicy {
            limit,
            max_withdrawals,
        }
    }

    /// Decide whether `amount` may be withdrawn
    pub fn check(&self, balance: f64, amount: f64, withdrawal_count: u32) -> Result<()> {
        if amount > balance {
            return Err(BankError::InsufficientFunds { balance, amount });
        }

        if amount > self.limit {
            return Err(BankError::LimitExceeded {
                amount,
                limit: self.limit,
            });
        }

        if withdrawal_count >= self.max_withdrawals {
            return Err(BankError::MaxWithdrawalsExceeded {
                max: self.max_withdrawals,
            });
        }

        // NaN fails this comparison too
        if amount > 0.0 {
            Ok(())
        } else {
            Err(BankError::InvalidAmount { amount })
        }
    }

    /// Withdrawals still available after `withdrawal_count` successful ones
    pub fn remaining(&self, withdrawal_count: u32) -> u32 {
        self.max_withdrawals.saturating_sub(withdrawal_count)
    }
}

impl Default for WithdrawalPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_WITHDRAWAL_LIMIT, DEFAULT_MAX_WITHDRAWALS)
    }
}

// ============================================================================
// TESTS
// ============================================================================
