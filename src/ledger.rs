// 📒 Ledger - single running balance + append-only transaction history
//
// The balance never goes negative: withdrawals are screened by the
// WithdrawalPolicy before anything is mutated.

use crate::error::{BankError, Result};
use crate::policy::WithdrawalPolicy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const NO_TRANSACTIONS: &str = "No transactions recorded.";

// ============================================================================
// LEDGER ENTRY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    Deposit,
    Withdrawal,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Deposit => "Deposit",
            EntryKind::Withdrawal => "Withdrawal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub kind: EntryKind,
    pub amount: f64,
    pub recorded_at: DateTime<Utc>,
}

impl LedgerEntry {
    fn new(kind: EntryKind, amount: f64) -> Self {
        LedgerEntry {
            kind,
            amount,
            recorded_at: Utc::now(),
        }
    }

    /// Human-readable history line, e.g. "Deposit: 1000.00"
    pub fn line(&self) -> String {
        format!("{}: {:.2}", self.kind.as_str(), self.amount)
    }
}

// ============================================================================
// LEDGER
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    balance: f64,
    history: Vec<LedgerEntry>,
    /// Successful withdrawals this session, never decreases
    withdrawal_count: u32,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn history(&self) -> &[LedgerEntry] {
        &self.history
    }

    pub fn withdrawal_count(&self) -> u32 {
        self.withdrawal_count
    }

    pub fn history_lines(&self) -> Vec<String> {
        self.history.iter().map(LedgerEntry::line).collect()
    }

    /// Add `amount` to the balance. Returns the new balance.
    pub fn deposit(&mut self, amount: f64) -> Result<f64> {
        if amount.is_nan() || amount <= 0.0 {
            tracing::warn!(amount, "deposit rejected: invalid amount");
            return Err(BankError::InvalidAmount { amount });
        }

        self.balance += amount;
        self.history.push(LedgerEntry::new(EntryKind::Deposit, amount));
        tracing::info!(amount, balance = self.balance, "deposit applied");

        Ok(self.balance)
    }

    /// Take `amount` out of the balance if `policy` allows it. Returns the new balance.
    pub fn withdraw(&mut self, amount: f64, policy: &WithdrawalPolicy) -> Result<f64> {
        if let Err(err) = policy.check(self.balance, amount, self.withdrawal_count) {
            tracing::warn!(amount, balance = self.balance, %err, "withdrawal rejected");
            return Err(err);
        }

        self.balance -= amount;
        self.history
            .push(LedgerEntry::new(EntryKind::Withdrawal, amount));
        self.withdrawal_count += 1;
        tracing::info!(
            amount,
            balance = self.balance,
            withdrawal_count = self.withdrawal_count,
            "withdrawal applied"
        );

        Ok(self.balance)
    }

    pub fn statement(&self) -> Statement {
        Statement {
            lines: self.history_lines(),
            balance: self.balance,
        }
    }

    pub fn render_statement(&self) -> String {
        self.statement().to_string()
    }
}

// ============================================================================
// STATEMENT
// ============================================================================

/// Read-only snapshot of the ledger for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    pub lines: Vec<String>,
    pub balance: f64,
}

impl Statement {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "================ STATEMENT ================")?;
        if self.lines.is_empty() {
            writeln!(f, "{}", NO_TRANSACTIONS)?;
        } else {
            for line in &self.lines {
                writeln!(f, "{}", line)?;
            }
        }
        writeln!(f)?;
        writeln!(f, "Balance: {:.2}", self.balance)?;
        write!(f, "===========================================")
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_ledger_is_empty() {
        let ledger = Ledger::new();
        assert_eq!(ledger.balance(), 0.0);
        assert!(ledger.history().is_empty());
        assert_eq!(ledger.withdrawal_count(), 0);
    }

    #[test]
    fn test_deposit_appends_line() {
        let mut ledger = Ledger::new();
        let balance = ledger.deposit(1000.0).unwrap();

        assert_eq!(balance, 1000.0);
        assert_eq!(ledger.history_lines(), vec!["Deposit: 1000.00"]);
        assert_eq!(ledger.history()[0].kind, EntryKind::Deposit);
    }

    #[test]
    fn test_deposit_rejects_non_positive() {
        let mut ledger = Ledger::new();
        ledger.deposit(50.0).unwrap();

        assert_eq!(
            ledger.deposit(0.0),
            Err(BankError::InvalidAmount { amount: 0.0 })
        );
        assert!(ledger.deposit(-20.0).is_err());
        assert!(ledger.deposit(f64::NAN).is_err());

        assert_eq!(ledger.balance(), 50.0);
        assert_eq!(ledger.history().len(), 1);
    }

    #[test]
    fn test_withdraw_success_increments_count() {
        let mut ledger = Ledger::new();
        let policy = WithdrawalPolicy::default();
        ledger.deposit(1000.0).unwrap();

        let balance = ledger.withdraw(500.0, &policy).unwrap();
        assert_eq!(balance, 500.0);
        assert_eq!(ledger.withdrawal_count(), 1);
        assert_eq!(ledger.history_lines()[1], "Withdrawal: 500.00");
    }

    #[test]
    fn test_withdraw_rejection_leaves_state_untouched() {
        let mut ledger = Ledger::new();
        let policy = WithdrawalPolicy::default();
        ledger.deposit(1000.0).unwrap();

        let err = ledger.withdraw(600.0, &policy).unwrap_err();
        assert!(matches!(err, BankError::LimitExceeded { .. }));
        assert_eq!(ledger.balance(), 1000.0);
        assert_eq!(ledger.history().len(), 1);
        assert_eq!(ledger.withdrawal_count(), 0);
    }

    #[test]
    fn test_withdraw_exact_balance_allowed() {
        let mut ledger = Ledger::new();
        let policy = WithdrawalPolicy::default();
        ledger.deposit(300.0).unwrap();

        assert_eq!(ledger.withdraw(300.0, &policy), Ok(0.0));
    }

    #[test]
    fn test_max_withdrawals_enforced() {
        let mut ledger = Ledger::new();
        let policy = WithdrawalPolicy::default();
        ledger.deposit(1000.0).unwrap();

        for _ in 0..3 {
            ledger.withdraw(10.0, &policy).unwrap();
        }

        assert_eq!(
            ledger.withdraw(10.0, &policy),
            Err(BankError::MaxWithdrawalsExceeded { max: 3 })
        );
        assert_eq!(ledger.withdrawal_count(), 3);
        assert_eq!(ledger.balance(), 970.0);
    }

    #[test]
    fn test_statement_without_transactions() {
        let ledger = Ledger::new();
        let text = ledger.render_statement();

        assert!(text.contains(NO_TRANSACTIONS));
        assert!(text.contains("Balance: 0.00"));
    }

    #[test]
    fn test_statement_lists_history_then_balance() {
        let mut ledger = Ledger::new();
        let policy = WithdrawalPolicy::default();
        ledger.deposit(1000.0).unwrap();
        ledger.withdraw(500.0, &policy).unwrap();

        let statement = ledger.statement();
        assert!(!statement.is_empty());

        let text = statement.to_string();
        let deposit_at = text.find("Deposit: 1000.00").unwrap();
        let withdrawal_at = text.find("Withdrawal: 500.00").unwrap();
        let balance_at = text.find("Balance: 500.00").unwrap();
        assert!(deposit_at < withdrawal_at && withdrawal_at < balance_at);
        assert!(!text.contains(NO_TRANSACTIONS));
    }

    proptest! {
        #[test]
        fn prop_deposit_adds_amount(start in 0.0f64..1_000_000.0, amount in 0.01f64..1_000_000.0) {
            let mut ledger = Ledger::new();
            if start > 0.0 {
                ledger.deposit(start).unwrap();
            }
            let before = ledger.history().len();

            let balance = ledger.deposit(amount).unwrap();

            prop_assert_eq!(balance, start + amount);
            prop_assert_eq!(ledger.history().len(), before + 1);
        }

        #[test]
        fn prop_non_positive_deposit_is_noop(amount in -1_000_000.0f64..=0.0) {
            let mut ledger = Ledger::new();
            ledger.deposit(100.0).unwrap();

            prop_assert!(ledger.deposit(amount).is_err());
            prop_assert_eq!(ledger.balance(), 100.0);
            prop_assert_eq!(ledger.history().len(), 1);
        }

        #[test]
        fn prop_withdraw_never_overdraws(start in 0.01f64..2_000.0, amount in -100.0f64..2_000.0) {
            let mut ledger = Ledger::new();
            let policy = WithdrawalPolicy::default();
            ledger.deposit(start).unwrap();

            let result = ledger.withdraw(amount, &policy);

            prop_assert!(ledger.balance() >= 0.0);
            if amount > start {
                prop_assert_eq!(
                    result,
                    Err(BankError::InsufficientFunds { balance: start, amount })
                );
                prop_assert_eq!(ledger.balance(), start);
            }
        }

        #[test]
        fn prop_over_limit_rejected_even_when_covered(amount in 500.01f64..5_000.0) {
            let mut ledger = Ledger::new();
            let policy = WithdrawalPolicy::default();
            ledger.deposit(10_000.0).unwrap();

            let result = ledger.withdraw(amount, &policy);
            prop_assert!(
                matches!(result, Err(BankError::LimitExceeded { .. })),
                "expected LimitExceeded, got {:?}",
                result
            );
            prop_assert_eq!(ledger.withdrawal_count(), 0);
        }

        #[test]
        fn prop_fourth_withdrawal_rejected(amount in 0.01f64..=500.0) {
            let mut ledger = Ledger::new();
            let policy = WithdrawalPolicy::default();
            ledger.deposit(10_000.0).unwrap();
            for _ in 0..3 {
                ledger.withdraw(1.0, &policy).unwrap();
            }

            prop_assert_eq!(
                ledger.withdraw(amount, &policy),
                Err(BankError::MaxWithdrawalsExceeded { max: 3 })
            );
        }
    }
}
