// 💳 Account Entity + Account Factory
//
// Accounts always belong to a customer. The factory appends them to the
// customer's list, bounded by the accounts-per-customer policy.
//
// Account number = "{branch}-{position:06}" where position is the 1-based
// slot in the owner's account list. First account is Checking, the rest Savings.

use crate::entities::customer::Customer;
use crate::error::{BankError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_ACCOUNTS: usize = 3;

// ============================================================================
// ACCOUNT TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    /// First account of a customer
    Checking,

    /// Every account after the first
    Savings,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "Checking",
            AccountType::Savings => "Savings",
        }
    }

    pub fn for_position(position: usize) -> Self {
        if position == 1 {
            AccountType::Checking
        } else {
            AccountType::Savings
        }
    }
}

// ============================================================================
// ACCOUNT ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Stable identity (UUID)
    pub id: String,

    /// Derived from branch code and position, e.g. "0001-000002"
    pub account_number: String,

    pub branch_code: String,
    pub account_type: AccountType,
    pub balance: f64,
    pub created_at: DateTime<Utc>,
}

impl Account {
    fn new(branch_code: &str, position: usize) -> Self {
        Account {
            id: uuid::Uuid::new_v4().to_string(),
            account_number: Self::format_number(branch_code, position),
            branch_code: branch_code.to_string(),
            account_type: AccountType::for_position(position),
            balance: 0.0,
            created_at: Utc::now(),
        }
    }

    /// Example: ("0001", 2) → "0001-000002"
    pub fn format_number(branch_code: &str, position: usize) -> String {
        format!("{}-{:06}", branch_code, position)
    }
}

// ============================================================================
// ACCOUNT FACTORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountFactory {
    pub max_accounts_per_customer: usize,
}

impl AccountFactory {
    pub fn new(max_accounts_per_customer: usize) -> Self {
        AccountFactory {
            max_accounts_per_customer,
        }
    }

    /// Open the next account for `customer` at `branch_code`.
    ///
    /// The account is appended to `customer.accounts`; a copy is returned.
    pub fn open_account(&self, customer: &mut Customer, branch_code: &str) -> Result<Account> {
        if customer.accounts.len() >= self.max_accounts_per_customer {
            tracing::warn!(
                customer = customer.sequence_number,
                max = self.max_accounts_per_customer,
                "account rejected: maximum accounts reached"
            );
            return Err(BankError::MaxAccountsReached {
                sequence_number: customer.sequence_number,
                max: self.max_accounts_per_customer,
            });
        }

        let position = customer.accounts.len() + 1;
        let account = Account::new(branch_code, position);
        customer.accounts.push(account.clone());

        tracing::info!(
            customer = customer.sequence_number,
            account_number = %account.account_number,
            account_type = account.account_type.as_str(),
            "account opened"
        );

        Ok(account)
    }
}

impl Default for AccountFactory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ACCOUNTS)
    }
}

// ============================================================================
// TESTS
// ============================================================================
