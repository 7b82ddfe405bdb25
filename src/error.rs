// ⚠️ Domain Errors - every rejected operation has a reason
// Nothing here is fatal: the session reports the message and keeps going.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BankError {
    #[error("Invalid amount: {amount:.2}. Amounts must be greater than zero")]
    InvalidAmount { amount: f64 },

    #[error("Insufficient funds: balance is {balance:.2}, requested {amount:.2}")]
    InsufficientFunds { balance: f64, amount: f64 },

    #[error("Amount {amount:.2} exceeds the per-withdrawal limit of {limit:.2}")]
    LimitExceeded { amount: f64, limit: f64 },

    #[error("Maximum number of withdrawals ({max}) exceeded")]
    MaxWithdrawalsExceeded { max: u32 },

    #[error("Invalid tax id '{raw}': expected 11 digits, found {digits}")]
    InvalidTaxId { raw: String, digits: usize },

    #[error("Tax id {tax_id} is already registered")]
    DuplicateTaxId { tax_id: String },

    #[error("Invalid name '{name}': provide first and last name using letters only")]
    InvalidName { name: String },

    #[error("Name '{name}' is already registered")]
    DuplicateName { name: String },

    #[error("Customer #{sequence_number} already holds the maximum of {max} accounts")]
    MaxAccountsReached { sequence_number: usize, max: usize },

    #[error("Invalid branch selection '{input}': choose a number between 1 and {available}")]
    InvalidBranchSelection { input: String, available: usize },

    #[error("Unknown branch code '{code}'")]
    UnknownBranch { code: String },

    #[error("No customer registered with tax id {tax_id}")]
    CustomerNotFound { tax_id: String },

    #[error("No customer selected")]
    NoCustomerSelected,

    #[error("Configuration error in '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },
}

impl BankError {
    /// True for rejections raised by the withdrawal/deposit rules
    pub fn is_ledger_rejection(&self) -> bool {
        matches!(
            self,
            BankError::InvalidAmount { .. }
                | BankError::InsufficientFunds { .. }
                | BankError::LimitExceeded { .. }
                | BankError::MaxWithdrawalsExceeded { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, BankError>;
