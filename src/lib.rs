// Bank Ledger - Core Library
// Ledger, customer registry, account factory and the session controller

pub mod config;
pub mod entities;
pub mod error;
pub mod ledger;
pub mod logger;
pub mod policy;
pub mod session;

// Re-export commonly used types
pub use config::{CliArgs, Config, PolicyConfig, SessionConfig};
pub use entities::{
    normalize_tax_id, validate_full_name, validate_tax_id, Account, AccountFactory, AccountType,
    Branch, BranchDirectory, Customer, CustomerRegistry, NewCustomer, Screening,
};
pub use error::{BankError, Result};
pub use ledger::{EntryKind, Ledger, LedgerEntry, Statement};
pub use policy::WithdrawalPolicy;
pub use session::{parse_amount, Command, Flow, Session, SessionState, Snapshot};
