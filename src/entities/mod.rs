// Entity records and the registries that own them

pub mod account;
pub mod branch;
pub mod customer;

pub use account::{Account, AccountFactory, AccountType, DEFAULT_MAX_ACCOUNTS};
pub use branch::{Branch, BranchDirectory};
pub use customer::{
    normalize_tax_id, validate_full_name, validate_tax_id, Customer, CustomerRegistry,
    NewCustomer, Screening,
};
