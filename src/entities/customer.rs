// 👤 Customer Entity + Customer Registry
//
// Invariants held by the registry at all times:
// - tax ids are stored normalized (11 digits) and are unique
// - full names are unique, compared trimmed and case-insensitively
// - sequence numbers are dense, 1-based, in registration order
//
// There is no removal operation, so `len + 1` is always the next sequence number.

use crate::entities::account::Account;
use crate::error::{BankError, Result};
use serde::{Deserialize, Serialize};

pub const TAX_ID_DIGITS: usize = 11;

// ============================================================================
// VALIDATION
// ============================================================================

/// Keep only the digits: "123.456.789-01" → "12345678901"
pub fn normalize_tax_id(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn validate_tax_id(raw: &str) -> bool {
    normalize_tax_id(raw).len() == TAX_ID_DIGITS
}

/// At least two tokens, letters only
pub fn validate_full_name(raw: &str) -> bool {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    tokens.len() >= 2 && tokens.iter().all(|t| t.chars().all(char::is_alphabetic))
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

// ============================================================================
// CUSTOMER ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// 1-based registration order, never reassigned
    pub sequence_number: usize,

    /// Normalized, digits only
    pub tax_id: String,

    pub full_name: String,

    /// Free text, format not validated
    pub birth_date: String,

    pub address: String,

    /// Opened through the AccountFactory, at most the configured maximum
    pub accounts: Vec<Account>,
}

impl Customer {
    pub fn has_accounts(&self) -> bool {
        !self.accounts.is_empty()
    }
}

/// Registration form as collected by the shell
#[derive(Debug, Clone, Default)]
pub struct NewCustomer {
    pub tax_id: String,
    pub full_name: String,
    pub birth_date: String,
    pub address: String,
}

/// Result of screening a stream of candidate values
#[derive(Debug, Clone, PartialEq)]
pub struct Screening {
    /// First candidate that passed, already normalized
    pub accepted: Option<String>,

    /// Candidates seen before the accepted one, with the reason each failed
    pub rejected: Vec<(String, BankError)>,
}

// ============================================================================
// CUSTOMER REGISTRY
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct CustomerRegistry {
    customers: Vec<Customer>,
}

impl CustomerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    pub fn is_tax_id_registered(&self, raw: &str) -> bool {
        let tax_id = normalize_tax_id(raw);
        self.customers.iter().any(|c| c.tax_id == tax_id)
    }

    pub fn is_name_registered(&self, raw: &str) -> bool {
        let key = name_key(raw);
        self.customers.iter().any(|c| name_key(&c.full_name) == key)
    }

    /// Normalized tax id if it is well-formed and not yet taken
    pub fn check_tax_id(&self, raw: &str) -> Result<String> {
        let tax_id = normalize_tax_id(raw);
        if tax_id.len() != TAX_ID_DIGITS {
            return Err(BankError::InvalidTaxId {
                raw: raw.trim().to_string(),
                digits: tax_id.len(),
            });
        }

        if self.is_tax_id_registered(&tax_id) {
            return Err(BankError::DuplicateTaxId { tax_id });
        }

        Ok(tax_id)
    }

    /// Trimmed name if it is well-formed and not yet taken
    pub fn check_full_name(&self, raw: &str) -> Result<String> {
        let name = raw.trim();
        if !validate_full_name(name) {
            return Err(BankError::InvalidName {
                name: name.to_string(),
            });
        }

        if self.is_name_registered(name) {
            return Err(BankError::DuplicateName {
                name: name.to_string(),
            });
        }

        Ok(name.to_string())
    }

    pub fn screen_tax_ids<'a, I>(&self, candidates: I) -> Screening
    where
        I: IntoIterator<Item = &'a str>,
    {
        screen(candidates, |c| self.check_tax_id(c))
    }

    pub fn screen_names<'a, I>(&self, candidates: I) -> Screening
    where
        I: IntoIterator<Item = &'a str>,
    {
        screen(candidates, |c| self.check_full_name(c))
    }

    /// Validate the form and append a new customer with the next sequence number
    pub fn register(&mut self, form: NewCustomer) -> Result<&Customer> {
        let tax_id = self.check_tax_id(&form.tax_id)?;
        let full_name = self.check_full_name(&form.full_name)?;

        let customer = Customer {
            sequence_number: self.customers.len() + 1,
            tax_id,
            full_name,
            birth_date: form.birth_date.trim().to_string(),
            address: form.address.trim().to_string(),
            accounts: Vec::new(),
        };

        tracing::info!(
            sequence_number = customer.sequence_number,
            "customer registered"
        );

        let index = self.customers.len();
        self.customers.push(customer);
        Ok(&self.customers[index])
    }

    pub fn find_by_tax_id(&self, raw: &str) -> Option<&Customer> {
        let tax_id = normalize_tax_id(raw);
        let found = self.customers.iter().find(|c| c.tax_id == tax_id);
        tracing::debug!(%tax_id, found = found.is_some(), "customer lookup");
        found
    }

    pub fn find_by_tax_id_mut(&mut self, raw: &str) -> Option<&mut Customer> {
        let tax_id = normalize_tax_id(raw);
        self.customers.iter_mut().find(|c| c.tax_id == tax_id)
    }

    pub fn find_by_sequence(&self, sequence_number: usize) -> Option<&Customer> {
        self.customers
            .iter()
            .find(|c| c.sequence_number == sequence_number)
    }

    pub fn find_by_sequence_mut(&mut self, sequence_number: usize) -> Option<&mut Customer> {
        self.customers
            .iter_mut()
            .find(|c| c.sequence_number == sequence_number)
    }

    /// All customers in ascending sequence-number order
    pub fn list_sorted(&self) -> Vec<&Customer> {
        let mut sorted: Vec<&Customer> = self.customers.iter().collect();
        sorted.sort_by_key(|c| c.sequence_number);
        sorted
    }
}

fn screen<'a, I, F>(candidates: I, check: F) -> Screening
where
    I: IntoIterator<Item = &'a str>,
    F: Fn(&str) -> Result<String>,
{
    let mut rejected = Vec::new();
    for candidate in candidates {
        match check(candidate) {
            Ok(value) => {
                return Screening {
                    accepted: Some(value),
                    rejected,
                }
            }
            Err(err) => rejected.push((candidate.to_string(), err)),
        }
    }

    Screening {
        accepted: None,
        rejected,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn form(tax_id: &str, full_name: &str) -> NewCustomer {
        NewCustomer {
            tax_id: tax_id.to_string(),
            full_name: full_name.to_string(),
            birth_date: "1990-01-01".to_string(),
            address: "Rua A, 1".to_string(),
        }
    }

    fn blank_customer(sequence_number: usize, tax_id: &str, full_name: &str) -> Customer {
        Customer {
            sequence_number,
            tax_id: tax_id.to_string(),
            full_name: full_name.to_string(),
            birth_date: String::new(),
            address: String::new(),
            accounts: Vec::new(),
        }
    }

    #[test]
    fn test_normalize_tax_id() {
        assert_eq!(normalize_tax_id("123.456.789-01"), "12345678901");
        assert_eq!(normalize_tax_id(" 12345678901 "), "12345678901");
        assert_eq!(normalize_tax_id("abc"), "");
    }

    #[test]
    fn test_validate_tax_id() {
        assert!(validate_tax_id("12345678901"));
        assert!(validate_tax_id("123.456.789-01"));
        assert!(!validate_tax_id("1234567890"));
        assert!(!validate_tax_id("123456789012"));
        assert!(!validate_tax_id(""));
    }

    #[test]
    fn test_validate_full_name() {
        assert!(validate_full_name("Maria Silva"));
        assert!(validate_full_name("  João   da Conceição "));
        assert!(!validate_full_name("Maria"));
        assert!(!validate_full_name("Maria S1lva"));
        assert!(!validate_full_name("Anne-Marie Dupont"));
        assert!(!validate_full_name("   "));
    }

    #[test]
    fn test_register_assigns_sequence_numbers() {
        let mut registry = CustomerRegistry::new();

        let first = registry
            .register(form("11111111111", "Ana Souza"))
            .unwrap()
            .sequence_number;
        let second = registry
            .register(form("22222222222", "Bruno Lima"))
            .unwrap()
            .sequence_number;
        let third = registry
            .register(form("33333333333", "Carla Dias"))
            .unwrap()
            .sequence_number;

        assert_eq!((first, second, third), (1, 2, 3));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_register_stores_normalized_tax_id() {
        let mut registry = CustomerRegistry::new();
        let customer = registry
            .register(form("123.456.789-01", "  Ana Souza "))
            .unwrap();

        assert_eq!(customer.tax_id, "12345678901");
        assert_eq!(customer.full_name, "Ana Souza");
        assert!(customer.accounts.is_empty());
        assert!(!customer.has_accounts());
    }

    #[test]
    fn test_duplicate_tax_id_after_normalization() {
        let mut registry = CustomerRegistry::new();
        registry
            .register(form("123.456.789-01", "Ana Souza"))
            .unwrap();

        let err = registry
            .register(form("12345678901", "Bruno Lima"))
            .unwrap_err();
        assert_eq!(
            err,
            BankError::DuplicateTaxId {
                tax_id: "12345678901".to_string()
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_name_is_case_insensitive() {
        let mut registry = CustomerRegistry::new();
        registry.register(form("11111111111", "Ana Souza")).unwrap();

        assert!(registry.is_name_registered("  ANA souza "));
        let err = registry
            .register(form("22222222222", "ana SOUZA"))
            .unwrap_err();
        assert!(matches!(err, BankError::DuplicateName { .. }));
    }

    #[test]
    fn test_invalid_fields_rejected() {
        let mut registry = CustomerRegistry::new();

        assert_eq!(
            registry.register(form("123", "Ana Souza")).unwrap_err(),
            BankError::InvalidTaxId {
                raw: "123".to_string(),
                digits: 3
            }
        );
        assert!(matches!(
            registry.register(form("11111111111", "Ana")),
            Err(BankError::InvalidName { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_screen_tax_ids_accepts_first_valid_unique() {
        let mut registry = CustomerRegistry::new();
        registry.register(form("11111111111", "Ana Souza")).unwrap();

        let screening =
            registry.screen_tax_ids(["12", "111.111.111-11", "22222222222", "33333333333"]);

        assert_eq!(screening.accepted.as_deref(), Some("22222222222"));
        assert_eq!(screening.rejected.len(), 2);
        assert!(matches!(
            screening.rejected[0].1,
            BankError::InvalidTaxId { .. }
        ));
        assert!(matches!(
            screening.rejected[1].1,
            BankError::DuplicateTaxId { .. }
        ));
    }

    #[test]
    fn test_screen_names_none_accepted() {
        let mut registry = CustomerRegistry::new();
        registry.register(form("11111111111", "Ana Souza")).unwrap();

        let screening = registry.screen_names(["Ana", "ana souza", "R2 D2"]);
        assert_eq!(screening.accepted, None);
        assert_eq!(screening.rejected.len(), 3);
    }

    #[test]
    fn test_find_by_tax_id_normalizes_input() {
        let mut registry = CustomerRegistry::new();
        registry.register(form("11111111111", "Ana Souza")).unwrap();

        let found = registry.find_by_tax_id("111.111.111-11");
        assert_eq!(found.map(|c| c.full_name.as_str()), Some("Ana Souza"));
        assert!(registry.find_by_tax_id("99999999999").is_none());
    }

    #[test]
    fn test_find_by_tax_id_mut_allows_account_append() {
        let mut registry = CustomerRegistry::new();
        registry.register(form("11111111111", "Ana Souza")).unwrap();

        let factory = crate::entities::account::AccountFactory::default();
        let customer = registry.find_by_tax_id_mut("11111111111").unwrap();
        factory.open_account(customer, "0001").unwrap();

        assert_eq!(registry.find_by_sequence(1).unwrap().accounts.len(), 1);
    }

    #[test]
    fn test_list_sorted_orders_by_sequence_number() {
        let mut registry = CustomerRegistry::new();
        registry.customers = vec![
            blank_customer(3, "33333333333", "Carla Dias"),
            blank_customer(1, "11111111111", "Ana Souza"),
            blank_customer(2, "22222222222", "Bruno Lima"),
        ];

        let order: Vec<usize> = registry
            .list_sorted()
            .iter()
            .map(|c| c.sequence_number)
            .collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_list_sorted_empty() {
        let registry = CustomerRegistry::new();
        assert!(registry.list_sorted().is_empty());
    }
}
