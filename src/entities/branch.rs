// 🏦 Branch Entity - static directory of bank branches
//
// Branch codes namespace account numbers ("0001-000002").
// The directory is fixed at startup and read-only for the session.

use crate::error::{BankError, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// BRANCH ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Four-digit branch code, prefix of every account number opened here
    pub code: String,

    pub name: String,
    pub address: String,
    pub city: String,

    /// State abbreviation (e.g. "SP")
    pub state: String,
}

impl Branch {
    pub fn new(code: &str, name: &str, address: &str, city: &str, state: &str) -> Self {
        Branch {
            code: code.to_string(),
            name: name.to_string(),
            address: address.to_string(),
            city: city.to_string(),
            state: state.to_string(),
        }
    }

    /// One-line label for menus
    pub fn label(&self) -> String {
        format!("{} - {} ({}/{})", self.code, self.name, self.city, self.state)
    }
}

// ============================================================================
// BRANCH DIRECTORY
// ============================================================================

#[derive(Debug, Clone)]
pub struct BranchDirectory {
    branches: Vec<Branch>,
}

impl BranchDirectory {
    /// The three branches every session starts with
    pub fn standard() -> Self {
        BranchDirectory {
            branches: vec![
                Branch::new(
                    "0001",
                    "Centro",
                    "Rua XV de Novembro, 100",
                    "Curitiba",
                    "PR",
                ),
                Branch::new(
                    "0002",
                    "Paulista",
                    "Avenida Paulista, 1578",
                    "Sao Paulo",
                    "SP",
                ),
                Branch::new(
                    "0003",
                    "Savassi",
                    "Rua Pernambuco, 1000",
                    "Belo Horizonte",
                    "MG",
                ),
            ],
        }
    }

    pub fn all(&self) -> &[Branch] {
        &self.branches
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// First branch of the directory
    pub fn default_branch(&self) -> &Branch {
        &self.branches[0]
    }

    /// Pick a branch by its 1-based menu index
    pub fn select(&self, input: &str) -> Result<&Branch> {
        let trimmed = input.trim();
        let invalid = || BankError::InvalidBranchSelection {
            input: trimmed.to_string(),
            available: self.branches.len(),
        };

        let index: usize = trimmed.parse().map_err(|_| invalid())?;
        if index == 0 {
            return Err(invalid());
        }

        self.branches.get(index - 1).ok_or_else(invalid)
    }

    /// Look up a branch by code
    pub fn find(&self, code: &str) -> Option<&Branch> {
        let code = code.trim();
        self.branches.iter().find(|b| b.code == code)
    }

    /// Like `find`, but unknown codes are an error
    pub fn require(&self, code: &str) -> Result<&Branch> {
        self.find(code).ok_or_else(|| BankError::UnknownBranch {
            code: code.trim().to_string(),
        })
    }
}

impl Default for BranchDirectory {
    fn default() -> Self {
        Self::standard()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_directory_has_three_branches() {
        let directory = BranchDirectory::standard();
        assert_eq!(directory.len(), 3);
        assert!(!directory.is_empty());
        assert_eq!(directory.default_branch().code, "0001");

        let codes: Vec<&str> = directory.all().iter().map(|b| b.code.as_str()).collect();
        assert_eq!(codes, vec!["0001", "0002", "0003"]);
    }

    #[test]
    fn test_select_by_one_based_index() {
        let directory = BranchDirectory::standard();
        assert_eq!(directory.select("1").unwrap().code, "0001");
        assert_eq!(directory.select(" 3 ").unwrap().code, "0003");
    }

    #[test]
    fn test_select_rejects_out_of_range_and_garbage() {
        let directory = BranchDirectory::standard();

        for input in ["0", "4", "-1", "abc", ""] {
            let err = directory.select(input).unwrap_err();
            assert!(
                matches!(err, BankError::InvalidBranchSelection { available: 3, .. }),
                "input {:?} gave {:?}",
                input,
                err
            );
        }
    }

    #[test]
    fn test_find_by_code() {
        let directory = BranchDirectory::standard();

        let branch = directory.find("0002").unwrap();
        assert_eq!(branch.name, "Paulista");
        assert_eq!(branch.state, "SP");

        assert!(directory.find("9999").is_none());
        assert_eq!(
            directory.require("9999").unwrap_err(),
            BankError::UnknownBranch {
                code: "9999".to_string()
            }
        );
    }

    #[test]
    fn test_label() {
        let directory = BranchDirectory::standard();
        assert_eq!(
            directory.default_branch().label(),
            "0001 - Centro (Curitiba/PR)"
        );
    }
}
