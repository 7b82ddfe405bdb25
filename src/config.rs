// ⚙️ Configuration - defaults < TOML file < command-line flags
//
// Example file:
//
//   [policy]
//   withdrawal_limit = 750.0
//   max_withdrawals = 5
//   max_accounts_per_customer = 3
//
//   [session]
//   default_branch = "0002"

use crate::entities::account::{AccountFactory, DEFAULT_MAX_ACCOUNTS};
use crate::entities::branch::BranchDirectory;
use crate::error::{BankError, Result as BankResult};
use crate::policy::{WithdrawalPolicy, DEFAULT_MAX_WITHDRAWALS, DEFAULT_WITHDRAWAL_LIMIT};
use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// COMMAND LINE
// ============================================================================

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "bank-ledger")]
#[command(about = "Interactive banking ledger: deposits, withdrawals, customers and accounts")]
pub struct CliArgs {
    /// TOML file with [policy] and [session] tables
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Largest amount a single withdrawal may take
    #[arg(long)]
    pub withdrawal_limit: Option<f64>,

    /// Successful withdrawals allowed per session
    #[arg(long)]
    pub max_withdrawals: Option<u32>,

    /// Accounts a single customer may hold
    #[arg(long)]
    pub max_accounts: Option<usize>,

    /// Branch code selected when the session starts
    #[arg(long)]
    pub branch: Option<String>,

    #[arg(long, short, help = "Enable verbose logging")]
    pub verbose: bool,
}

// ============================================================================
// FILE + RESOLVED CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub withdrawal_limit: f64,
    pub max_withdrawals: u32,
    pub max_accounts_per_customer: usize,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        PolicyConfig {
            withdrawal_limit: DEFAULT_WITHDRAWAL_LIMIT,
            max_withdrawals: DEFAULT_MAX_WITHDRAWALS,
            max_accounts_per_customer: DEFAULT_MAX_ACCOUNTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub default_branch: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            default_branch: BranchDirectory::standard().default_branch().code.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub policy: PolicyConfig,
    pub session: SessionConfig,
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse configuration TOML")
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        Self::from_toml_str(&content)
    }

    /// Build the effective config: file first (if any), then flag overrides
    pub fn resolve(args: &CliArgs) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(limit) = args.withdrawal_limit {
            config.policy.withdrawal_limit = limit;
        }
        if let Some(max) = args.max_withdrawals {
            config.policy.max_withdrawals = max;
        }
        if let Some(max) = args.max_accounts {
            config.policy.max_accounts_per_customer = max;
        }
        if let Some(branch) = &args.branch {
            config.session.default_branch = branch.trim().to_string();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> BankResult<()> {
        let limit = self.policy.withdrawal_limit;
        if !limit.is_finite() || limit <= 0.0 {
            return Err(BankError::InvalidConfig {
                field: "policy.withdrawal_limit".to_string(),
                reason: format!("must be a positive amount, got {}", limit),
            });
        }

        if self.policy.max_accounts_per_customer == 0 {
            return Err(BankError::InvalidConfig {
                field: "policy.max_accounts_per_customer".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if BranchDirectory::standard()
            .find(&self.session.default_branch)
            .is_none()
        {
            return Err(BankError::InvalidConfig {
                field: "session.default_branch".to_string(),
                reason: format!("unknown branch code '{}'", self.session.default_branch),
            });
        }

        Ok(())
    }

    pub fn withdrawal_policy(&self) -> WithdrawalPolicy {
        WithdrawalPolicy::new(self.policy.withdrawal_limit, self.policy.max_withdrawals)
    }

    pub fn account_factory(&self) -> AccountFactory {
        AccountFactory::new(self.policy.max_accounts_per_customer)
    }
}

// ============================================================================
// TESTS
// ============================================================================
