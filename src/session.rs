// 🖥️ Session Controller - line-oriented menu over the ledger and registry
//
// Reads single-character commands, collects input, calls into the core and
// prints the outcome. Generic over reader/writer so it runs against stdin/stdout
// in the binary and against in-memory buffers in tests.
//
// End of input at the menu quits. End of input inside a prompt cancels that command.

use crate::config::Config;
use crate::entities::{
    Account, AccountFactory, Branch, BranchDirectory, Customer, CustomerRegistry, NewCustomer,
};
use crate::error::{BankError, Result as BankResult};
use crate::ledger::{Ledger, LedgerEntry};
use crate::policy::WithdrawalPolicy;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{BufRead, Write};

pub const MENU: &str = "
================ MENU ================
[d]  Deposit
[s]  Withdraw
[e]  Statement
[n]  New customer
[u]  List customers
[a]  Select branch
[v]  Select customer by tax id
[c]  Open account for selected customer
[x]  Export session (JSON)
[p]  Dashboard
[q]  Quit
=> ";

// ============================================================================
// COMMANDS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Deposit,
    Withdraw,
    Statement,
    NewCustomer,
    ListCustomers,
    SelectBranch,
    SelectCustomer,
    OpenAccount,
    Export,
    Dashboard,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "d" => Command::Deposit,
            "s" => Command::Withdraw,
            "e" => Command::Statement,
            "n" => Command::NewCustomer,
            "u" => Command::ListCustomers,
            "a" => Command::SelectBranch,
            "v" => Command::SelectCustomer,
            "c" => Command::OpenAccount,
            "x" => Command::Export,
            "p" => Command::Dashboard,
            "q" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// What the caller should do after a command ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Dashboard,
    Quit,
}

/// Parse a user-typed amount. Non-numeric and non-finite input yields None.
pub fn parse_amount(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}

// ============================================================================
// SESSION STATE
// ============================================================================

/// Everything one session owns
#[derive(Debug, Clone)]
pub struct SessionState {
    pub ledger: Ledger,
    pub registry: CustomerRegistry,
    pub branches: BranchDirectory,
    pub policy: WithdrawalPolicy,
    pub accounts: AccountFactory,

    /// Branch code used by [c]
    pub selected_branch: String,

    /// Sequence number of the customer picked with [v] or just registered
    pub selected_customer: Option<usize>,
}

impl SessionState {
    pub fn new(config: &Config) -> Self {
        SessionState {
            ledger: Ledger::new(),
            registry: CustomerRegistry::new(),
            branches: BranchDirectory::standard(),
            policy: config.withdrawal_policy(),
            accounts: config.account_factory(),
            selected_branch: config.session.default_branch.clone(),
            selected_customer: None,
        }
    }

    pub fn selected_branch(&self) -> Option<&Branch> {
        self.branches.find(&self.selected_branch)
    }

    pub fn selected_customer(&self) -> Option<&Customer> {
        self.selected_customer
            .and_then(|seq| self.registry.find_by_sequence(seq))
    }

    /// Open an account for customer `sequence_number` at `branch_code`
    pub fn open_account(&mut self, sequence_number: usize, branch_code: &str) -> BankResult<Account> {
        self.branches.require(branch_code)?;
        let factory = self.accounts;
        let customer = self
            .registry
            .find_by_sequence_mut(sequence_number)
            .ok_or(BankError::NoCustomerSelected)?;
        factory.open_account(customer, branch_code)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            balance: self.ledger.balance(),
            withdrawal_count: self.ledger.withdrawal_count(),
            history: self.ledger.history(),
            customers: self.registry.list_sorted(),
            selected_branch: &self.selected_branch,
            selected_customer: self.selected_customer,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

/// Serializable view of the whole session, printed by [x]
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub balance: f64,
    pub withdrawal_count: u32,
    pub history: &'a [LedgerEntry],
    pub customers: Vec<&'a Customer>,
    pub selected_branch: &'a str,
    pub selected_customer: Option<usize>,
}

// ============================================================================
// SESSION
// ============================================================================

pub struct Session<R, W> {
    input: R,
    output: W,
    state: SessionState,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W, state: SessionState) -> Self {
        Session {
            input,
            output,
            state,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_state(self) -> SessionState {
        self.state
    }

    /// Run commands until [q] or end of input. [p] is reported as unavailable.
    pub fn run(&mut self) -> Result<()> {
        loop {
            match self.step()? {
                Flow::Continue => {}
                Flow::Dashboard => self.say("Dashboard is not available in this mode.")?,
                Flow::Quit => return Ok(()),
            }
        }
    }

    /// Show the menu, read one command and execute it
    pub fn step(&mut self) -> Result<Flow> {
        let context_line = self.context_line();
        self.say(&context_line)?;

        let Some(choice) = self.prompt(MENU)? else {
            return Ok(Flow::Quit);
        };

        let command = Command::parse(&choice);
        tracing::debug!(?command, "menu command");

        match command {
            Command::Deposit => self.deposit()?,
            Command::Withdraw => self.withdraw()?,
            Command::Statement => {
                let statement = self.state.ledger.render_statement();
                self.say(&statement)?;
            }
            Command::NewCustomer => self.register_customer()?,
            Command::ListCustomers => self.list_customers()?,
            Command::SelectBranch => self.select_branch()?,
            Command::SelectCustomer => self.select_customer()?,
            Command::OpenAccount => self.open_account_for_selected()?,
            Command::Export => self.export()?,
            Command::Dashboard => return Ok(Flow::Dashboard),
            Command::Quit => return Ok(Flow::Quit),
            Command::Unknown(_) => self.say("Invalid option, please select again.")?,
        }

        Ok(Flow::Continue)
    }

    // ------------------------------------------------------------------------
    // Ledger commands
    // ------------------------------------------------------------------------

    fn deposit(&mut self) -> Result<()> {
        let Some(amount) = self.read_amount("Deposit amount: ")? else {
            return Ok(());
        };

        match self.state.ledger.deposit(amount) {
            Ok(balance) => self.success(&format!("Deposit completed. Balance: {:.2}", balance)),
            Err(err) => self.failure(&err),
        }
    }

    fn withdraw(&mut self) -> Result<()> {
        let Some(amount) = self.read_amount("Withdrawal amount: ")? else {
            return Ok(());
        };

        let policy = self.state.policy;
        match self.state.ledger.withdraw(amount, &policy) {
            Ok(balance) => {
                let remaining = policy.remaining(self.state.ledger.withdrawal_count());
                self.success(&format!(
                    "Withdrawal completed. Balance: {:.2} ({} withdrawal(s) left)",
                    balance, remaining
                ))
            }
            Err(err) => self.failure(&err),
        }
    }

    // ------------------------------------------------------------------------
    // Customer commands
    // ------------------------------------------------------------------------

    fn register_customer(&mut self) -> Result<()> {
        let tax_id = loop {
            let Some(raw) = self.prompt("Tax id (11 digits): ")? else {
                return self.cancelled();
            };
            match self.state.registry.check_tax_id(&raw) {
                Ok(tax_id) => break tax_id,
                Err(err) => self.say(&err.to_string())?,
            }
        };

        let full_name = loop {
            let Some(raw) = self.prompt("Full name: ")? else {
                return self.cancelled();
            };
            match self.state.registry.check_full_name(&raw) {
                Ok(name) => break name,
                Err(err) => self.say(&err.to_string())?,
            }
        };

        let Some(birth_date) = self.prompt("Birth date (YYYY-MM-DD): ")? else {
            return self.cancelled();
        };
        let Some(address) = self.prompt("Address: ")? else {
            return self.cancelled();
        };

        let form = NewCustomer {
            tax_id,
            full_name,
            birth_date,
            address,
        };
        let registered = self
            .state
            .registry
            .register(form)
            .map(|customer| customer.sequence_number);
        let sequence_number = match registered {
            Ok(sequence_number) => sequence_number,
            Err(err) => return self.failure(&err),
        };

        self.state.selected_customer = Some(sequence_number);
        self.success(&format!("New customer #{} registered", sequence_number))?;

        let Some(answer) = self.prompt("Open an account now? [y/N]: ")? else {
            return Ok(());
        };
        if !matches!(answer.to_lowercase().as_str(), "y" | "yes") {
            return Ok(());
        }

        let Some(branch_code) = self.choose_branch()? else {
            return self.cancelled();
        };
        self.open_account(sequence_number, &branch_code)
    }

    fn list_customers(&mut self) -> Result<()> {
        let customers = self.state.registry.list_sorted();
        if customers.is_empty() {
            return self.say("No customers registered.");
        }

        let mut text = String::from("================ CUSTOMERS ================\n");
        for customer in customers {
            text.push_str(&format!(
                "#{} | Name: {} | Tax id: {} | Born: {}\n",
                customer.sequence_number, customer.full_name, customer.tax_id, customer.birth_date
            ));
            text.push_str(&format!("Address: {}\n", customer.address));
            if customer.has_accounts() {
                for account in &customer.accounts {
                    text.push_str(&format!(
                        "  {} | {} | Balance: {:.2} | Opened: {}\n",
                        account.account_number,
                        account.account_type.as_str(),
                        account.balance,
                        account.created_at.format("%Y-%m-%d %H:%M")
                    ));
                }
            } else {
                text.push_str("  No accounts\n");
            }
            text.push_str(&"-".repeat(50));
            text.push('\n');
        }

        self.say(text.trim_end())
    }

    fn select_customer(&mut self) -> Result<()> {
        let Some(raw) = self.prompt("Tax id: ")? else {
            return self.cancelled();
        };

        let found = self
            .state
            .registry
            .find_by_tax_id(&raw)
            .map(|c| (c.sequence_number, c.full_name.clone()));

        match found {
            Some((sequence_number, full_name)) => {
                self.state.selected_customer = Some(sequence_number);
                self.success(&format!("Selected customer #{} {}", sequence_number, full_name))
            }
            None => self.failure(&BankError::CustomerNotFound {
                tax_id: crate::entities::normalize_tax_id(&raw),
            }),
        }
    }

    // ------------------------------------------------------------------------
    // Branch + account commands
    // ------------------------------------------------------------------------

    fn select_branch(&mut self) -> Result<()> {
        let Some(code) = self.choose_branch()? else {
            return self.cancelled();
        };

        self.state.selected_branch = code;
        let label = self
            .state
            .selected_branch()
            .map(Branch::label)
            .unwrap_or_default();
        self.success(&format!("Branch selected: {}", label))
    }

    fn open_account_for_selected(&mut self) -> Result<()> {
        let Some(sequence_number) = self.state.selected_customer else {
            return self.failure(&BankError::NoCustomerSelected);
        };
        let branch_code = self.state.selected_branch.clone();
        self.open_account(sequence_number, &branch_code)
    }

    fn open_account(&mut self, sequence_number: usize, branch_code: &str) -> Result<()> {
        match self.state.open_account(sequence_number, branch_code) {
            Ok(account) => self.success(&format!(
                "{} account {} opened for customer #{}",
                account.account_type.as_str(),
                account.account_number,
                sequence_number
            )),
            Err(err) => self.failure(&err),
        }
    }

    /// Re-prompt until a valid 1-based branch index is entered
    fn choose_branch(&mut self) -> Result<Option<String>> {
        let mut listing = String::from("Branches:\n");
        for (index, branch) in self.state.branches.all().iter().enumerate() {
            listing.push_str(&format!("[{}] {}\n", index + 1, branch.label()));
        }
        self.say(listing.trim_end())?;

        loop {
            let Some(raw) = self.prompt("Branch number: ")? else {
                return Ok(None);
            };
            match self.state.branches.select(&raw) {
                Ok(branch) => return Ok(Some(branch.code.clone())),
                Err(err) => self.say(&err.to_string())?,
            }
        }
    }

    fn export(&mut self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.state.snapshot())
            .context("Failed to serialize session snapshot")?;
        self.say(&json)
    }

    // ------------------------------------------------------------------------
    // I/O helpers
    // ------------------------------------------------------------------------

    fn context_line(&self) -> String {
        let customer = match self.state.selected_customer() {
            Some(c) => format!("#{} {}", c.sequence_number, c.full_name),
            None => "none".to_string(),
        };
        format!(
            "Branch: {} | Customer: {} | Balance: {:.2}",
            self.state.selected_branch,
            customer,
            self.state.ledger.balance()
        )
    }

    fn read_amount(&mut self, message: &str) -> Result<Option<f64>> {
        let Some(raw) = self.prompt(message)? else {
            self.cancelled()?;
            return Ok(None);
        };

        match parse_amount(&raw) {
            Some(amount) => Ok(Some(amount)),
            None => {
                tracing::debug!(input = %raw, "non-numeric amount");
                self.say(&format!("'{}' is not a valid amount.", raw))?;
                Ok(None)
            }
        }
    }

    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{}", message).context("Failed to write prompt")?;
        self.output.flush().context("Failed to flush output")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim().to_string()))
    }

    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message).context("Failed to write output")
    }

    fn success(&mut self, message: &str) -> Result<()> {
        self.say(&format!("\n=== {} ===", message))
    }

    fn failure(&mut self, err: &BankError) -> Result<()> {
        self.say(&format!("\n@@@ Operation failed! {} @@@", err))
    }

    fn cancelled(&mut self) -> Result<()> {
        self.say("\nOperation cancelled.")
    }
}

// ============================================================================
// TESTS
// ============================================================================
