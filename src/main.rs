// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use clap::Parser;
use std::io;

use bank_ledger::{logger, CliArgs, Config, Flow, Session, SessionState};

fn main() -> Result<()> {
    let args = CliArgs::parse();
    logger::init(args.verbose);

    let config = match Config::resolve(&args) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("configuration rejected: {:#}", err);
            eprintln!("❌ {:#}", err);
            std::process::exit(2);
        }
    };
    tracing::debug!(?config, "effective configuration");

    println!("🏦 Bank Ledger - session started");
    println!(
        "   Withdrawal limit {:.2}, {} withdrawal(s) per session, {} account(s) per customer",
        config.policy.withdrawal_limit,
        config.policy.max_withdrawals,
        config.policy.max_accounts_per_customer
    );

    let stdin = io::stdin();
    let mut session = Session::new(stdin.lock(), io::stdout(), SessionState::new(&config));

    loop {
        match session.step()? {
            Flow::Continue => {}
            Flow::Dashboard => open_dashboard(session.state())?,
            Flow::Quit => break,
        }
    }

    println!("\n✅ Session closed");
    Ok(())
}

#[cfg(feature = "tui")]
fn open_dashboard(state: &SessionState) -> Result<()> {
    ui::run_dashboard(state)
}

#[cfg(not(feature = "tui"))]
fn open_dashboard(_state: &SessionState) -> Result<()> {
    eprintln!("❌ Dashboard not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    Ok(())
}
