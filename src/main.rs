//! rmnd - command-line entry point
//!
//! Parses arguments, opens the store and runs one command.

use clap::Parser;
use remind::cli::Cli;
use remind::commands::{first_run_username, Outcome, Session};
use remind::config::Config;
use remind::render::DisplayConfig;
use remind::store::FileTaskStore;
use remind::{prompt, util};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so they never mix with table output
    let default_filter = if cli.verbose { "remind=debug" } else { "remind=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<Outcome> {
    let mut config = Config::from_env()?;
    if let Some(path) = &cli.store_path {
        config = config.with_store_path(path);
    }
    if cli.yes {
        config.assume_yes = true;
    }
    tracing::debug!("Using store {}", config.store_path.display());

    let store = FileTaskStore::open(&config.store_path)?;

    let first_run = store.username().is_none();
    if first_run {
        let username = first_run_username(
            &mut io::stdin().lock(),
            &mut io::stderr(),
            util::current_user(),
        )?;
        store.set_username(username)?;
    }

    let display = DisplayConfig {
        date_format: config.date_format.clone(),
        ..DisplayConfig::default()
    };
    let assume_yes = config.assume_yes;
    let mut session = Session::open(
        &store,
        display,
        Box::new(move |question: &str| prompt::confirm(question, assume_yes)),
        io::stdout().lock(),
    )?;

    session.start(cli.command, first_run)
}
