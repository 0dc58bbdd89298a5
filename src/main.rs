//! libdesk - an interactive library circulation desk.

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use libdesk::{Library, LibraryConfig, seed, shell};
use log::info;
use std::fs;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

mod cli;

use cli::Cli;

fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("libdesk")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("libdesk.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn load_config(cli: &Cli) -> Result<LibraryConfig> {
    let mut config = match &cli.config {
        Some(path) => LibraryConfig::load(path)?,
        None => LibraryConfig::load_default()?,
    };

    if let Some(days) = cli.loan_days {
        config = config.loan_period_days(days);
    }
    if let Some(cents) = cli.fine_cents {
        config = config.fine_per_day_cents(cents);
    }
    if let Some(max) = cli.max_loans {
        config = config.max_loans(max);
    }

    config.validate().context("Invalid command-line override")?;
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli).context("Failed to load configuration")?;
    info!("Using config: {:?}", config);

    let mut library = Library::with_config(config);
    if !cli.no_seed {
        seed::load_sample_data(&mut library).context("Failed to load sample data")?;
    }

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();

    if interactive {
        println!(
            "{} {} books, {} members. Type 'help' for commands, 'quit' to leave.",
            "libdesk".bold(),
            library.books().count(),
            library.members().count()
        );
    }

    let mut stdout = io::stdout().lock();
    shell::run(&mut library, stdin.lock(), &mut stdout, interactive)
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    info!("Command: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
