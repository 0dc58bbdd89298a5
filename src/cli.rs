//! Command-line argument parsing for libdesk.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "libdesk",
    about = "A library circulation desk: books, members, loans, reservations and fines",
    version,
    after_help = "Type 'help' at the prompt for commands.\nLogs are written to: ~/.local/share/libdesk/logs/libdesk.log"
)]
pub struct Cli {
    /// Path to a YAML config file (default: ~/.config/libdesk/config.yaml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Start with an empty library instead of the sample catalog
    #[arg(long)]
    pub no_seed: bool,

    /// Override the loan period in days
    #[arg(long)]
    pub loan_days: Option<u32>,

    /// Override the fine per overdue day, in cents
    #[arg(long)]
    pub fine_cents: Option<u64>,

    /// Override the maximum number of concurrent loans per member
    #[arg(long)]
    pub max_loans: Option<usize>,
}
