//! Circulation policy: loan period, fine rate and loan limit.
//!
//! Defaults match the desk's long-standing rules (14 days, $0.50 per day,
//! 5 books). A YAML file may override any subset:
//!
//! ```yaml
//! loan_period_days: 21
//! fine_per_day_cents: 25
//! ```

use crate::types::Money;
use chrono::Duration;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default loan period in days.
const DEFAULT_LOAN_PERIOD_DAYS: u32 = 14;

/// Longest loan period a config may set, about ten years.
const MAX_LOAN_PERIOD_DAYS: u32 = 3650;

/// Default fine per overdue day, in cents.
const DEFAULT_FINE_PER_DAY_CENTS: u64 = 50;

/// Default number of books a member may hold at once.
const DEFAULT_MAX_LOANS: usize = 5;

/// Config file name within the user's config directory.
const CONFIG_FILE: &str = "config.yaml";

/// Library circulation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LibraryConfig {
    /// Days from checkout until a loan is due.
    pub loan_period_days: u32,
    /// Fine charged per whole overdue day, in cents.
    pub fine_per_day_cents: u64,
    /// Maximum concurrent loans per member.
    pub max_loans: usize,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            loan_period_days: DEFAULT_LOAN_PERIOD_DAYS,
            fine_per_day_cents: DEFAULT_FINE_PER_DAY_CENTS,
            max_loans: DEFAULT_MAX_LOANS,
        }
    }
}

impl LibraryConfig {
    /// Create a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the loan period in days.
    pub fn loan_period_days(mut self, days: u32) -> Self {
        self.loan_period_days = days;
        self
    }

    /// Set the fine per overdue day, in cents.
    pub fn fine_per_day_cents(mut self, cents: u64) -> Self {
        self.fine_per_day_cents = cents;
        self
    }

    /// Set the concurrent loan limit.
    pub fn max_loans(mut self, max: usize) -> Self {
        self.max_loans = max;
        self
    }

    pub fn loan_period(&self) -> Duration {
        Duration::days(i64::from(self.loan_period_days))
    }

    pub fn fine_per_day(&self) -> Money {
        Money::from_cents(self.fine_per_day_cents)
    }

    /// Reject settings the desk cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if self.loan_period_days == 0 {
            eyre::bail!("loan_period_days must be at least 1");
        }
        if self.loan_period_days > MAX_LOAN_PERIOD_DAYS {
            eyre::bail!(
                "loan_period_days must be at most {}, got {}",
                MAX_LOAN_PERIOD_DAYS,
                self.loan_period_days
            );
        }
        if self.max_loans == 0 {
            eyre::bail!("max_loans must be at least 1");
        }
        Ok(())
    }

    /// Load a config file. Fields missing from the file keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config: LibraryConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config at {}", path.display()))?;
        log::debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Load the user's config file if one exists, otherwise the defaults.
    pub fn load_default() -> Result<Self> {
        match Self::path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Location of the user's config file.
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("libdesk").join(CONFIG_FILE))
    }
}
