//! Dashboard settings.
//!
//! Settings come from an optional TOML file plus `TICKETWATCH_*`
//! environment variables; command-line flags override both.
//!
//! ```toml
//! top_n = 10
//! table_rows = 500
//! tabulation_horizontal_threshold = 8
//! refresh_secs = 2
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::DashboardLimits;

/// Tunable dashboard settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Customers/agents shown in the rankings.
    pub top_n: usize,
    /// Maximum rows in the ticket table.
    pub table_rows: usize,
    /// Above this many categories the tabulation chart is horizontal.
    pub tabulation_horizontal_threshold: usize,
    /// Seconds between file polls.
    pub refresh_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        let limits = DashboardLimits::default();
        Self {
            top_n: limits.top_n,
            table_rows: limits.table_rows,
            tabulation_horizontal_threshold: limits.tabulation_horizontal_threshold,
            refresh_secs: 2,
        }
    }
}

impl Settings {
    /// Load settings from `path` (if given) and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(Environment::with_prefix("TICKETWATCH").try_parsing(true))
            .build()
            .context("Failed to read configuration")?;

        config.try_deserialize().context("Invalid configuration")
    }

    /// Dashboard limits derived from these settings.
    pub fn limits(&self) -> DashboardLimits {
        DashboardLimits {
            top_n: self.top_n,
            table_rows: self.table_rows,
            tabulation_horizontal_threshold: self.tabulation_horizontal_threshold,
        }
    }
}
