//! Command-line interface parsing for the Pokedex CLI
//!
//! This module handles parsing of startup arguments using clap and validating
//! them into a `StartupConfig` before the interactive loop starts.

use clap::Parser;
use std::time::Duration;
use thiserror::Error;

use crate::data::DEFAULT_BASE_URL;

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// The cache interval must be at least one second
    #[error("Invalid cache interval: must be greater than 0 seconds")]
    InvalidCacheInterval,

    /// The base URL was empty after trimming
    #[error("Invalid base URL: '{0}'")]
    InvalidBaseUrl(String),
}

/// Pokedex - Browse location areas and catch creatures from the command line
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Interactive Pokedex backed by the PokeAPI catalog")]
#[command(version)]
pub struct Cli {
    /// Seconds before a cached response goes stale; also how often stale
    /// responses are swept from memory
    #[arg(long, value_name = "SECS", env = "POKEDEX_CACHE_INTERVAL", default_value_t = 10)]
    pub cache_interval: u64,

    /// Root URL of the catalog service
    #[arg(long, value_name = "URL", env = "POKEDEX_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Log filter used when RUST_LOG is not set (logs are written to stderr)
    ///
    /// Examples:
    ///   pokedex --log-level debug
    ///   pokedex --log-level pokedex::cache=debug
    #[arg(long, value_name = "FILTER", default_value = "warn")]
    pub log_level: String,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    /// Cache staleness threshold and sweep period
    pub cache_interval: Duration,
    /// Catalog service root without a trailing slash
    pub base_url: String,
    /// Fallback log filter
    pub log_filter: String,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            cache_interval: Duration::from_secs(10),
            base_url: DEFAULT_BASE_URL.to_string(),
            log_filter: "warn".to_string(),
        }
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with validated settings
    /// * `Err(CliError)` if the interval is zero or the base URL is empty
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.cache_interval == 0 {
            return Err(CliError::InvalidCacheInterval);
        }

        let base_url = cli.base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(CliError::InvalidBaseUrl(cli.base_url.clone()));
        }

        Ok(StartupConfig {
            cache_interval: Duration::from_secs(cli.cache_interval),
            base_url: base_url.to_string(),
            log_filter: cli.log_level.clone(),
        })
    }
}
