//! # regmode-cli
//!
//! Command-line interface for a project's regional private endpoint mode.
//!
//! ## Commands
//!
//! - `regmode read <id>` - Show the setting behind an encoded identity
//! - `regmode update <id> --enabled <bool>` - Change the setting, waiting for teardown when disabling
//! - `regmode import <project-id>` - Adopt a project's setting and print its identity
//!
//! ## Configuration
//!
//! The CLI uses environment variables or command-line flags for settings:
//!
//! - `ATLAS_API_URL` - API endpoint (default: `https://cloud.mongodb.com`)
//! - `ATLAS_API_TOKEN` - API bearer token

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]
// CLI uses print! macros intentionally
#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

pub mod client;
pub mod commands;

use clap::{Parser, Subcommand};
use regmode_core::LogFormat;

/// Default Atlas admin API endpoint.
pub const DEFAULT_API_URL: &str = "https://cloud.mongodb.com";

/// Log filter used when `RUST_LOG` is unset.
///
/// Progress of the teardown wait is logged at info level by the core crate.
pub const DEFAULT_LOG_FILTER: &str = "warn,regmode_core=info,regmode_cli=info";

/// regmode CLI - regional private endpoint mode management.
#[derive(Debug, Parser)]
#[command(name = "regmode")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// API server URL.
    #[arg(long, env = "ATLAS_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// API bearer token.
    #[arg(long, env = "ATLAS_API_TOKEN")]
    pub api_token: Option<String>,

    /// Output format.
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Get the effective configuration.
    #[must_use]
    pub fn config(&self) -> Config {
        Config {
            api_url: self.api_url.clone(),
            api_token: self.api_token.clone(),
            format: self.format.clone(),
        }
    }

    /// Log format matching the requested output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        match self.format {
            OutputFormat::Text => LogFormat::Compact,
            OutputFormat::Json => LogFormat::Json,
        }
    }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the regional mode setting behind an encoded identity.
    Read(commands::read::ReadArgs),
    /// Change the regional mode setting.
    Update(commands::update::UpdateArgs),
    /// Adopt a project's regional mode setting.
    Import(commands::import::ImportArgs),
}

/// Output format.
#[derive(Debug, Clone, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
}

/// CLI configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// API server URL.
    pub api_url: String,
    /// API bearer token.
    pub api_token: Option<String>,
    /// Output format.
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_config_from_flags() {
        let cli = Cli::parse_from([
            "regmode",
            "--api-url",
            "https://atlas.example.com",
            "--api-token",
            "token-abc",
            "--format",
            "json",
            "import",
            "5f1a2b3c4d5e6f7a8b9c0d1e",
        ]);

        let config = cli.config();
        assert_eq!(config.api_url, "https://atlas.example.com");
        assert_eq!(config.api_token.as_deref(), Some("token-abc"));
        assert!(matches!(config.format, OutputFormat::Json));
        assert_eq!(cli.log_format(), LogFormat::Json);
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["regmode", "read", "some-id"]);
        assert!(matches!(cli.format, OutputFormat::Text));
        assert!(matches!(cli.command, Commands::Read(_)));
        assert_eq!(cli.log_format(), LogFormat::Compact);
    }

    #[test]
    fn test_default_log_filter_shows_teardown_progress() {
        let directives: Vec<&str> = DEFAULT_LOG_FILTER.split(',').collect();
        assert_eq!(directives[0], "warn");
        assert!(directives.contains(&"regmode_core=info"));
    }
}
