//! Update command - change the setting and wait for teardown when disabling.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Args};
use tokio_util::sync::CancellationToken;

use regmode_core::converge::{DEFAULT_INITIAL_DELAY, DEFAULT_MIN_INTERVAL, DEFAULT_TIMEOUT};
use regmode_core::{RegionalModeResource, WaitSettings};

use super::format_enabled;
use crate::client::AtlasClient;
use crate::{Config, OutputFormat};

/// Arguments for the update command.
#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Encoded resource identity (as printed by `import`).
    #[arg()]
    pub id: String,

    /// Desired regional mode.
    #[arg(long, action = ArgAction::Set)]
    pub enabled: bool,

    /// Maximum time to wait for regional endpoint teardown (in seconds).
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Interval between teardown status checks (in seconds).
    #[arg(long, default_value_t = DEFAULT_MIN_INTERVAL.as_secs())]
    pub poll_interval_secs: u64,

    /// Delay before the first teardown status check (in seconds).
    #[arg(long, default_value_t = DEFAULT_INITIAL_DELAY.as_secs())]
    pub initial_delay_secs: u64,
}

impl UpdateArgs {
    /// Returns the wait timing requested on the command line.
    #[must_use]
    pub const fn wait_settings(&self) -> WaitSettings {
        WaitSettings {
            timeout: Duration::from_secs(self.timeout_secs),
            min_interval: Duration::from_secs(self.poll_interval_secs),
            initial_delay: Duration::from_secs(self.initial_delay_secs),
        }
    }
}

/// Execute the update command.
///
/// Ctrl-C aborts the teardown wait.
///
/// # Errors
///
/// Returns an error if the wait settings or identity are invalid, the change
/// is rejected, or the wait fails, times out or is cancelled.
pub async fn execute(args: UpdateArgs, config: &Config) -> Result<()> {
    let client = Arc::new(AtlasClient::new(config)?);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling wait");
            on_interrupt.cancel();
        }
    });

    let resource = RegionalModeResource::new(client, args.wait_settings())
        .context("Invalid wait settings")?
        .with_cancellation(cancel);

    if !args.enabled && matches!(config.format, OutputFormat::Text) {
        println!("Disabling regional mode; waiting for regional endpoints to be torn down...");
    }

    let attributes = resource
        .update(&args.id, args.enabled)
        .await
        .context("Failed to update regional mode")?;

    match config.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&attributes).context("Failed to serialize response")?
            );
        }
        OutputFormat::Text => {
            println!("Regional mode updated");
            println!();
            println!("  Project:       {}", attributes.project_id);
            println!("  Regional mode: {}", format_enabled(attributes.enabled));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: UpdateArgs,
    }

    #[test]
    fn test_update_args_defaults() {
        let cli = TestCli::parse_from(["test", "some-id", "--enabled", "false"]);
        assert!(!cli.args.enabled);
        assert_eq!(cli.args.wait_settings(), WaitSettings::default());
    }

    #[test]
    fn test_update_args_custom_timing() {
        let cli = TestCli::parse_from([
            "test",
            "some-id",
            "--enabled",
            "true",
            "--timeout-secs",
            "120",
            "--poll-interval-secs",
            "2",
            "--initial-delay-secs",
            "0",
        ]);
        assert!(cli.args.enabled);
        let settings = cli.args.wait_settings();
        assert_eq!(settings.timeout, Duration::from_secs(120));
        assert_eq!(settings.min_interval, Duration::from_secs(2));
        assert_eq!(settings.initial_delay, Duration::ZERO);
    }

    #[test]
    fn test_update_requires_enabled_value() {
        assert!(TestCli::try_parse_from(["test", "some-id"]).is_err());
    }
}
