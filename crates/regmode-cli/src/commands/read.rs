//! Read command - show the setting behind an encoded identity.

use anyhow::{Context, Result};
use clap::Args;
use std::sync::Arc;

use regmode_core::{RegionalModeResource, WaitSettings};

use super::format_enabled;
use crate::client::AtlasClient;
use crate::{Config, OutputFormat};

/// Arguments for the read command.
#[derive(Debug, Args)]
pub struct ReadArgs {
    /// Encoded resource identity (as printed by `import`).
    #[arg()]
    pub id: String,
}

/// Execute the read command.
///
/// # Errors
///
/// Returns an error if the identity is invalid or the API request fails.
pub async fn execute(args: ReadArgs, config: &Config) -> Result<()> {
    let client = Arc::new(AtlasClient::new(config)?);
    let resource = RegionalModeResource::new(client, WaitSettings::default())?;

    let attributes = resource
        .read(&args.id)
        .await
        .context("Failed to read regional mode")?;

    match config.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "id": attributes.as_ref().map(|_| args.id.as_str()),
                    "attributes": attributes,
                }))
                .context("Failed to serialize response")?
            );
        }
        OutputFormat::Text => match attributes {
            Some(attrs) => {
                println!("  Project:       {}", attrs.project_id);
                println!("  Regional mode: {}", format_enabled(attrs.enabled));
            }
            None => println!("Regional mode setting not found; state should be cleared"),
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_args_parsing() {
        use clap::Parser;

        #[derive(Parser)]
        struct TestCli {
            #[command(flatten)]
            args: ReadArgs,
        }

        let cli = TestCli::parse_from(["test", "cHJvamVjdF9pZA==:YWJj"]);
        assert_eq!(cli.args.id, "cHJvamVjdF9pZA==:YWJj");
    }
}
