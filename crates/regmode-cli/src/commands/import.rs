//! Import command - adopt a project's regional mode setting.

use anyhow::{Context, Result};
use clap::Args;
use std::sync::Arc;

use regmode_core::{RegionalModeResource, WaitSettings};

use super::format_enabled;
use crate::client::AtlasClient;
use crate::{Config, OutputFormat};

/// Arguments for the import command.
#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Raw project identifier (24 hex characters).
    #[arg()]
    pub project_id: String,
}

/// Execute the import command.
///
/// # Errors
///
/// Returns an error if the project ID is invalid or the setting cannot be fetched.
pub async fn execute(args: ImportArgs, config: &Config) -> Result<()> {
    let client = Arc::new(AtlasClient::new(config)?);
    let resource = RegionalModeResource::new(client, WaitSettings::default())?;

    let imported = resource
        .import_state(&args.project_id)
        .await
        .with_context(|| format!("Couldn't import regional mode for project {}", args.project_id))?;

    match config.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&imported).context("Failed to serialize response")?
            );
        }
        OutputFormat::Text => {
            println!("Imported regional mode setting");
            println!();
            println!("  ID:            {}", imported.id);
            println!("  Project:       {}", imported.attributes.project_id);
            println!(
                "  Regional mode: {}",
                format_enabled(imported.attributes.enabled)
            );
        }
    }

    Ok(())
}
