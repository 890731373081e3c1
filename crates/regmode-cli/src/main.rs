//! regmode CLI - manage regional private endpoint mode.
//!
//! The main entry point for the `regmode` binary.

use anyhow::Result;
use clap::Parser;

use regmode_cli::{Cli, Commands, DEFAULT_LOG_FILTER};

fn main() -> Result<()> {
    let cli = Cli::parse();
    regmode_core::init_logging(cli.log_format(), DEFAULT_LOG_FILTER);
    let config = cli.config();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        match cli.command {
            Commands::Read(args) => regmode_cli::commands::read::execute(args, &config).await,
            Commands::Update(args) => regmode_cli::commands::update::execute(args, &config).await,
            Commands::Import(args) => regmode_cli::commands::import::execute(args, &config).await,
        }
    })
}
