//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod estimate;

pub use estimate::EstimateCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Background estimate jobs
    Estimate {
        #[command(subcommand)]
        command: EstimateCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Estimate { command } => estimate::handle_estimate_command(command, config).await,
    }
}
