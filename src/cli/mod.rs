//! CLI module providing command-line interface functionality
//!
//! This module handles argument parsing and routes each subcommand to its
//! handler. Without a subcommand the demonstration sequence runs.

pub mod commands;
pub mod context;
pub mod handlers;

use anyhow::Result;
use clap::Parser;

pub use commands::{Cli, Commands};
pub use context::{CliContext, Overrides};
pub use handlers::CommandHandler;

/// Main CLI application
pub struct CliApp;

impl CliApp {
    /// Parse command line arguments and execute the requested command
    pub fn run() -> Result<()> {
        let cli = Cli::parse();

        let overrides = Overrides {
            base_url: cli.base_url.clone(),
            api_key: cli.api_key.clone(),
            timeout_secs: cli.timeout,
        };
        let context = CliContext::new(cli.config.clone(), overrides, cli.verbose, cli.fail_on_error)?;

        context.init_logging()?;

        let handler = CommandHandler::new(context);

        let command = cli.command.unwrap_or(Commands::Demo { image: None });

        handler.handle_command(command)
    }
}
