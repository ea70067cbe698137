//! Command definitions and structures for the CLI
//!
//! This module contains the clap-based argument definitions: the global
//! connection options and one subcommand per relay operation.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure
#[derive(Parser)]
#[command(name = "wecom-notify")]
#[command(about = "Send WeCom notifications through the notification relay")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Relay base URL, e.g. http://localhost:8080
    #[arg(long, env = "WECOM_NOTIFY_URL", global = true)]
    pub base_url: Option<String>,

    /// API key sent as X-API-Key
    #[arg(long, env = "WECOM_NOTIFY_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Configuration file (default: ~/.config/wecom-notify/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds (transport default when unset)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Exit with an error when the relay reports a failure
    #[arg(long, global = true)]
    pub fail_on_error: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Check relay health
    Health,

    /// Send a text message
    Text {
        /// Message text
        text: String,

        /// Recipient: @all, a user id, or ids joined with '|'
        #[arg(short = 'u', long)]
        to_user: Option<String>,
    },

    /// Send a markdown message
    Markdown {
        /// Markdown content, or '-' to read it from stdin
        markdown: String,

        /// Recipient: @all, a user id, or ids joined with '|'
        #[arg(short = 'u', long)]
        to_user: Option<String>,
    },

    /// Send an image file
    Image {
        /// Path to the image
        path: PathBuf,

        /// Recipient: @all, a user id, or ids joined with '|'
        #[arg(short = 'u', long)]
        to_user: Option<String>,
    },

    /// Send a {"type", "content", "touser"} envelope read from stdin
    Dispatch,

    /// Run the demonstration sequence (default mode when no subcommand)
    Demo {
        /// Also send this image
        #[arg(long)]
        image: Option<PathBuf>,
    },
}
