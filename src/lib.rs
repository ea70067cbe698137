//! WeCom Notification Relay Client Library
//!
//! This library provides blocking and async clients for the WeCom notification
//! relay, plus the configuration and error types shared with the CLI.

pub mod client;
pub mod config;
pub mod errors;

// Re-export commonly used types for convenience
pub use client::{
    ApiResponse, AsyncNotifierClient, Message, NotifierClient, NotifierConfig, Recipient,
};
pub use config::{Config, ConfigManager};
pub use errors::{AppError, AppResult};
