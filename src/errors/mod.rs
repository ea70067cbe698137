//! Centralized error handling module
//!
//! The library returns [`AppResult`] everywhere; the binary wraps it in
//! `anyhow` at the very top.

pub mod types;

pub use types::{AppError, AppResult};
