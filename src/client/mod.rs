//! Clients for the WeCom notification relay
//!
//! The relay exposes four endpoints under one base URL, all guarded by an
//! `X-API-Key` header:
//!
//! - `GET  /api/health`
//! - `POST /api/send/text`
//! - `POST /api/send/image`
//! - `POST /api/send/markdown`
//!
//! [`NotifierClient`] is the blocking client; [`AsyncNotifierClient`] offers the
//! same calls for tokio code. Both keep one pooled HTTP client for their whole
//! lifetime and attach headers per request.
//!
//! ```rust,no_run
//! use wecom_notify::client::{NotifierClient, NotifierConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = NotifierClient::new(NotifierConfig::new("http://localhost:8080/", "secret"))?;
//!
//!     let health = client.health_check()?;
//!     println!("{}", health.body());
//!
//!     client.send_text("deploy finished")?;
//!     client.send_markdown_to("**deploy** finished", "alice|bob")?;
//!     Ok(())
//! }
//! ```

pub mod message;
pub mod notifier;
pub mod response;

pub use message::{Envelope, Message, MessageKind, Recipient, BROADCAST_ALL};
pub use notifier::{AsyncNotifierClient, NotifierClient};
pub use response::{ApiResponse, DeliveryResult, HealthStatus, SendReceipt};

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use std::fmt;

use crate::errors::{AppError, AppResult};

/// Header carrying the relay's API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// The relay's endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Health,
    SendText,
    SendImage,
    SendMarkdown,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Health => "/api/health",
            Self::SendText => "/api/send/text",
            Self::SendImage => "/api/send/image",
            Self::SendMarkdown => "/api/send/markdown",
        }
    }

    pub fn method(self) -> Method {
        match self {
            Self::Health => Method::GET,
            Self::SendText | Self::SendImage | Self::SendMarkdown => Method::POST,
        }
    }

    /// Full URL under an already normalized base.
    pub fn url(self, base_url: &str) -> String {
        format!("{}{}", base_url, self.path())
    }
}

/// Configuration for the notifier clients
#[derive(Clone)]
pub struct NotifierConfig {
    pub base_url: String,
    pub api_key: String,
    /// Transport default when unset.
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

impl NotifierConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            api_key: api_key.into(),
            timeout_secs: None,
            user_agent: Some(default_user_agent().to_string()),
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

// Keeps the key out of logs.
impl fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifierConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

pub fn default_user_agent() -> &'static str {
    concat!("wecom-notify/", env!("CARGO_PKG_VERSION"))
}

/// Strip every trailing `/`. Idempotent.
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Headers attached to each request.
pub(crate) fn build_headers(api_key: &str, json_body: bool) -> AppResult<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut key = HeaderValue::from_str(api_key).map_err(|e| AppError::InvalidHeader {
        name: API_KEY_HEADER.to_string(),
        source: Some(Box::new(e)),
    })?;
    key.set_sensitive(true);
    headers.insert(API_KEY_HEADER, key);

    if json_body {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    Ok(headers)
}
