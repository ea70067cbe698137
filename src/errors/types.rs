//! Error types for the WeCom notifier client
//!
//! Every failure the client or the CLI can surface is one variant of [`AppError`],
//! grouped by where it comes from: configuration, local files, the transport,
//! response decoding, or the relay itself.

use std::path::PathBuf;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    // Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("TOML parsing error: {context}")]
    TomlParsing {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Invalid base URL '{url}'")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // File access errors
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Permission denied for '{path}': {operation}")]
    PermissionDenied { path: PathBuf, operation: String },

    #[error("File I/O error for '{path}': {operation}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Transport errors
    #[error("HTTP request failed: {method} {url}")]
    HttpRequest {
        method: String,
        url: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Request to {url} timed out")]
    NetworkTimeout {
        url: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Invalid value for header '{name}'")]
    InvalidHeader {
        name: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Serialization errors
    #[error("JSON serialization error: {context}")]
    JsonSerialization {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("JSON deserialization error: {context}")]
    JsonDeserialization {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Failures reported by the relay
    #[error("Relay returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("{message}")]
    Other {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a new Config error with context
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new Config error with source
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new I/O error with source
    pub fn io_with_source(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Io {
            path: path.into(),
            operation: operation.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Map an I/O error on `path` to the most specific file variant.
    pub fn from_file_error(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        err: std::io::Error,
    ) -> Self {
        let path = path.into();
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::FileNotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path,
                operation: operation.into(),
            },
            _ => Self::io_with_source(path, operation, err),
        }
    }

    /// Wrap a reqwest error raised while performing `method url`.
    pub fn transport(method: impl Into<String>, url: impl Into<String>, err: reqwest::Error) -> Self {
        let url = url.into();
        if err.is_timeout() {
            Self::NetworkTimeout {
                url,
                source: Some(Box::new(err)),
            }
        } else {
            Self::HttpRequest {
                method: method.into(),
                url,
                source: Some(Box::new(err)),
            }
        }
    }

    /// True for failures raised before anything was sent over the network.
    pub fn is_local(&self) -> bool {
        matches!(self.category(), "config" | "io")
            || matches!(self, Self::InvalidHeader { .. } | Self::JsonSerialization { .. })
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config { .. }
            | Self::ConfigNotFound { .. }
            | Self::TomlParsing { .. }
            | Self::InvalidBaseUrl { .. } => "config",
            Self::FileNotFound { .. } | Self::PermissionDenied { .. } | Self::Io { .. } => "io",
            Self::HttpRequest { .. } | Self::NetworkTimeout { .. } | Self::InvalidHeader { .. } => {
                "network"
            }
            Self::JsonSerialization { .. } | Self::JsonDeserialization { .. } => "serialization",
            Self::Api { .. } => "api",
            Self::Other { .. } => "internal",
        }
    }
}

// Conversions from third-party error types
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() {
            Self::JsonDeserialization {
                context: format!(
                    "JSON syntax error at line {} column {}",
                    err.line(),
                    err.column()
                ),
                source: Some(Box::new(err)),
            }
        } else if err.is_data() {
            Self::JsonDeserialization {
                context: "JSON data error".to_string(),
                source: Some(Box::new(err)),
            }
        } else if err.is_eof() {
            Self::JsonDeserialization {
                context: "Unexpected end of JSON input".to_string(),
                source: Some(Box::new(err)),
            }
        } else {
            Self::JsonSerialization {
                context: "JSON serialization error".to_string(),
                source: Some(Box::new(err)),
            }
        }
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::TomlParsing {
            context: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}
