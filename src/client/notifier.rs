use reqwest::blocking::Client;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{
    build_headers, normalize_base_url, ApiResponse, Endpoint, Message, NotifierConfig, Recipient,
};
use crate::errors::{AppError, AppResult};

/// Blocking client for the relay.
///
/// Every call performs exactly one HTTP round trip and hands back the decoded
/// JSON body, whatever the status code. Nothing is retried.
#[derive(Clone)]
pub struct NotifierClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl NotifierClient {
    /// Creates the client and its connection pool.
    ///
    /// The base URL and key are not validated; a key that cannot be sent as a
    /// header value fails on the first request.
    pub fn new(config: NotifierConfig) -> AppResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        let client = builder
            .build()
            .map_err(|e| AppError::config_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            base_url: normalize_base_url(&config.base_url),
            api_key: config.api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/health`
    pub fn health_check(&self) -> AppResult<ApiResponse> {
        self.execute(Endpoint::Health, None)
    }

    /// Send text to everyone.
    pub fn send_text(&self, text: &str) -> AppResult<ApiResponse> {
        self.send_text_to(text, Recipient::All)
    }

    pub fn send_text_to(&self, text: &str, to_user: impl Into<Recipient>) -> AppResult<ApiResponse> {
        self.send(&Message::text(text, to_user))
    }

    /// Send markdown to everyone.
    pub fn send_markdown(&self, markdown: &str) -> AppResult<ApiResponse> {
        self.send_markdown_to(markdown, Recipient::All)
    }

    pub fn send_markdown_to(
        &self,
        markdown: &str,
        to_user: impl Into<Recipient>,
    ) -> AppResult<ApiResponse> {
        self.send(&Message::markdown(markdown, to_user))
    }

    /// Send the image at `path` to everyone.
    ///
    /// The file is read fully before anything goes over the network, so a bad
    /// path never produces a request.
    pub fn send_image(&self, path: impl AsRef<Path>) -> AppResult<ApiResponse> {
        self.send_image_to(path, Recipient::All)
    }

    pub fn send_image_to(
        &self,
        path: impl AsRef<Path>,
        to_user: impl Into<Recipient>,
    ) -> AppResult<ApiResponse> {
        let message = Message::image_from_path(path, to_user)?;
        self.send(&message)
    }

    pub fn send_image_bytes(
        &self,
        bytes: &[u8],
        to_user: impl Into<Recipient>,
    ) -> AppResult<ApiResponse> {
        self.send(&Message::image_from_bytes(bytes, to_user))
    }

    /// Post a prebuilt message to its endpoint.
    pub fn send(&self, message: &Message) -> AppResult<ApiResponse> {
        debug!(kind = %message.kind(), to_user = %message.recipient(), "Sending message");
        self.execute(message.endpoint(), Some(message))
    }

    fn execute(&self, endpoint: Endpoint, message: Option<&Message>) -> AppResult<ApiResponse> {
        let url = endpoint.url(&self.base_url);
        let method = endpoint.method();
        let headers = build_headers(&self.api_key, message.is_some())?;

        debug!(%method, %url, "Sending request");
        let mut request = self.client.request(method.clone(), &url).headers(headers);
        if let Some(message) = message {
            request = request.json(message);
        }

        let response = request
            .send()
            .map_err(|e| AppError::transport(method.as_str(), &url, e))?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .map_err(|e| AppError::transport(method.as_str(), &url, e))?;

        let api_response = ApiResponse::from_bytes(status, &bytes)?;
        log_outcome(endpoint, &api_response);
        Ok(api_response)
    }
}

/// Async client for the relay, with the same contract as [`NotifierClient`].
#[derive(Clone)]
pub struct AsyncNotifierClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AsyncNotifierClient {
    pub fn new(config: NotifierConfig) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        let client = builder
            .build()
            .map_err(|e| AppError::config_with_source("Failed to create async HTTP client", e))?;

        Ok(Self {
            client,
            base_url: normalize_base_url(&config.base_url),
            api_key: config.api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health_check(&self) -> AppResult<ApiResponse> {
        self.execute(Endpoint::Health, None).await
    }

    pub async fn send_text(&self, text: &str) -> AppResult<ApiResponse> {
        self.send_text_to(text, Recipient::All).await
    }

    pub async fn send_text_to(
        &self,
        text: &str,
        to_user: impl Into<Recipient>,
    ) -> AppResult<ApiResponse> {
        self.send(&Message::text(text, to_user)).await
    }

    pub async fn send_markdown(&self, markdown: &str) -> AppResult<ApiResponse> {
        self.send_markdown_to(markdown, Recipient::All).await
    }

    pub async fn send_markdown_to(
        &self,
        markdown: &str,
        to_user: impl Into<Recipient>,
    ) -> AppResult<ApiResponse> {
        self.send(&Message::markdown(markdown, to_user)).await
    }

    pub async fn send_image(&self, path: impl AsRef<Path>) -> AppResult<ApiResponse> {
        self.send_image_to(path, Recipient::All).await
    }

    pub async fn send_image_to(
        &self,
        path: impl AsRef<Path>,
        to_user: impl Into<Recipient>,
    ) -> AppResult<ApiResponse> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::from_file_error(path, "read image", e))?;
        self.send(&Message::image_from_bytes(&bytes, to_user)).await
    }

    pub async fn send_image_bytes(
        &self,
        bytes: &[u8],
        to_user: impl Into<Recipient>,
    ) -> AppResult<ApiResponse> {
        self.send(&Message::image_from_bytes(bytes, to_user)).await
    }

    pub async fn send(&self, message: &Message) -> AppResult<ApiResponse> {
        debug!(kind = %message.kind(), to_user = %message.recipient(), "Sending message");
        self.execute(message.endpoint(), Some(message)).await
    }

    async fn execute(&self, endpoint: Endpoint, message: Option<&Message>) -> AppResult<ApiResponse> {
        let url = endpoint.url(&self.base_url);
        let method = endpoint.method();
        let headers = build_headers(&self.api_key, message.is_some())?;

        debug!(%method, %url, "Sending async request");
        let mut request = self.client.request(method.clone(), &url).headers(headers);
        if let Some(message) = message {
            request = request.json(message);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::transport(method.as_str(), &url, e))?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::transport(method.as_str(), &url, e))?;

        let api_response = ApiResponse::from_bytes(status, &bytes)?;
        log_outcome(endpoint, &api_response);
        Ok(api_response)
    }
}

fn log_outcome(endpoint: Endpoint, response: &ApiResponse) {
    if response.is_success() {
        info!(path = endpoint.path(), status = response.status(), "Relay accepted request");
    } else {
        warn!(
            path = endpoint.path(),
            status = response.status(),
            error = response.error_message().unwrap_or("unknown"),
            "Relay reported failure"
        );
    }
}
