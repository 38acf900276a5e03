use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    error::{ApiError, SubmissionFailure},
    protocol::{ContactMessage, ContactReceipt},
};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// The external "send message" operation behind the contact form.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, message: &ContactMessage) -> Result<ContactReceipt, SubmissionFailure>;
}

#[derive(Debug, Error)]
pub enum SenderError {
    #[error("invalid contact endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        source: url::ParseError,
    },
    #[error("contact endpoint must use http or https, got '{0}'")]
    UnsupportedScheme(String),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Posts messages as JSON to a contact relay.
#[derive(Debug, Clone)]
pub struct HttpMessageSender {
    http: Client,
    endpoint: Url,
}

impl HttpMessageSender {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, SenderError> {
        let endpoint = endpoint.trim();
        let url = Url::parse(endpoint).map_err(|source| SenderError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            source,
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SenderError::UnsupportedScheme(url.scheme().to_string()));
        }

        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: url,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl MessageSender for HttpMessageSender {
    async fn send(&self, message: &ContactMessage) -> Result<ContactReceipt, SubmissionFailure> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(message)
            .send()
            .await
            .map_err(|error| {
                warn!(endpoint = %self.endpoint, %error, "contact: relay unreachable");
                SubmissionFailure::Transport(error.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            let receipt: ContactReceipt = response.json().await.map_err(|error| {
                SubmissionFailure::Transport(format!("malformed relay receipt: {error}"))
            })?;
            info!(endpoint = %self.endpoint, message_id = %receipt.message_id, "contact: relay accepted message");
            return Ok(receipt);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiError>(&body) {
            Ok(api_error) => api_error.message,
            Err(_) if body.trim().is_empty() => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
            Err(_) => body.trim().to_string(),
        };
        warn!(endpoint = %self.endpoint, status = status.as_u16(), %message, "contact: relay rejected message");
        Err(SubmissionFailure::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
