//! Shared plumbing for third-party HTTP APIs (Brevo, Notion, completion webhook).

use std::time::Duration;

use reqwest::{Client, Response};

/// Default timeout for integration calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum IntegrationError {
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub fn http_client(timeout: Duration) -> Result<Client, IntegrationError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Pass the response through when its status is one of `accepted`.
///
/// Otherwise the body is read into the error for logging.
pub async fn expect_status(
    response: Response,
    accepted: &[u16],
) -> Result<Response, IntegrationError> {
    if accepted.contains(&response.status().as_u16()) {
        return Ok(response);
    }
    Err(status_error(response).await)
}

/// Like [`expect_status`], accepting any 2xx.
pub async fn expect_success(response: Response) -> Result<Response, IntegrationError> {
    if response.status().is_success() {
        return Ok(response);
    }
    Err(status_error(response).await)
}

async fn status_error(response: Response) -> IntegrationError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    IntegrationError::Status { status, body }
}
