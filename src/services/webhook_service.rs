//! Completion webhook delivery.
//!
//! This module sends a signed `analysis.completed` event to the operator's
//! endpoint and handles HMAC signature generation for webhook verification.

use std::time::Duration;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::config::Config;
use crate::models::{analysis::AnalysisSummary, webhook::CompletionPayload};
use crate::services::integration::{IntegrationError, expect_success, http_client};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone)]
pub struct CompletionNotifier {
    client: reqwest::Client,
    url: String,
    secret: Option<String>,
}

impl CompletionNotifier {
    /// # Timeout
    ///
    /// 5 seconds per delivery (prevents hanging on slow endpoints)
    pub fn new(url: impl Into<String>, secret: Option<String>) -> Result<Self, IntegrationError> {
        let url = url.into();
        validate_webhook_url(&url)?;

        Ok(Self {
            client: http_client(Duration::from_secs(5))?,
            url,
            secret,
        })
    }

    /// Notifier for `COMPLETION_WEBHOOK_URL`, or `None` when unset.
    ///
    /// # Errors
    ///
    /// An invalid URL is a configuration error and aborts startup.
    pub fn from_config(config: &Config) -> Result<Option<Self>, IntegrationError> {
        let Some(url) = &config.completion_webhook_url else {
            return Ok(None);
        };
        if config.completion_webhook_secret.is_none() {
            tracing::warn!("COMPLETION_WEBHOOK_SECRET is not set, completion events are unsigned");
        }

        Self::new(url.clone(), config.completion_webhook_secret.clone()).map(Some)
    }

    /// Send one completion event and return its event id.
    ///
    /// # Headers Sent
    ///
    /// - `Content-Type: application/json`
    /// - `X-Webhook-Signature: sha256=<hex>` (when a secret is configured)
    /// - `X-Webhook-Event-Id: <uuid>`
    ///
    /// Any 2xx answer counts as delivered.
    pub async fn notify(
        &self,
        analysis_id: Uuid,
        report_url: String,
        data: AnalysisSummary,
    ) -> Result<Uuid, IntegrationError> {
        let event_id = Uuid::new_v4();
        let payload = CompletionPayload::new(event_id, analysis_id, report_url, data);
        let payload_json = serde_json::to_string(&payload)?;

        let mut request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header("X-Webhook-Event-Id", event_id.to_string());
        if let Some(secret) = &self.secret {
            request = request.header("X-Webhook-Signature", generate_signature(secret, &payload_json));
        }

        let response = request.body(payload_json).send().await?;
        expect_success(response).await?;

        Ok(event_id)
    }
}

/// Generate HMAC-SHA256 signature for webhook payload.
///
/// # Format
///
/// `sha256=<hex_encoded_hmac>`
///
/// # Verification
///
/// Receivers should:
/// 1. Extract signature from `X-Webhook-Signature` header
/// 2. Compute HMAC-SHA256(secret, request_body)
/// 3. Compare using constant-time comparison
pub fn generate_signature(secret: &str, payload: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC key length is valid");
    mac.update(payload.as_bytes());
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

/// Validate webhook URL format.
///
/// # Rules
///
/// - Must be valid URL
/// - Must be HTTPS (HTTP allowed for localhost)
/// - Maximum 2048 characters
fn validate_webhook_url(url: &str) -> Result<(), IntegrationError> {
    if url.len() > 2048 {
        return Err(IntegrationError::InvalidUrl(
            "URL exceeds 2048 characters".to_string(),
        ));
    }

    let parsed = url::Url::parse(url)
        .map_err(|_| IntegrationError::InvalidUrl("Invalid URL format".to_string()))?;

    match parsed.scheme() {
        "https" => Ok(()),
        "http" if matches!(parsed.host_str(), Some("localhost" | "127.0.0.1" | "0.0.0.0")) => {
            Ok(())
        }
        "http" => Err(IntegrationError::InvalidUrl(
            "HTTP is only allowed for localhost. Use HTTPS for production.".to_string(),
        )),
        _ => Err(IntegrationError::InvalidUrl(
            "URL must use HTTP or HTTPS".to_string(),
        )),
    }
}
