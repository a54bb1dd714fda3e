//! Completion webhook payload.
//!
//! # Webhook Flow
//!
//! 1. Operator configures `COMPLETION_WEBHOOK_URL` and `COMPLETION_WEBHOOK_SECRET`
//! 2. When an analysis completes, the service POSTs a signed payload
//! 3. The receiver verifies the signature using the shared secret
//!
//! # Security
//!
//! Payloads are signed using HMAC-SHA256 over the raw JSON body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::analysis::AnalysisSummary;

/// Webhook payload sent to the configured endpoint.
///
/// # Example
///
/// ```json
/// {
///   "event_type": "analysis.completed",
///   "event_id": "550e8400-e29b-41d4-a716-446655440000",
///   "analysis_id": "8d0c1a4e-0000-4000-8000-000000000000",
///   "created_at": "2025-01-15T10:30:00Z",
///   "report_url": "https://analyzer.chatproai.io/api/report/8d0c1a4e-...",
///   "data": { "company_name": "ADORO Aparthotel", "monthly_roi": 13180, "...": "..." }
/// }
/// ```
///
/// # Signature Verification
///
/// The request carries an `X-Webhook-Signature` header with format
/// `sha256=<hex_encoded_hmac>`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CompletionPayload {
    /// Type of event (always "analysis.completed")
    pub event_type: String,

    /// Unique identifier for this webhook event
    pub event_id: Uuid,

    pub analysis_id: Uuid,

    /// When the event was created
    pub created_at: DateTime<Utc>,

    pub report_url: String,

    pub data: AnalysisSummary,
}

impl CompletionPayload {
    pub fn new(
        event_id: Uuid,
        analysis_id: Uuid,
        report_url: String,
        data: AnalysisSummary,
    ) -> Self {
        Self {
            event_type: "analysis.completed".to_string(),
            event_id,
            analysis_id,
            created_at: Utc::now(),
            report_url,
            data,
        }
    }
}
