//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::json;

/// Application-wide error type.
///
/// This enum represents all possible errors that can occur while serving a
/// request. Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Storage Errors**: Any sqlx::Error from the analysis store
/// - **Resource Errors**: Unknown analysis or missing report file
/// - **State Errors**: Report requested before the analysis completed
/// - **Validation Errors**: Invalid request data
/// - **Integration Errors**: Third-party APIs missing configuration or failing
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Reading a report from disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Status lookup for an unknown analysis id.
    #[error("Analysis ID not found")]
    AnalysisNotFound,

    /// Report lookup for an unknown analysis id.
    #[error("Report not found")]
    ReportNotFound,

    /// The analysis is known but its report file is gone.
    #[error("Report file not found")]
    ReportFileMissing,

    /// The analysis has not completed yet. Carries the current status.
    #[error("Report not ready yet. Current status: {0}")]
    ReportNotReady(String),

    /// Request body or parameters are invalid.
    ///
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),

    /// A required integration credential is not configured.
    #[error("{0}")]
    NotConfigured(&'static str),

    /// A third-party API rejected the request.
    #[error("{0}")]
    Upstream(&'static str),
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   },
///   "timestamp": "2025-12-21T19:00:00Z"
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `AnalysisNotFound`, `ReportNotFound`, `ReportFileMissing` → 404 Not Found
/// - `ReportNotReady`, `InvalidRequest` → 400 Bad Request
/// - `NotConfigured`, `Upstream` → 500 Internal Server Error
/// - `Database`, `Io` → 500 Internal Server Error (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::AnalysisNotFound => {
                (StatusCode::NOT_FOUND, "analysis_not_found", self.to_string())
            }
            AppError::ReportNotFound => {
                (StatusCode::NOT_FOUND, "report_not_found", self.to_string())
            }
            AppError::ReportFileMissing => (
                StatusCode::NOT_FOUND,
                "report_file_missing",
                self.to_string(),
            ),
            AppError::ReportNotReady(_) => {
                (StatusCode::BAD_REQUEST, "report_not_ready", self.to_string())
            }
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::NotConfigured(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "not_configured",
                self.to_string(),
            ),
            AppError::Upstream(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "upstream_error",
                self.to_string(),
            ),
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Io(ref e) => {
                tracing::error!("I/O error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            },
            "timestamp": Utc::now()
        }));

        (status, body).into_response()
    }
}

/// Map `validator` failures onto a 400 response.
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let mut fields: Vec<&str> = field_errors.keys().map(|k| k.as_ref()).collect();
        fields.sort_unstable();
        AppError::InvalidRequest(format!("Invalid fields: {}", fields.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_ready_reports_current_status() {
        let (status, body) = body_json(AppError::ReportNotReady("processing".into())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "report_not_ready");
        assert_eq!(
            body["error"]["message"],
            "Report not ready yet. Current status: processing"
        );
    }

    #[tokio::test]
    async fn io_details_are_hidden() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "/secret/path");
        let (status, body) = body_json(AppError::Io(io)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn missing_notion_key_is_a_server_error() {
        let (status, body) =
            body_json(AppError::NotConfigured("Notion API key not configured")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "Notion API key not configured");
    }

    #[tokio::test]
    async fn validation_errors_list_fields_sorted() {
        use crate::models::partner::PartnerRequest;
        use validator::Validate;

        let request = PartnerRequest {
            name: String::new(),
            company: "Muster Digital GmbH".into(),
            email: "not-an-email".into(),
            phone: String::new(),
            website: String::new(),
        };
        let error = AppError::from(request.validate().unwrap_err());

        let (status, body) = body_json(error).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Invalid fields: email, name");
    }
}
