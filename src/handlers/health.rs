//! Service info and health check endpoints.

use crate::{error::AppError, state::AppState};
use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub analyze: &'static str,
    pub status: &'static str,
    pub report: &'static str,
    pub stats: &'static str,
    pub partner: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,

    /// "memory" for the in-memory store, "connected" for a reachable database
    pub storage: String,

    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
}

/// `GET /`: service name, version and endpoint overview.
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        status: "online",
        service: "ChatPro AI Analyzer",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
        endpoints: Endpoints {
            analyze: "/api/analyze",
            status: "/api/status/{analysis_id}",
            report: "/api/report/{analysis_id}",
            stats: "/api/stats",
            partner: "/api/partner",
        },
    })
}

/// Health check handler.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "healthy",
///   "storage": "connected",
///   "timestamp": "2025-12-21T19:00:00Z"
/// }
/// ```
///
/// # Response (500 Internal Server Error)
///
/// If the database is unreachable, returns standard error response.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    state.store.ping().await?;

    let storage = if state.store.is_persistent() {
        "connected"
    } else {
        "memory"
    };

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        storage: storage.to_string(),
        timestamp: Utc::now(),
    }))
}
