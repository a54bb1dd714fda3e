//! Analysis HTTP handlers.
//!
//! This module implements the analysis API endpoints:
//! - POST /api/analyze - Start an analysis in the background
//! - GET /api/status/{id} - Poll progress and result
//! - GET /api/report/{id} - Download the finished report
//! - GET /api/stats - Aggregate counts

use crate::{
    error::AppError,
    models::analysis::{
        AnalysisRecord, AnalysisRequest, AnalysisResponse, AnalysisStatus, StatsResponse, short_id,
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use uuid::Uuid;
use validator::Validate;

/// Start a website analysis.
///
/// # Endpoint
///
/// `POST /api/analyze`
///
/// # Request Body
///
/// ```json
/// {
///   "website_url": "adoro-aparthotel.com",
///   "industry": "hotel",
///   "email": "owner@example.com",
///   "company_name": "ADORO Aparthotel"
/// }
/// ```
///
/// # Response
///
/// - **Success (202 Accepted)**: analysis id, the pipeline runs in the background
/// - **Error (400)**: empty URL or invalid e-mail
/// - **Error (422)**: malformed body or unknown industry
///
/// ```json
/// {
///   "analysis_id": "550e8400-e29b-41d4-a716-446655440000",
///   "status": "processing",
///   "message": "Analyse gestartet. Dies dauert ca. 30-60 Sekunden.",
///   "estimated_time": 60
/// }
/// ```
pub async fn start_analysis(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> Result<(StatusCode, Json<AnalysisResponse>), AppError> {
    request.validate()?;

    let id = Uuid::new_v4();
    state.store.insert(AnalysisRecord::new(id, &request)).await?;

    tracing::info!(
        analysis = %short_id(id),
        url = %request.website_url,
        industry = %request.industry,
        "Analysis accepted"
    );

    let AppState { store, pipeline, .. } = state;
    tokio::spawn(async move {
        pipeline.process(store.as_ref(), id, request).await;
    });

    Ok((StatusCode::ACCEPTED, Json(AnalysisResponse::accepted(id))))
}

/// Poll an analysis.
///
/// # Endpoint
///
/// `GET /api/status/{id}`
///
/// # Response
///
/// - **Success (200 OK)**: status, progress message and, once completed,
///   `report_url` and the result summary in `data`
/// - **Error (404)**: unknown or malformed id
pub async fn get_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let id = Uuid::parse_str(&id).map_err(|_| AppError::AnalysisNotFound)?;

    let record = state
        .store
        .get(id)
        .await?
        .ok_or(AppError::AnalysisNotFound)?;

    Ok(Json(record.into()))
}

/// Download the report of a completed analysis.
///
/// # Endpoint
///
/// `GET /api/report/{id}`
///
/// # Response
///
/// - **Success (200 OK)**: the file as an attachment named
///   `chatpro-ai-analyse-<id8>.pdf` (or `.html` when PDF conversion failed)
/// - **Error (400)**: the analysis has not completed
/// - **Error (404)**: unknown id, or the report file no longer exists
pub async fn download_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = Uuid::parse_str(&id).map_err(|_| AppError::ReportNotFound)?;

    let record = state
        .store
        .get(id)
        .await?
        .ok_or(AppError::ReportNotFound)?;

    if record.status != AnalysisStatus::Completed {
        return Err(AppError::ReportNotReady(record.status.to_string()));
    }

    let path = record.report_path.ok_or(AppError::ReportFileMissing)?;
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::ReportFileMissing);
        }
        Err(e) => return Err(e.into()),
    };

    let (content_type, extension) = match path.extension().and_then(|ext| ext.to_str()) {
        Some("pdf") => ("application/pdf", "pdf"),
        _ => ("text/html; charset=utf-8", "html"),
    };
    let disposition = format!(
        "attachment; filename=\"chatpro-ai-analyse-{}.{}\"",
        short_id(id),
        extension
    );

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// Aggregate counts over all analyses.
///
/// # Endpoint
///
/// `GET /api/stats`
///
/// ```json
/// {
///   "total_analyses": 3,
///   "completed": 2,
///   "processing": 0,
///   "failed": 1,
///   "success_rate": 66.7,
///   "industries": { "hotel": 2, "salon": 1 },
///   "timestamp": "2025-12-21T19:00:00Z"
/// }
/// ```
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.store.stats().await?;
    Ok(Json(stats.into()))
}
