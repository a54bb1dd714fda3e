//! Analysis job models and API request/response types.
//!
//! This module defines:
//! - `Industry`: Supported industries (drives ROI model and cited sources)
//! - `AnalysisRequest`: Request body for starting an analysis
//! - `AnalysisRecord`: Stored state of one analysis job
//! - `AnalysisResponse`: Response body for submit and status endpoints
//! - `AnalysisStats`: Aggregates returned by the stats endpoint

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Industry of the analysed business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    Hotel,
    Fitness,
    Salon,
    Immobilien,
    Restaurant,
    VacationRental,
    Fahrschule,
    Other,
}

impl Industry {
    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::Hotel => "hotel",
            Industry::Fitness => "fitness",
            Industry::Salon => "salon",
            Industry::Immobilien => "immobilien",
            Industry::Restaurant => "restaurant",
            Industry::VacationRental => "vacation_rental",
            Industry::Fahrschule => "fahrschule",
            Industry::Other => "other",
        }
    }

    /// Label used on the report cover.
    pub fn label(&self) -> &'static str {
        match self {
            Industry::Hotel => "Hospitality & Hotellerie",
            Industry::Fitness => "Health & Fitness",
            Industry::Salon => "Beauty & Wellness",
            Industry::Immobilien => "Immobilien & Real Estate",
            Industry::Restaurant => "Gastronomie & Food Service",
            Industry::VacationRental => "Ferienvermietung",
            Industry::Fahrschule => "Fahrschulen",
            Industry::Other => "Dienstleistungen",
        }
    }

    /// Wire name with the first letter upper-cased ("vacation_rental" -> "Vacation_rental").
    pub fn capitalized(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Industry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hotel" => Ok(Industry::Hotel),
            "fitness" => Ok(Industry::Fitness),
            "salon" => Ok(Industry::Salon),
            "immobilien" => Ok(Industry::Immobilien),
            "restaurant" => Ok(Industry::Restaurant),
            "vacation_rental" => Ok(Industry::VacationRental),
            "fahrschule" => Ok(Industry::Fahrschule),
            "other" => Ok(Industry::Other),
            other => Err(format!("unknown industry: {}", other)),
        }
    }
}

/// Request body for starting an analysis.
///
/// # JSON Example
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
/// # Validation
///
/// - `website_url`: Required, not blank. A missing scheme is completed with `https://`.
/// - `industry`: One of the `Industry` values, anything else is rejected with 422
/// - `email`: Must be a valid e-mail address
/// - `company_name`: Optional, the crawled page title is used when absent
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnalysisRequest {
    #[validate(length(max = 2048), custom(function = "not_blank"))]
    pub website_url: String,

    pub industry: Industry,

    #[validate(email)]
    pub email: String,

    #[serde(default)]
    pub company_name: Option<String>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Lifecycle state of an analysis.
///
/// `Processing` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Processing,
    Completed,
    Failed,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Processing => "processing",
            AnalysisStatus::Completed => "completed",
            AnalysisStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, AnalysisStatus::Processing)
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processing" => Ok(AnalysisStatus::Processing),
            "completed" => Ok(AnalysisStatus::Completed),
            "failed" => Ok(AnalysisStatus::Failed),
            other => Err(format!("unknown analysis status: {}", other)),
        }
    }
}

/// Key figures of a finished analysis.
///
/// Returned in the `data` field of the status endpoint and sent to the
/// completion webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub company_name: String,
    pub website_url: String,
    pub industry: Industry,
    pub email: String,
    pub monthly_roi: i64,
    pub roi_multiplier: f64,
    pub has_chatbot: bool,
    pub chatbot_priority: String,
}

/// Stored state of one analysis job.
#[derive(Debug, Clone)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub status: AnalysisStatus,

    /// 0 to 100
    pub progress: u8,

    pub website_url: String,
    pub industry: Industry,
    pub email: String,
    pub company_name: Option<String>,

    /// Location of the generated report (PDF or HTML fallback)
    pub report_path: Option<PathBuf>,

    pub data: Option<AnalysisSummary>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,
}

impl AnalysisRecord {
    /// Fresh record for a just-submitted request.
    pub fn new(id: Uuid, request: &AnalysisRequest) -> Self {
        Self {
            id,
            status: AnalysisStatus::Processing,
            progress: 0,
            website_url: request.website_url.clone(),
            industry: request.industry,
            email: request.email.clone(),
            company_name: request.company_name.clone(),
            report_path: None,
            data: None,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
            failed_at: None,
        }
    }

    /// Public download path of the report, once one exists.
    pub fn report_url(&self) -> Option<String> {
        match self.status {
            AnalysisStatus::Completed => Some(report_url(self.id)),
            _ => None,
        }
    }
}

/// API path of the report download for an analysis.
pub fn report_url(id: Uuid) -> String {
    format!("/api/report/{}", id)
}

/// First eight characters of the id, used in logs and file names.
pub fn short_id(id: Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}

/// Outcome of a successful pipeline run, applied to the stored record.
#[derive(Debug, Clone)]
pub struct Completion {
    pub report_path: PathBuf,
    pub data: AnalysisSummary,
}

/// Response body for the submit and status endpoints.
///
/// # JSON Example
///
/// ```json
/// {
///   "analysis_id": "550e8400-e29b-41d4-a716-446655440000",
///   "status": "processing",
///   "message": "Analyse läuft... (40%)"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub analysis_id: Uuid,
    pub status: AnalysisStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<AnalysisSummary>,
}

impl AnalysisResponse {
    /// Response for a freshly accepted request.
    pub fn accepted(id: Uuid) -> Self {
        Self {
            analysis_id: id,
            status: AnalysisStatus::Processing,
            message: "Analyse gestartet. Dies dauert ca. 30-60 Sekunden.".to_string(),
            report_url: None,
            estimated_time: Some(60),
            data: None,
        }
    }
}

impl From<AnalysisRecord> for AnalysisResponse {
    fn from(record: AnalysisRecord) -> Self {
        let message = match record.status {
            AnalysisStatus::Processing => format!("Analyse läuft... ({}%)", record.progress),
            AnalysisStatus::Completed => {
                "Analyse abgeschlossen! PDF-Report ist verfügbar.".to_string()
            }
            AnalysisStatus::Failed => format!(
                "Fehler: {}",
                record.error.as_deref().unwrap_or("Unknown")
            ),
        };

        Self {
            analysis_id: record.id,
            status: record.status,
            report_url: record.report_url(),
            message,
            estimated_time: None,
            data: record.data,
        }
    }
}

/// Aggregate counts over all stored analyses.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AnalysisStats {
    pub total: i64,
    pub completed: i64,
    pub processing: i64,
    pub failed: i64,
    pub industries: BTreeMap<String, i64>,
}

impl AnalysisStats {
    /// Completed share in percent, rounded to one decimal. Zero when empty.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        round1(self.completed as f64 / self.total as f64 * 100.0)
    }
}

/// Response body for `GET /api/stats`.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_analyses: i64,
    pub completed: i64,
    pub processing: i64,
    pub failed: i64,
    pub success_rate: f64,
    pub industries: BTreeMap<String, i64>,
    pub timestamp: DateTime<Utc>,
}

impl From<AnalysisStats> for StatsResponse {
    fn from(stats: AnalysisStats) -> Self {
        Self {
            success_rate: stats.success_rate(),
            total_analyses: stats.total,
            completed: stats.completed,
            processing: stats.processing,
            failed: stats.failed,
            industries: stats.industries,
            timestamp: Utc::now(),
        }
    }
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            website_url: "https://adoro-aparthotel.com".into(),
            industry: Industry::Hotel,
            email: "robert@chatproai.io".into(),
            company_name: None,
        }
    }

    #[test]
    fn industry_wire_names() {
        let parsed: Industry = serde_json::from_str("\"vacation_rental\"").unwrap();
        assert_eq!(parsed, Industry::VacationRental);
        assert_eq!(parsed.capitalized(), "Vacation_rental");
        assert_eq!("fahrschule".parse::<Industry>(), Ok(Industry::Fahrschule));
        assert!(serde_json::from_str::<Industry>("\"ecommerce\"").is_err());
    }

    #[test]
    fn request_validation() {
        assert!(request().validate().is_ok());

        let mut bad_email = request();
        bad_email.email = "not-an-email".into();
        assert!(bad_email.validate().is_err());

        let mut empty_url = request();
        empty_url.website_url = String::new();
        assert!(empty_url.validate().is_err());

        let mut blank_url = request();
        blank_url.website_url = " \t ".into();
        assert!(blank_url.validate().is_err());
    }

    #[test]
    fn status_messages() {
        let mut record = AnalysisRecord::new(Uuid::new_v4(), &request());
        record.progress = 40;
        let response = AnalysisResponse::from(record.clone());
        assert_eq!(response.message, "Analyse läuft... (40%)");
        assert!(response.report_url.is_none());

        record.status = AnalysisStatus::Failed;
        record.error = Some("Timeout".into());
        assert_eq!(AnalysisResponse::from(record.clone()).message, "Fehler: Timeout");

        record.status = AnalysisStatus::Completed;
        let response = AnalysisResponse::from(record.clone());
        assert_eq!(
            response.report_url,
            Some(format!("/api/report/{}", record.id))
        );
    }

    #[test]
    fn success_rate_rounds_to_one_decimal() {
        let stats = AnalysisStats {
            total: 3,
            completed: 2,
            ..Default::default()
        };
        assert_eq!(stats.success_rate(), 66.7);
        assert_eq!(AnalysisStats::default().success_rate(), 0.0);
    }
}
