//! Analyzer output models.
//!
//! Monetary amounts are whole euros per month.

use serde::{Deserialize, Serialize};

use crate::models::crawl::ChatbotPriority;

/// Full result of analysing one crawled website.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insights {
    pub website_check: WebsiteCheck,
    pub chatbot_analysis: ChatbotAnalysis,
    pub pain_points: Vec<PainPoint>,
    pub roi: RoiCalculation,
    pub recommendations: Vec<Recommendation>,
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebsiteCheck {
    pub status: String,
    pub title: String,
    pub pages: usize,
    pub languages: Vec<String>,
    pub language_count: usize,
    pub mobile_responsive: bool,
    pub response_time_ms: u64,
    pub has_contact_info: bool,
    pub lead_forms_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatbotAnalysis {
    pub exists: bool,

    /// Title-cased vendor name, when a chatbot exists
    pub chatbot_type: Option<String>,

    pub status: String,
    pub has_lead_form: bool,
    pub issues: Vec<String>,
    pub priority: ChatbotPriority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PainPoint {
    pub issue: String,
    pub impact: String,
    pub cost: String,

    /// Catalogue ids backing the claim
    pub source_ids: Vec<String>,
}

/// Monthly ROI estimate broken down by lever.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoiCalculation {
    pub assumptions: Vec<Assumption>,
    pub line_items: Vec<RoiLineItem>,
    pub summary: RoiSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assumption {
    pub label: String,
    pub value: String,
    pub source_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiLineItem {
    pub category: String,

    /// Human-readable formula
    pub calculation: String,

    pub monthly_value: i64,
    pub source_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiSummary {
    pub total_monthly: i64,
    pub monthly_cost: i64,
    pub setup_cost: i64,
    pub net_monthly: i64,
    pub roi_multiplier: f64,
    pub break_even_months: f64,
    pub yearly: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub priority: ChatbotPriority,
}

/// A cited source from the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    pub title: String,
    pub url: String,

    /// Key figures as (label, value) pairs
    pub figures: Vec<(String, String)>,

    pub note: String,
}
