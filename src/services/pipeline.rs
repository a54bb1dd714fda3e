//! Analysis pipeline: crawl, analyze, report, notify.
//!
//! # Progress
//!
//! | Step | Progress |
//! |---|---|
//! | crawling | 10 |
//! | analysis | 40 |
//! | report | 60 |
//! | notifications | 80 |
//! | done | 100 (set by `complete`) |
//!
//! Notification failures (e-mail, CRM, automation, completion webhook) are
//! logged and never fail an analysis whose report exists.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::config::Config;
use crate::models::analysis::{
    AnalysisRequest, AnalysisSummary, Completion, report_url, short_id,
};
use crate::models::crawl::CrawlReport;
use crate::services::{
    analyzer::{self, euros},
    brevo::{self, ANALYZER_COMPLETED, BrevoClient},
    crawler::{CrawlError, Crawler},
    email::ReportEmail,
    pdf::RenderError,
    report::{ReportGenerator, ReportInput},
    webhook_service::CompletionNotifier,
};
use crate::store::AnalysisStore;

/// Error stored when the finished analysis could not be saved.
const RESULT_NOT_STORED: &str = "Analysis result could not be stored";

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{0}")]
    Crawl(#[from] CrawlError),

    #[error("Report generation failed: {0}")]
    Report(#[from] RenderError),
}

impl PipelineError {
    /// Name of the step that failed.
    pub fn step(&self) -> &'static str {
        match self {
            PipelineError::Crawl(_) => "crawling",
            PipelineError::Report(_) => "report",
        }
    }
}

pub struct Pipeline {
    config: Arc<Config>,
    crawler: Crawler,
    reports: ReportGenerator,
    brevo: Option<BrevoClient>,
    webhook: Option<CompletionNotifier>,
}

impl Pipeline {
    pub fn new(
        config: Arc<Config>,
        crawler: Crawler,
        reports: ReportGenerator,
        brevo: Option<BrevoClient>,
        webhook: Option<CompletionNotifier>,
    ) -> Self {
        Self {
            config,
            crawler,
            reports,
            brevo,
            webhook,
        }
    }

    /// Run the pipeline and record the outcome in `store`.
    ///
    /// Spawned as a background task by the analyze endpoint.
    pub async fn process(&self, store: &dyn AnalysisStore, id: Uuid, request: AnalysisRequest) {
        match self.run(store, id, &request).await {
            Ok(completion) => {
                let summary = completion.data.clone();
                if let Err(e) = store.complete(id, completion).await {
                    tracing::error!(analysis = %short_id(id), "Failed to store completed analysis: {}", e);
                    if let Err(store_err) = store.fail(id, RESULT_NOT_STORED).await {
                        tracing::error!(analysis = %short_id(id), "Failed to store failed analysis: {}", store_err);
                    }
                    return;
                }
                tracing::info!(analysis = %short_id(id), "Analysis completed");
                self.notify_webhook(id, summary).await;
            }
            Err(e) => {
                tracing::error!(analysis = %short_id(id), step = e.step(), "Analysis failed: {}", e);
                if let Err(store_err) = store.fail(id, &e.to_string()).await {
                    tracing::error!(analysis = %short_id(id), "Failed to store failed analysis: {}", store_err);
                }
            }
        }
    }

    /// Crawl, analyze, write the report and send lead notifications.
    #[tracing::instrument(skip_all, fields(analysis = %short_id(id)))]
    pub async fn run(
        &self,
        store: &dyn AnalysisStore,
        id: Uuid,
        request: &AnalysisRequest,
    ) -> Result<Completion, PipelineError> {
        progress(store, id, 10).await;
        tracing::info!("Crawling {}", request.website_url);
        let crawl = self.crawler.crawl(&request.website_url).await?;
        tracing::info!(
            title = %crawl.title,
            chatbot = crawl.has_chatbot(),
            "Crawling complete"
        );

        let company_name = request
            .company_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| crawl.title.clone());

        progress(store, id, 40).await;
        let insights = analyzer::analyze(&crawl, request.industry);
        let roi = &insights.roi.summary;
        tracing::info!("Analysis complete, ROI/Monat {}", euros(roi.total_monthly));

        progress(store, id, 60).await;
        let report_path = self
            .reports
            .generate(&ReportInput {
                analysis_id: id,
                company_name: &company_name,
                industry: request.industry,
                crawl: &crawl,
                insights: &insights,
                generated_at: Utc::now(),
            })
            .await?;
        tracing::info!("Report generated: {}", report_path.display());

        let summary = AnalysisSummary {
            company_name,
            website_url: request.website_url.clone(),
            industry: request.industry,
            email: request.email.clone(),
            monthly_roi: roi.total_monthly,
            roi_multiplier: roi.roi_multiplier,
            has_chatbot: crawl.has_chatbot(),
            chatbot_priority: crawl.chatbot.priority.as_str().to_string(),
        };

        progress(store, id, 80).await;
        self.notify_lead(id, &summary, &crawl).await;

        Ok(Completion {
            report_path,
            data: summary,
        })
    }

    /// E-mail the requester, then save and tag them in the CRM.
    async fn notify_lead(&self, id: Uuid, summary: &AnalysisSummary, crawl: &CrawlReport) {
        let Some(client) = &self.brevo else {
            tracing::debug!("Brevo is not configured, skipping e-mail and CRM");
            return;
        };

        let report_link = self.config.report_link(&report_url(id));

        let email = ReportEmail {
            to: summary.email.clone(),
            company_name: summary.company_name.clone(),
            monthly_roi: summary.monthly_roi,
            roi_multiplier: summary.roi_multiplier,
            report_link: report_link.clone(),
            analysis_id: id,
        };
        match client.send_email(&email).await {
            Ok(message_id) => tracing::info!(?message_id, "Report e-mail sent"),
            Err(e) => tracing::warn!("Report e-mail failed: {}", e),
        }

        match client.save_lead(summary, id).await {
            Ok(action) => {
                tracing::info!("Brevo CRM: {}", action);
                let tags = brevo::lead_tags(summary.industry, &crawl.chatbot);
                if let Err(e) = client.add_tags(&summary.email, &tags).await {
                    tracing::warn!("Brevo tagging failed: {}", e);
                }
            }
            Err(e) => tracing::warn!("Brevo CRM failed: {}", e),
        }

        let event_data = json!({
            "analysis_id": id,
            "company_name": summary.company_name,
            "monthly_roi": summary.monthly_roi,
            "report_url": report_link,
        });
        if let Err(e) = client
            .trigger_automation(&summary.email, ANALYZER_COMPLETED, event_data)
            .await
        {
            tracing::warn!("Brevo automation trigger failed: {}", e);
        }
    }

    async fn notify_webhook(&self, id: Uuid, summary: AnalysisSummary) {
        let Some(webhook) = &self.webhook else {
            return;
        };

        let link = self.config.report_link(&report_url(id));
        match webhook.notify(id, link, summary).await {
            Ok(event_id) => tracing::info!(analysis = %short_id(id), %event_id, "Completion webhook delivered"),
            Err(e) => tracing::error!(analysis = %short_id(id), "Completion webhook failed: {}", e),
        }
    }
}

async fn progress(store: &dyn AnalysisStore, id: Uuid, value: u8) {
    if let Err(e) = store.set_progress(id, value).await {
        tracing::warn!("Failed to record progress {}: {}", value, e);
    }
}
