//! Brevo CRM and transactional e-mail client.
//!
//! # Operations
//!
//! - `save_lead`: create or update the requester as a contact on the lead list
//! - `add_tags`: merge tags into an existing contact
//! - `trigger_automation`: fire a Brevo automation webhook event
//! - `send_email`: deliver the report notification
//!
//! Every call authenticates with the `api-key` header.

use std::collections::BTreeSet;

use chrono::Utc;
use reqwest::{Method, RequestBuilder};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::config::Config;
use crate::models::{
    analysis::{AnalysisSummary, Industry},
    crawl::{ChatbotDetection, ChatbotPriority},
};
use crate::services::email::ReportEmail;
use crate::services::integration::{
    DEFAULT_TIMEOUT, IntegrationError, expect_status, http_client,
};

/// Event fired once an analysis has been delivered.
pub const ANALYZER_COMPLETED: &str = "analyzer_completed";

#[derive(Debug, Clone)]
pub struct Sender {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct BrevoClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    list_id: i64,
    sender: Sender,
}

/// What `save_lead` did with the contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadAction {
    Created { contact_id: Option<i64> },
    Updated,
}

impl std::fmt::Display for LeadAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeadAction::Created {
                contact_id: Some(id),
            } => write!(f, "created contact {}", id),
            LeadAction::Created { contact_id: None } => f.write_str("created"),
            LeadAction::Updated => f.write_str("updated"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreatedContact {
    id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Contact {
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SentEmail {
    message_id: Option<String>,
}

impl BrevoClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        list_id: i64,
        sender: Sender,
    ) -> Result<Self, IntegrationError> {
        Ok(Self {
            client: http_client(DEFAULT_TIMEOUT)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            list_id,
            sender,
        })
    }

    /// Client for the configured account, or `None` without `BREVO_API_KEY`.
    pub fn from_config(config: &Config) -> Result<Option<Self>, IntegrationError> {
        let Some(api_key) = &config.brevo_api_key else {
            return Ok(None);
        };

        let sender = Sender {
            name: config.sender_name.clone(),
            email: config.sender_email.clone(),
        };
        Self::new(
            api_key.clone(),
            config.brevo_base_url.clone(),
            config.brevo_list_id,
            sender,
        )
        .map(Some)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header("accept", "application/json")
            .header("api-key", &self.api_key)
    }

    /// Create or update the requester as a contact.
    ///
    /// # Attributes
    ///
    /// - `FIRSTNAME` / `LASTNAME`: first word of the company name / the rest
    /// - `WEBSITE`, `BRANCHE` (capitalized industry), `ROI_MONAT`
    /// - `HAS_CHATBOT`, `CHATBOT_PRIORITY`, `ANALYZER_USED`
    /// - `ANALYSIS_ID`, `ANALYSIS_DATE` (UTC, `YYYY-MM-DD`)
    ///
    /// 201 means created, 204 means an existing contact was updated.
    #[tracing::instrument(skip(self, summary), fields(email = %summary.email))]
    pub async fn save_lead(
        &self,
        summary: &AnalysisSummary,
        analysis_id: Uuid,
    ) -> Result<LeadAction, IntegrationError> {
        let (first_name, last_name) = split_name(&summary.company_name);

        let body = json!({
            "email": summary.email,
            "attributes": {
                "FIRSTNAME": first_name,
                "LASTNAME": last_name,
                "WEBSITE": summary.website_url,
                "BRANCHE": summary.industry.capitalized(),
                "ROI_MONAT": summary.monthly_roi,
                "HAS_CHATBOT": summary.has_chatbot,
                "CHATBOT_PRIORITY": summary.chatbot_priority,
                "ANALYZER_USED": true,
                "ANALYSIS_ID": analysis_id.to_string(),
                "ANALYSIS_DATE": Utc::now().format("%Y-%m-%d").to_string(),
            },
            "listIds": [self.list_id],
            "updateEnabled": true,
        });

        let response = self
            .request(Method::POST, "/contacts")
            .json(&body)
            .send()
            .await?;
        let response = expect_status(response, &[201, 204]).await?;

        if response.status().as_u16() == 204 {
            return Ok(LeadAction::Updated);
        }

        let created: CreatedContact = response.json().await?;
        Ok(LeadAction::Created {
            contact_id: created.id,
        })
    }

    /// Merge `tags` into the contact's existing tags and return the result.
    pub async fn add_tags(
        &self,
        email: &str,
        tags: &[String],
    ) -> Result<Vec<String>, IntegrationError> {
        let path = format!("/contacts/{}", encode_segment(email));

        let response = self.request(Method::GET, &path).send().await?;
        let contact: Contact = expect_status(response, &[200]).await?.json().await?;

        let merged: Vec<String> = contact
            .tags
            .into_iter()
            .chain(tags.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let response = self
            .request(Method::PUT, &path)
            .json(&json!({ "tags": merged }))
            .send()
            .await?;
        expect_status(response, &[204]).await?;

        Ok(merged)
    }

    /// Fire the automation webhook `event` for a contact.
    pub async fn trigger_automation(
        &self,
        email: &str,
        event: &str,
        event_data: Value,
    ) -> Result<(), IntegrationError> {
        let path = format!("/automation/webhooks/{}", encode_segment(event));
        let response = self
            .request(Method::POST, &path)
            .json(&json!({ "email": email, "event_data": event_data }))
            .send()
            .await?;
        expect_status(response, &[200]).await?;
        Ok(())
    }

    /// Send the report notification. Returns Brevo's message id.
    #[tracing::instrument(skip(self, email), fields(to = %email.to))]
    pub async fn send_email(&self, email: &ReportEmail) -> Result<Option<String>, IntegrationError> {
        let body = json!({
            "sender": { "name": self.sender.name, "email": self.sender.email },
            "to": [{ "email": email.to }],
            "subject": email.subject(),
            "htmlContent": email.html_body(),
            "textContent": email.text_body(),
        });

        let response = self
            .request(Method::POST, "/smtp/email")
            .json(&body)
            .send()
            .await?;
        let sent: SentEmail = expect_status(response, &[200, 201, 202]).await?.json().await?;
        Ok(sent.message_id)
    }
}

/// Tags describing a lead.
///
/// `analyzer-<industry>` always; `has-chatbot` and `has-<vendor>` when a
/// chatbot was found; `high-priority` for priority HIGH.
pub fn lead_tags(industry: Industry, chatbot: &ChatbotDetection) -> Vec<String> {
    let mut tags = vec![format!("analyzer-{}", industry)];

    if chatbot.detected {
        tags.push("has-chatbot".to_string());
        if let Some(kind) = &chatbot.chatbot_type {
            tags.push(format!("has-{}", kind));
        }
    }

    if chatbot.priority == ChatbotPriority::High {
        tags.push("high-priority".to_string());
    }

    tags
}

/// Split a company name into (first word, remaining words).
fn split_name(company_name: &str) -> (String, String) {
    let mut words = company_name.split_whitespace();
    match words.next() {
        Some(first) => (first.to_string(), words.collect::<Vec<_>>().join(" ")),
        None => (company_name.to_string(), String::new()),
    }
}

fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Recorded, recorded, serve};
    use axum::{
        Json, Router,
        extract::{Path, State},
        http::StatusCode,
        routing::{get, post},
    };

    fn sender() -> Sender {
        Sender {
            name: "Robert Bruckner - ChatPro AI".into(),
            email: "robert@chatproai.io".into(),
        }
    }

    fn summary() -> AnalysisSummary {
        AnalysisSummary {
            company_name: "ADORO Aparthotel Wien".into(),
            website_url: "https://adoro-aparthotel.com".into(),
            industry: Industry::Hotel,
            email: "owner@adoro.at".into(),
            monthly_roi: 13180,
            roi_multiplier: 16.5,
            has_chatbot: true,
            chatbot_priority: "HIGH".into(),
        }
    }

    #[test]
    fn name_split() {
        assert_eq!(
            split_name("ADORO Aparthotel Wien"),
            ("ADORO".to_string(), "Aparthotel Wien".to_string())
        );
        assert_eq!(split_name("Solo"), ("Solo".to_string(), String::new()));
        assert_eq!(split_name(""), (String::new(), String::new()));
    }

    #[test]
    fn tags_for_gated_zendesk() {
        let chatbot = ChatbotDetection {
            detected: true,
            chatbot_type: Some("zendesk".into()),
            signature_found: Some("zendesk".into()),
            has_lead_form: true,
            priority: ChatbotPriority::High,
        };
        assert_eq!(
            lead_tags(Industry::Hotel, &chatbot),
            vec!["analyzer-hotel", "has-chatbot", "has-zendesk", "high-priority"]
        );
    }

    #[test]
    fn tags_without_chatbot() {
        assert_eq!(
            lead_tags(Industry::VacationRental, &ChatbotDetection::none()),
            vec!["analyzer-vacation_rental", "high-priority"]
        );
    }

    #[tokio::test]
    async fn save_lead_creates_contact() {
        let seen: Recorded<(String, Value)> = recorded();
        let app = Router::new()
            .route(
                "/contacts",
                post(
                    |State(seen): State<Recorded<(String, Value)>>,
                     headers: axum::http::HeaderMap,
                     Json(body): Json<Value>| async move {
                        let key = headers["api-key"].to_str().unwrap().to_string();
                        seen.lock().unwrap().push((key, body));
                        (StatusCode::CREATED, Json(json!({ "id": 42 })))
                    },
                ),
            )
            .with_state(seen.clone());
        let base = serve(app).await;

        let client = BrevoClient::new("xkeysib-test", base, 7, sender()).unwrap();
        let action = client.save_lead(&summary(), Uuid::nil()).await.unwrap();
        assert_eq!(action, LeadAction::Created { contact_id: Some(42) });
        assert_eq!(action.to_string(), "created contact 42");

        let seen = seen.lock().unwrap();
        let (key, body) = &seen[0];
        assert_eq!(key, "xkeysib-test");
        assert_eq!(body["email"], "owner@adoro.at");
        assert_eq!(body["attributes"]["FIRSTNAME"], "ADORO");
        assert_eq!(body["attributes"]["LASTNAME"], "Aparthotel Wien");
        assert_eq!(body["attributes"]["BRANCHE"], "Hotel");
        assert_eq!(body["attributes"]["ROI_MONAT"], 13180);
        assert_eq!(body["listIds"], json!([7]));
        assert_eq!(body["updateEnabled"], true);
    }

    #[tokio::test]
    async fn save_lead_reports_update_and_failure() {
        let updated = Router::new().route("/contacts", post(|| async { StatusCode::NO_CONTENT }));
        let client = BrevoClient::new("k", serve(updated).await, 7, sender()).unwrap();
        assert_eq!(
            client.save_lead(&summary(), Uuid::nil()).await.unwrap(),
            LeadAction::Updated
        );

        let rejected = Router::new().route(
            "/contacts",
            post(|| async { (StatusCode::BAD_REQUEST, "invalid_parameter") }),
        );
        let client = BrevoClient::new("k", serve(rejected).await, 7, sender()).unwrap();
        let err = client.save_lead(&summary(), Uuid::nil()).await.unwrap_err();
        assert!(matches!(
            err,
            IntegrationError::Status { status: 400, ref body } if body == "invalid_parameter"
        ));
    }

    #[tokio::test]
    async fn add_tags_merges_with_existing() {
        let written: Recorded<(String, Value)> = recorded();
        let app = Router::new()
            .route(
                "/contacts/{email}",
                get(|Path(email): Path<String>| async move {
                    Json(json!({ "email": email, "tags": ["newsletter", "analyzer-hotel"] }))
                })
                .put(
                    |State(written): State<Recorded<(String, Value)>>,
                     Path(email): Path<String>,
                     Json(body): Json<Value>| async move {
                        written.lock().unwrap().push((email, body));
                        StatusCode::NO_CONTENT
                    },
                ),
            )
            .with_state(written.clone());
        let client = BrevoClient::new("k", serve(app).await, 7, sender()).unwrap();

        let tags = client
            .add_tags(
                "owner@adoro.at",
                &["analyzer-hotel".to_string(), "high-priority".to_string()],
            )
            .await
            .unwrap();

        assert_eq!(tags, vec!["analyzer-hotel", "high-priority", "newsletter"]);
        let written = written.lock().unwrap();
        assert_eq!(written[0].0, "owner@adoro.at");
        assert_eq!(written[0].1["tags"], json!(tags));
    }

    #[tokio::test]
    async fn add_tags_requires_existing_contact() {
        let app = Router::new().route(
            "/contacts/{email}",
            get(|| async { StatusCode::NOT_FOUND }),
        );
        let client = BrevoClient::new("k", serve(app).await, 7, sender()).unwrap();

        let err = client
            .add_tags("ghost@example.com", &["x".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, IntegrationError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn send_email_posts_transactional_message() {
        let seen: Recorded<Value> = recorded();
        let app = Router::new()
            .route(
                "/smtp/email",
                post(
                    |State(seen): State<Recorded<Value>>, Json(body): Json<Value>| async move {
                        seen.lock().unwrap().push(body);
                        (StatusCode::CREATED, Json(json!({ "messageId": "<abc@smtp-relay>" })))
                    },
                ),
            )
            .with_state(seen.clone());
        let client = BrevoClient::new("k", serve(app).await, 7, sender()).unwrap();

        let email = ReportEmail {
            to: "owner@adoro.at".into(),
            company_name: "ADORO".into(),
            monthly_roi: 13180,
            roi_multiplier: 16.5,
            report_link: "/api/report/x".into(),
            analysis_id: Uuid::nil(),
        };
        let id = client.send_email(&email).await.unwrap();
        assert_eq!(id.as_deref(), Some("<abc@smtp-relay>"));

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0]["to"], json!([{ "email": "owner@adoro.at" }]));
        assert_eq!(seen[0]["sender"]["email"], "robert@chatproai.io");
        assert_eq!(seen[0]["subject"], "Ihre ChatPro AI Website-Analyse für ADORO");
        assert!(seen[0]["textContent"].as_str().unwrap().contains("/api/report/x"));
    }

    #[tokio::test]
    async fn trigger_automation_posts_event() {
        let seen: Recorded<Value> = recorded();
        let app = Router::new()
            .route(
                "/automation/webhooks/{event}",
                post(
                    |State(seen): State<Recorded<Value>>,
                     Path(event): Path<String>,
                     Json(body): Json<Value>| async move {
                        seen.lock().unwrap().push(json!({ "event": event, "body": body }));
                        StatusCode::OK
                    },
                ),
            )
            .with_state(seen.clone());
        let client = BrevoClient::new("k", serve(app).await, 7, sender()).unwrap();

        client
            .trigger_automation("owner@adoro.at", ANALYZER_COMPLETED, json!({ "monthly_roi": 13180 }))
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0]["event"], "analyzer_completed");
        assert_eq!(seen[0]["body"]["email"], "owner@adoro.at");
        assert_eq!(seen[0]["body"]["event_data"]["monthly_roi"], 13180);
    }
}
