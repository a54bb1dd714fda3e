//! Files partner applications as pages in a Notion database.

use chrono::{NaiveDate, Utc};
use serde_json::{Value, json};

use crate::config::Config;
use crate::models::partner::PartnerRequest;
use crate::services::integration::{
    DEFAULT_TIMEOUT, IntegrationError, expect_status, http_client,
};

const NOTION_VERSION: &str = "2022-06-28";

#[derive(Debug, Clone)]
pub struct NotionClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    database_id: String,
}

impl NotionClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        database_id: impl Into<String>,
    ) -> Result<Self, IntegrationError> {
        Ok(Self {
            client: http_client(DEFAULT_TIMEOUT)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            database_id: database_id.into(),
        })
    }

    /// Client for the configured workspace, or `None` without `NOTION_API_KEY`.
    pub fn from_config(config: &Config) -> Result<Option<Self>, IntegrationError> {
        config
            .notion_api_key
            .as_ref()
            .map(|key| {
                Self::new(
                    key.clone(),
                    config.notion_base_url.clone(),
                    config.notion_database_id.clone(),
                )
            })
            .transpose()
    }

    /// Create a page for the application. Notion answers 200 on success.
    #[tracing::instrument(skip(self, request), fields(company = %request.company))]
    pub async fn create_partner_page(
        &self,
        request: &PartnerRequest,
    ) -> Result<(), IntegrationError> {
        let page = partner_page(&self.database_id, request, Utc::now().date_naive());

        let response = self
            .client
            .post(format!("{}/pages", self.base_url))
            .bearer_auth(&self.api_key)
            .header("Notion-Version", NOTION_VERSION)
            .json(&page)
            .send()
            .await?;
        expect_status(response, &[200]).await?;

        Ok(())
    }
}

/// Page body for one application. New applications start in status "Neu".
pub fn partner_page(database_id: &str, request: &PartnerRequest, received: NaiveDate) -> Value {
    json!({
        "parent": { "database_id": database_id },
        "properties": {
            "Name": { "title": [{ "text": { "content": request.name } }] },
            "Firma": { "rich_text": [{ "text": { "content": request.company } }] },
            "Email": { "email": request.email },
            "Telefon": { "phone_number": request.phone },
            "Website": { "url": request.website },
            "Status": { "select": { "name": "Neu" } },
            "Eingegangen": { "date": { "start": received.format("%Y-%m-%d").to_string() } },
        }
    })
}
