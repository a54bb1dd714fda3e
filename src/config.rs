//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `PORT` (optional): HTTP server port, defaults to 8000
/// - `DATABASE_URL` (optional): PostgreSQL connection string. Without it
///   analyses are kept in memory.
/// - `OUTPUT_DIR` (optional): where reports are written
/// - `BREVO_API_KEY` (optional): enables CRM sync and report e-mails
/// - `NOTION_API_KEY` (optional): required by the partner endpoint
/// - `COMPLETION_WEBHOOK_URL` / `COMPLETION_WEBHOOK_SECRET` (optional)
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    pub database_url: Option<String>,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Absolute base URL used for links that leave the API (e-mails).
    pub public_base_url: Option<String>,

    #[serde(default = "default_crawl_timeout")]
    pub crawl_timeout_secs: u64,

    #[serde(default = "default_chromium_path")]
    pub chromium_path: String,

    #[serde(default = "default_true")]
    pub render_pdf: bool,

    #[serde(default = "default_pdf_timeout")]
    pub pdf_timeout_secs: u64,

    pub brevo_api_key: Option<String>,

    #[serde(default = "default_brevo_base_url")]
    pub brevo_base_url: String,

    #[serde(default = "default_brevo_list_id")]
    pub brevo_list_id: i64,

    #[serde(default = "default_sender_email")]
    pub sender_email: String,

    #[serde(default = "default_sender_name")]
    pub sender_name: String,

    pub notion_api_key: Option<String>,

    #[serde(default = "default_notion_database_id")]
    pub notion_database_id: String,

    #[serde(default = "default_notion_base_url")]
    pub notion_base_url: String,

    pub completion_webhook_url: Option<String>,

    pub completion_webhook_secret: Option<String>,
}

/// Default port if PORT environment variable is not set.
fn default_port() -> u16 {
    8000
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("/mnt/user-data/outputs")
}

fn default_crawl_timeout() -> u64 {
    30
}

fn default_chromium_path() -> String {
    "chromium".to_string()
}

fn default_true() -> bool {
    true
}

fn default_pdf_timeout() -> u64 {
    60
}

fn default_brevo_base_url() -> String {
    "https://api.brevo.com/v3".to_string()
}

/// "Google Ads Leads" list in Brevo.
fn default_brevo_list_id() -> i64 {
    7
}

fn default_sender_email() -> String {
    "robert@chatproai.io".to_string()
}

fn default_sender_name() -> String {
    "Robert Bruckner - ChatPro AI".to_string()
}

fn default_notion_database_id() -> String {
    "2fc040f31f9d81c29f31dc85b4f9b106".to_string()
}

fn default_notion_base_url() -> String {
    "https://api.notion.com/v1".to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable value cannot be parsed
    /// into the expected type (e.g. `PORT=abc`).
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are automatically converted: output_dir -> OUTPUT_DIR
        envy::from_env::<Config>()
    }

    /// Build a configuration from an explicit list of variables.
    ///
    /// Unset variables fall back to the same defaults as [`Config::from_env`].
    #[cfg(test)]
    pub fn from_pairs<I>(pairs: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(pairs)
    }

    pub fn crawl_timeout(&self) -> Duration {
        Duration::from_secs(self.crawl_timeout_secs)
    }

    pub fn pdf_timeout(&self) -> Duration {
        Duration::from_secs(self.pdf_timeout_secs)
    }

    /// Absolute link to a report, when a public base URL is configured.
    ///
    /// Falls back to the API-relative path.
    pub fn report_link(&self, report_path: &str) -> String {
        match &self.public_base_url {
            Some(base) => format!("{}{}", base.trim_end_matches('/'), report_path),
            None => report_path.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(vars: &[(&str, &str)]) -> Vec<(String, String)> {
        vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_pairs(Vec::new()).unwrap();

        assert_eq!(config.port, 8000);
        assert!(config.database_url.is_none());
        assert_eq!(config.output_dir, PathBuf::from("/mnt/user-data/outputs"));
        assert_eq!(config.crawl_timeout(), Duration::from_secs(30));
        assert!(config.render_pdf);
        assert_eq!(config.brevo_list_id, 7);
        assert_eq!(config.notion_database_id, "2fc040f31f9d81c29f31dc85b4f9b106");
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_pairs(pairs(&[
            ("PORT", "9001"),
            ("RENDER_PDF", "false"),
            ("BREVO_API_KEY", "xkeysib-123"),
            ("CRAWL_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9001);
        assert!(!config.render_pdf);
        assert_eq!(config.brevo_api_key.as_deref(), Some("xkeysib-123"));
        assert_eq!(config.crawl_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn invalid_port_is_rejected() {
        assert!(Config::from_pairs(pairs(&[("PORT", "eighty")])).is_err());
    }

    #[test]
    fn report_link_uses_public_base() {
        let config =
            Config::from_pairs(pairs(&[("PUBLIC_BASE_URL", "https://analyzer.chatproai.io/")]))
                .unwrap();
        assert_eq!(
            config.report_link("/api/report/abc"),
            "https://analyzer.chatproai.io/api/report/abc"
        );

        let config = Config::from_pairs(Vec::new()).unwrap();
        assert_eq!(config.report_link("/api/report/abc"), "/api/report/abc");
    }
}
