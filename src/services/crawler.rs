//! Landing page crawler.
//!
//! Fetches a single page and extracts the signals the analyzer works with:
//! - Chatbot detection (Zendesk, Tidio, Intercom, ...)
//! - Lead form detection
//! - Language detection
//! - Contact information extraction
//!
//! Fetching is async; HTML analysis is a pure function over the body so it
//! can be tested without a network.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;
use std::time::{Duration, Instant};

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::models::crawl::{
    ChatbotDetection, ChatbotPriority, ContactInfo, CrawlReport, FormInput, LeadForm,
};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) ChatProAI-Analyzer/1.0";

/// Title used when the page has none.
pub const NO_TITLE: &str = "No title found";

const MAX_PAGES: usize = 100;
const MAX_CONTACTS: usize = 5;

/// Vendor signatures, checked in order. First match wins.
const CHATBOT_SIGNATURES: &[(&str, &[&str])] = &[
    (
        "zendesk",
        &["zdassets.com", "zendesk.com", "$zopim", "zEmbed", "zE("],
    ),
    ("tidio", &["tidio.co", "tidiochat", "tidioChatApi"]),
    ("intercom", &["intercom.io", "window.Intercom", "Intercom("]),
    ("drift", &["drift.com", "window.drift", "drift.load"]),
    ("livechat", &["livechatinc.com", "LC_API"]),
    ("freshchat", &["freshchat.com", "fcWidget"]),
    ("chatbot.com", &["chatbot.com", "chatbot-widget"]),
    ("hubspot", &["hubspot", "hs-analytics"]),
];

/// Markup hints of a chat widget from an unknown vendor.
const GENERIC_CHAT_INDICATORS: &[&str] = &["livechat", "live-chat", "chat-widget", "chat-button"];

const IMAGE_SUFFIXES: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp"];

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static HTML_ROOT: LazyLock<Selector> = LazyLock::new(|| selector("html"));
static META: LazyLock<Selector> = LazyLock::new(|| selector("meta"));
static FORM: LazyLock<Selector> = LazyLock::new(|| selector("form"));
static FORM_FIELD: LazyLock<Selector> = LazyLock::new(|| selector("input, textarea, select"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("static regex is valid")
});
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{2,4}\)?[-.\s]?\d{3,4}[-.\s]?\d{3,4}")
        .expect("static regex is valid")
});

#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Website returned HTTP {0}")]
    Status(u16),

    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),
}

/// Raw result of one page fetch.
#[derive(Debug)]
pub struct PageFetch<'a> {
    pub url: &'a str,
    pub final_url: &'a str,
    pub status_code: u16,
    pub response_time_ms: u64,
    pub html: &'a str,
}

/// HTTP crawler with a shared connection pool.
#[derive(Debug, Clone)]
pub struct Crawler {
    client: reqwest::Client,
    timeout: Duration,
}

impl Crawler {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, timeout })
    }

    /// Fetch and analyse a landing page.
    ///
    /// # Errors
    ///
    /// - `InvalidUrl`: the URL cannot be parsed or has no host
    /// - `Timeout`: no complete response within the configured timeout
    /// - `Status`: the site answered with a non-2xx status
    /// - `Request`: any other transport failure
    #[tracing::instrument(skip(self))]
    pub async fn crawl(&self, url: &str) -> Result<CrawlReport, CrawlError> {
        let url = normalize_url(url)?;
        let started = Instant::now();

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        let response_time_ms = started.elapsed().as_millis() as u64;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Status(status.as_u16()));
        }

        let final_url = response.url().to_string();
        let html = response.text().await.map_err(|e| self.classify(e))?;

        tracing::debug!(bytes = html.len(), response_time_ms, "page fetched");

        Ok(analyze_html(PageFetch {
            url: url.as_str(),
            final_url: &final_url,
            status_code: status.as_u16(),
            response_time_ms,
            html: &html,
        }))
    }

    fn classify(&self, error: reqwest::Error) -> CrawlError {
        if error.is_timeout() {
            CrawlError::Timeout(self.timeout.as_secs())
        } else {
            CrawlError::Request(error)
        }
    }
}

/// Complete a scheme-less URL with `https://` and validate it.
pub fn normalize_url(raw: &str) -> Result<Url, CrawlError> {
    let raw = raw.trim();
    let candidate = if raw.starts_with("http") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };

    let url = Url::parse(&candidate).map_err(|_| CrawlError::InvalidUrl(raw.to_string()))?;
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(CrawlError::InvalidUrl(raw.to_string())),
    }
}

/// Extract every crawl signal from a fetched page.
pub fn analyze_html(page: PageFetch<'_>) -> CrawlReport {
    let document = Html::parse_document(page.html);

    let lead_forms = find_lead_forms(&document);
    let chatbot = detect_chatbot(&page.html.to_lowercase(), &lead_forms);

    CrawlReport {
        url: page.url.to_string(),
        final_url: page.final_url.to_string(),
        status_code: page.status_code,
        title: title(&document),
        meta_description: meta_content(&document, "description").unwrap_or_default(),
        languages: detect_languages(&document),
        chatbot,
        lead_forms,
        pages_count: count_pages(&document),
        mobile_responsive: meta_content(&document, "viewport").is_some(),
        contact_info: find_contact_info(&document, page.html),
        response_time_ms: page.response_time_ms,
    }
}

fn title(document: &Html) -> String {
    document
        .select(&TITLE)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string())
}

/// `content` of the first `<meta name="...">` with the given name.
fn meta_content(document: &Html, name: &str) -> Option<String> {
    document
        .select(&META)
        .find(|el| {
            el.value()
                .attr("name")
                .is_some_and(|n| n.eq_ignore_ascii_case(name))
        })
        .map(|el| el.value().attr("content").unwrap_or_default().trim().to_string())
}

fn detect_languages(document: &Html) -> Vec<String> {
    let html_lang = document
        .select(&HTML_ROOT)
        .filter_map(|el| el.value().attr("lang"));
    let meta_lang = document
        .select(&META)
        .filter_map(|el| el.value().attr("lang"));

    let languages: BTreeSet<String> = html_lang
        .chain(meta_lang)
        .map(|lang| lang.chars().take(2).collect::<String>())
        .filter(|lang| !lang.is_empty())
        .collect();

    if languages.is_empty() {
        vec!["en".to_string()]
    } else {
        languages.into_iter().collect()
    }
}

/// `html_lower` must already be lower-cased.
fn detect_chatbot(html_lower: &str, lead_forms: &[LeadForm]) -> ChatbotDetection {
    let vendor = CHATBOT_SIGNATURES.iter().find_map(|(vendor, signatures)| {
        signatures
            .iter()
            .find(|sig| html_lower.contains(&sig.to_lowercase()))
            .map(|sig| (*vendor, *sig))
    });

    let (chatbot_type, signature) = match vendor {
        Some(found) => found,
        None => match GENERIC_CHAT_INDICATORS
            .iter()
            .find(|indicator| html_lower.contains(*indicator))
        {
            Some(indicator) => ("generic", *indicator),
            None => return ChatbotDetection::none(),
        },
    };

    let has_lead_form = lead_forms.iter().any(LeadForm::asks_for_email);
    let priority = if has_lead_form || chatbot_type == "zendesk" {
        ChatbotPriority::High
    } else if chatbot_type == "generic" {
        ChatbotPriority::Medium
    } else {
        ChatbotPriority::Low
    };

    ChatbotDetection {
        detected: true,
        chatbot_type: Some(chatbot_type.to_string()),
        signature_found: Some(signature.to_string()),
        has_lead_form,
        priority,
    }
}

fn find_lead_forms(document: &Html) -> Vec<LeadForm> {
    document
        .select(&FORM)
        .filter_map(|form| {
            let inputs: Vec<FormInput> = form
                .select(&FORM_FIELD)
                .filter_map(|field| {
                    let name = field.value().attr("name").unwrap_or_default();
                    (!name.is_empty()).then(|| FormInput {
                        input_type: field.value().attr("type").unwrap_or("text").to_string(),
                        name: name.to_string(),
                    })
                })
                .collect();

            (!inputs.is_empty()).then(|| LeadForm {
                action: form.value().attr("action").unwrap_or_default().to_string(),
                method: form
                    .value()
                    .attr("method")
                    .unwrap_or_default()
                    .to_uppercase(),
                inputs,
            })
        })
        .collect()
}

fn count_pages(document: &Html) -> usize {
    let pages: HashSet<&str> = document
        .select(&LINK)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| href.starts_with('/') || href.starts_with("http"))
        .collect();

    pages.len().min(MAX_PAGES)
}

/// E-mails come from the raw source (covers `mailto:` links), phone numbers
/// from `tel:` links and visible text only.
fn find_contact_info(document: &Html, html: &str) -> ContactInfo {
    let emails = first_distinct(
        EMAIL_RE
            .find_iter(html)
            .map(|m| m.as_str().to_string())
            .filter(|email| {
                let lower = email.to_lowercase();
                !IMAGE_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
            }),
    );

    let tel_links = document
        .select(&LINK)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| href.strip_prefix("tel:"))
        .map(|tel| tel.trim().to_string());

    let text = visible_text(document);
    let text_phones = PHONE_RE
        .find_iter(&text)
        .map(|m| collapse_whitespace(m.as_str()))
        .collect::<Vec<_>>();

    let phones = first_distinct(
        tel_links
            .chain(text_phones)
            .filter(|phone| phone.chars().filter(char::is_ascii_digit).count() >= 7),
    );

    ContactInfo { emails, phones }
}

fn visible_text(document: &Html) -> String {
    let mut text = String::new();
    for node in document.root_element().descendants() {
        let Some(chunk) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(ElementRef::wrap)
            .is_some_and(|el| matches!(el.value().name(), "script" | "style" | "noscript"));
        if !hidden {
            text.push_str(chunk);
            text.push(' ');
        }
    }
    text
}

fn first_distinct(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .filter(|item| seen.insert(item.clone()))
        .take(MAX_CONTACTS)
        .collect()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use axum::{Router, http::StatusCode, response::Html as HtmlResponse, routing::get};

    const ADORO: &str = r##"<!DOCTYPE html>
<html lang="de-DE">
<head>
  <title>
    ADORO Aparthotel
  </title>
  <meta name="description" content=" Apartments in Baden-Baden ">
  <meta name="viewport" content="width=device-width">
  <meta http-equiv="content-language" lang="en">
  <script src="https://static.zdassets.com/ekr/snippet.js"></script>
  <script>var tracking = 20240101123456;</script>
</head>
<body>
  <a href="/zimmer">Zimmer</a>
  <a href="/zimmer">Zimmer again</a>
  <a href="https://adoro-aparthotel.com/kontakt">Kontakt</a>
  <a href="#top">Top</a>
  <a href="mailto:contact@adoro-aparthotel.com">Mail</a>
  <a href="tel:+4972233009640">Call</a>
  <img src="logo@2x.png">
  <form action="/anfrage" method="post">
    <input type="email" name="email">
    <textarea name="message"></textarea>
    <input type="submit">
  </form>
  <form action="/search"><input type="text"></form>
  <p>Telefon: +49 7223 300964</p>
</body>
</html>"##;

    fn page(html: &str) -> CrawlReport {
        analyze_html(PageFetch {
            url: "https://adoro-aparthotel.com/",
            final_url: "https://adoro-aparthotel.com/",
            status_code: 200,
            response_time_ms: 465,
            html,
        })
    }

    #[test]
    fn extracts_page_signals() {
        let report = page(ADORO);

        assert_eq!(report.title, "ADORO Aparthotel");
        assert_eq!(report.meta_description, "Apartments in Baden-Baden");
        assert_eq!(report.languages, vec!["de", "en"]);
        assert!(report.mobile_responsive);
        assert_eq!(report.pages_count, 2);
        assert_eq!(report.response_time_ms, 465);
    }

    #[test]
    fn detects_gated_zendesk_chat() {
        let report = page(ADORO);

        assert!(report.has_chatbot());
        assert_eq!(report.chatbot.chatbot_type.as_deref(), Some("zendesk"));
        assert_eq!(report.chatbot.signature_found.as_deref(), Some("zdassets.com"));
        assert!(report.chatbot.has_lead_form);
        assert_eq!(report.chatbot.priority, ChatbotPriority::High);
    }

    #[test]
    fn lead_forms_require_named_inputs() {
        let report = page(ADORO);

        assert_eq!(report.lead_forms.len(), 1);
        let form = &report.lead_forms[0];
        assert_eq!(form.action, "/anfrage");
        assert_eq!(form.method, "POST");
        assert_eq!(
            form.inputs,
            vec![
                FormInput {
                    input_type: "email".into(),
                    name: "email".into()
                },
                FormInput {
                    input_type: "text".into(),
                    name: "message".into()
                },
            ]
        );
    }

    #[test]
    fn contact_info_skips_scripts_and_images() {
        let report = page(ADORO);

        assert_eq!(
            report.contact_info.emails,
            vec!["contact@adoro-aparthotel.com"]
        );
        assert_eq!(report.contact_info.phones[0], "+4972233009640");
        assert!(report.contact_info.phones.contains(&"+49 7223 300964".to_string()));
        assert!(
            !report
                .contact_info
                .phones
                .iter()
                .any(|p| p.contains("20240101"))
        );
    }

    #[test]
    fn contact_info_keeps_first_five_distinct() {
        let mut html = String::from(
            r#"<a href="mailto:info0@hotel-adler.de">m</a><a href="tel:+49301000000">t</a>"#,
        );
        for i in 0..7 {
            html.push_str(&format!(
                r#"<a href="mailto:info{i}@hotel-adler.de">m</a><a href="tel:+4930100000{i}">t</a>"#
            ));
        }
        let report = page(&html);

        let emails: Vec<String> = (0..5).map(|i| format!("info{i}@hotel-adler.de")).collect();
        let phones: Vec<String> = (0..5).map(|i| format!("+4930100000{i}")).collect();
        assert_eq!(report.contact_info.emails, emails);
        assert_eq!(report.contact_info.phones, phones);
    }

    #[test]
    fn title_is_trimmed_and_languages_keep_case() {
        let report = page(
            r#"<html lang="DE-de"><head><title>  Hotel   Adler </title>
            <meta lang="fr-FR"></head></html>"#,
        );

        assert_eq!(report.title, "Hotel   Adler");
        assert_eq!(report.languages, vec!["DE", "fr"]);
    }

    #[test]
    fn empty_page_falls_back_to_defaults() {
        let report = page("<html><body><p>hello</p></body></html>");

        assert_eq!(report.title, NO_TITLE);
        assert_eq!(report.languages, vec!["en"]);
        assert!(!report.mobile_responsive);
        assert!(!report.has_chatbot());
        assert_eq!(report.chatbot.priority, ChatbotPriority::High);
        assert_eq!(report.pages_count, 0);
    }

    #[test]
    fn chatbot_priority_by_vendor() {
        let intercom = page(r#"<script>window.Intercom("boot")</script>"#);
        assert_eq!(intercom.chatbot.chatbot_type.as_deref(), Some("intercom"));
        assert_eq!(intercom.chatbot.priority, ChatbotPriority::Low);

        let generic = page(r#"<div class="chat-widget"></div>"#);
        assert_eq!(generic.chatbot.chatbot_type.as_deref(), Some("generic"));
        assert_eq!(generic.chatbot.priority, ChatbotPriority::Medium);
    }

    #[test]
    fn page_count_is_capped() {
        let links: String = (0..150).map(|i| format!(r#"<a href="/p{i}">p</a>"#)).collect();
        assert_eq!(page(&links).pages_count, MAX_PAGES);
    }

    #[test]
    fn normalizes_scheme_less_urls() {
        assert_eq!(
            normalize_url("example.com").unwrap().as_str(),
            "https://example.com/"
        );
        assert_eq!(
            normalize_url(" http://example.com/a ").unwrap().as_str(),
            "http://example.com/a"
        );
        assert!(matches!(
            normalize_url("https://"),
            Err(CrawlError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn crawls_a_live_page() {
        let base = test_support::serve(
            Router::new()
                .route("/", get(|| async { HtmlResponse(ADORO) }))
                .route("/gone", get(|| async { StatusCode::NOT_FOUND })),
        )
        .await;
        let crawler = Crawler::new(Duration::from_secs(5)).unwrap();

        let report = crawler.crawl(&base).await.unwrap();
        assert_eq!(report.status_code, 200);
        assert_eq!(report.title, "ADORO Aparthotel");

        let err = crawler.crawl(&format!("{}/gone", base)).await.unwrap_err();
        assert!(matches!(err, CrawlError::Status(404)));
    }
}
