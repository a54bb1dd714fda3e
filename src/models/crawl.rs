//! Crawler output models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Everything the crawler learned about a landing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlReport {
    /// Normalized request URL
    pub url: String,

    /// URL after redirects
    pub final_url: String,

    pub status_code: u16,
    pub title: String,
    pub meta_description: String,

    /// Two-letter language codes, sorted
    pub languages: Vec<String>,

    pub chatbot: ChatbotDetection,
    pub lead_forms: Vec<LeadForm>,

    /// Distinct internal/absolute links, capped at 100
    pub pages_count: usize,

    pub mobile_responsive: bool,
    pub contact_info: ContactInfo,
    pub response_time_ms: u64,
}

impl CrawlReport {
    pub fn has_chatbot(&self) -> bool {
        self.chatbot.detected
    }
}

/// How urgently the site needs a (better) chatbot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChatbotPriority {
    High,
    Medium,
    Low,
}

impl ChatbotPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatbotPriority::High => "HIGH",
            ChatbotPriority::Medium => "MEDIUM",
            ChatbotPriority::Low => "LOW",
        }
    }

    /// Action label used in the report.
    pub fn action_label(&self) -> &'static str {
        match self {
            ChatbotPriority::High => "SOFORT UMSETZEN",
            ChatbotPriority::Medium => "KURZFRISTIG UMSETZEN",
            ChatbotPriority::Low => "STRATEGISCH PLANEN",
        }
    }
}

impl fmt::Display for ChatbotPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of scanning the page source for chat widgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatbotDetection {
    pub detected: bool,

    /// Vendor key (e.g. "zendesk") or "generic"
    pub chatbot_type: Option<String>,

    /// The signature that matched
    pub signature_found: Option<String>,

    /// The page also asks for an e-mail address in a form, i.e. the chat is
    /// gated behind a lead form.
    pub has_lead_form: bool,

    pub priority: ChatbotPriority,
}

impl ChatbotDetection {
    pub fn none() -> Self {
        Self {
            detected: false,
            chatbot_type: None,
            signature_found: None,
            has_lead_form: false,
            priority: ChatbotPriority::High,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadForm {
    pub action: String,

    /// Upper-cased, empty when the form has no method attribute
    pub method: String,

    pub inputs: Vec<FormInput>,
}

impl LeadForm {
    /// Whether one of the inputs collects an e-mail address.
    pub fn asks_for_email(&self) -> bool {
        self.inputs.iter().any(|input| {
            input.input_type.eq_ignore_ascii_case("email")
                || input.name.to_ascii_lowercase().contains("mail")
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    #[serde(rename = "type")]
    pub input_type: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
}
