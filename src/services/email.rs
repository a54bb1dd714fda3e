//! Report notification e-mail.
//!
//! Builds the subject, HTML body and plain-text body sent to the requester
//! once their report is ready. Delivery goes through
//! [`BrevoClient::send_email`](crate::services::brevo::BrevoClient::send_email).

use maud::{DOCTYPE, Markup, html};
use uuid::Uuid;

use crate::services::analyzer::euros;

const DEMO_URL: &str = "https://calendly.com/chatproaiio/30min";
const TRACKING_URL: &str = "https://track.chatproai.io/open";
const IMPRINT_URL: &str = "https://www.chatproai.io/impressum.html";
const PRIVACY_URL: &str = "https://www.chatproai.io/datenschutz.html";

const REPORT_CONTENTS: [&str; 5] = [
    "Website-Analyse mit technischen Details",
    "Chatbot-Analyse und Schwachstellen",
    "ROI-Berechnung mit transparenten Quellen",
    "Konkrete Handlungsempfehlungen",
    "Vollständiges Quellenverzeichnis",
];

const GRADIENT: &str = "linear-gradient(135deg, #667eea 0%, #764ba2 100%)";

#[derive(Debug, Clone)]
pub struct ReportEmail {
    pub to: String,
    pub company_name: String,
    pub monthly_roi: i64,
    pub roi_multiplier: f64,

    /// Link the recipient downloads the report from
    pub report_link: String,

    pub analysis_id: Uuid,
}

impl ReportEmail {
    pub fn subject(&self) -> String {
        format!("Ihre ChatPro AI Website-Analyse für {}", self.company_name)
    }

    pub fn html_body(&self) -> String {
        html! {
            (DOCTYPE)
            html lang="de" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { "Ihre ChatPro AI Analyse" }
                }
                body style="margin: 0; padding: 0; font-family: 'Inter', -apple-system, 'Segoe UI', sans-serif; background-color: #f3f4f6;" {
                    table role="presentation" style="width: 100%; border-collapse: collapse; background-color: #f3f4f6;" {
                        tr {
                            td style="padding: 40px 20px;" {
                                table role="presentation" style="max-width: 600px; margin: 0 auto; background-color: #ffffff; border-radius: 12px; overflow: hidden;" {
                                    (self.header())
                                    (self.content())
                                    (self.footer())
                                }
                            }
                        }
                    }
                }
            }
        }
        .into_string()
    }

    pub fn text_body(&self) -> String {
        let contents: String = REPORT_CONTENTS
            .iter()
            .map(|line| format!("- {}\n", line))
            .collect();

        format!(
            "ChatPro AI Website-Analyse - {company}\n\
             \n\
             Hallo,\n\
             \n\
             vielen Dank für Ihr Interesse an ChatPro AI! Ihre persönliche Website-Analyse für {company} ist fertig.\n\
             \n\
             ROI-POTENZIAL: {roi} pro Monat\n\
             \n\
             Im Report enthalten:\n\
             {contents}\
             \n\
             Report herunterladen:\n\
             {link}\n\
             \n\
             Nächster Schritt:\n\
             Buchen Sie eine kostenlose 30-Minuten Demo und sehen Sie ChatPro AI live in Aktion!\n\
             \n\
             Demo buchen:\n\
             {demo}\n\
             \n\
             Bei Fragen stehe ich Ihnen gerne zur Verfügung!\n\
             \n\
             Beste Grüße,\n\
             Robert Bruckner\n\
             ChatPro AI\n\
             \n\
             ---\n\
             ChatPro AI - 24/7 AI-Chatbot Lösungen\n\
             robert@chatproai.io\n\
             www.chatproai.io\n\
             \n\
             Impressum: {imprint}\n\
             Datenschutz: {privacy}\n",
            company = self.company_name,
            roi = euros(self.monthly_roi),
            contents = contents,
            link = self.report_link,
            demo = DEMO_URL,
            imprint = IMPRINT_URL,
            privacy = PRIVACY_URL,
        )
    }

    fn header(&self) -> Markup {
        html! {
            tr {
                td style=(format!("background: {}; padding: 40px 30px; text-align: center;", GRADIENT)) {
                    div style="font-size: 48px; margin-bottom: 10px;" { "🤖" }
                    h1 style="margin: 0; color: #ffffff; font-size: 28px; font-weight: 700;" { "ChatPro AI Analyzer" }
                    p style="margin: 10px 0 0; color: rgba(255,255,255,0.9); font-size: 16px;" { "Ihre Website-Analyse ist fertig!" }
                }
            }
        }
    }

    fn content(&self) -> Markup {
        let paragraph = "margin: 0 0 20px; color: #374151; font-size: 16px; line-height: 1.6;";

        html! {
            tr {
                td style="padding: 40px 30px;" {
                    p style=(paragraph) { "Hallo," }
                    p style=(paragraph) {
                        "vielen Dank für Ihr Interesse an ChatPro AI! Ihre persönliche Website-Analyse für "
                        strong { (self.company_name) }
                        " ist fertig."
                    }
                    table role="presentation" style=(format!("width: 100%; margin: 30px 0; background: {}; border-radius: 12px;", GRADIENT)) {
                        tr {
                            td style="padding: 30px; text-align: center; color: #ffffff;" {
                                div style="font-size: 14px; margin-bottom: 10px;" { "ROI-POTENZIAL" }
                                div style="font-size: 42px; font-weight: 700; margin-bottom: 10px;" { (euros(self.monthly_roi)) }
                                div style="font-size: 16px;" { "pro Monat" }
                                div style="margin-top: 20px; padding-top: 20px; border-top: 1px solid rgba(255,255,255,0.2);" {
                                    span style="font-size: 14px;" { "ROI-Multiplikator: " }
                                    span style="font-size: 24px; font-weight: 700;" { (format!("{:.1}x", self.roi_multiplier)) }
                                }
                            }
                        }
                    }
                    div style="background-color: #f0f9ff; border: 2px solid #bfdbfe; border-radius: 8px; padding: 20px; margin: 30px 0;" {
                        h3 style="margin: 0 0 15px; color: #1e40af; font-size: 18px;" { "📄 Im Report enthalten:" }
                        ul style="margin: 0; padding: 0 0 0 20px; color: #1e3a8a;" {
                            @for line in REPORT_CONTENTS {
                                li style="margin-bottom: 8px;" { (line) }
                            }
                        }
                    }
                    p style="text-align: center; margin: 30px 0;" {
                        a href=(self.report_link) style=(format!("display: inline-block; background: {}; color: #ffffff; text-decoration: none; padding: 16px 40px; border-radius: 8px; font-weight: 600;", GRADIENT)) {
                            "📥 Report jetzt herunterladen"
                        }
                    }
                    p style=(paragraph) {
                        strong { "Nächster Schritt:" }
                        br;
                        "Buchen Sie eine kostenlose 30-Minuten Demo und sehen Sie ChatPro AI live in Aktion!"
                    }
                    p style="text-align: center; margin: 20px 0;" {
                        a href=(DEMO_URL) style="display: inline-block; background-color: #10b981; color: #ffffff; text-decoration: none; padding: 14px 32px; border-radius: 8px; font-weight: 600;" {
                            "📅 Kostenlose Demo buchen"
                        }
                    }
                    p style=(paragraph) { "Bei Fragen stehe ich Ihnen gerne zur Verfügung!" }
                    p style=(paragraph) {
                        "Beste Grüße," br; strong { "Robert Bruckner" } br; "ChatPro AI"
                    }
                }
            }
        }
    }

    fn footer(&self) -> Markup {
        html! {
            tr {
                td style="background-color: #f9fafb; padding: 30px; text-align: center; border-top: 1px solid #e5e7eb; color: #6b7280;" {
                    p style="margin: 0 0 10px; font-size: 14px;" {
                        strong { "ChatPro AI" } " - 24/7 AI-Chatbot Lösungen"
                    }
                    p style="margin: 0 0 15px; font-size: 13px;" {
                        "📧 robert@chatproai.io | 🌐 www.chatproai.io"
                    }
                    p style="margin: 0; font-size: 12px;" {
                        a href=(IMPRINT_URL) style="color: #6b7280;" { "Impressum" }
                        " | "
                        a href=(PRIVACY_URL) style="color: #6b7280;" { "Datenschutz" }
                    }
                    img src=(format!("{}/{}", TRACKING_URL, self.analysis_id)) width="1" height="1" alt="" style="display: block; margin: 20px auto 0;";
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> ReportEmail {
        ReportEmail {
            to: "owner@adoro-aparthotel.com".into(),
            company_name: "ADORO Aparthotel".into(),
            monthly_roi: 13180,
            roi_multiplier: 16.5,
            report_link: "https://analyzer.chatproai.io/api/report/abc".into(),
            analysis_id: Uuid::nil(),
        }
    }

    #[test]
    fn subject_names_company() {
        assert_eq!(
            email().subject(),
            "Ihre ChatPro AI Website-Analyse für ADORO Aparthotel"
        );
    }

    #[test]
    fn html_body_has_figures_links_and_pixel() {
        let body = email().html_body();

        assert!(body.contains("€13.180"));
        assert!(body.contains("16.5x"));
        assert!(body.contains("https://analyzer.chatproai.io/api/report/abc"));
        assert!(body.contains(DEMO_URL));
        assert!(body.contains("https://track.chatproai.io/open/00000000-0000-0000-0000-000000000000"));
    }

    #[test]
    fn html_body_escapes_company_name() {
        let mut email = email();
        email.company_name = "<b>Evil</b>".into();

        let body = email.html_body();
        assert!(!body.contains("<b>Evil</b>"));
        assert!(body.contains("&lt;b&gt;Evil&lt;/b&gt;"));
    }

    #[test]
    fn text_body_lists_report_contents() {
        let body = email().text_body();

        assert!(body.starts_with("ChatPro AI Website-Analyse - ADORO Aparthotel\n"));
        assert!(body.contains("ROI-POTENZIAL: €13.180 pro Monat"));
        assert!(body.contains("- Vollständiges Quellenverzeichnis\n"));
        assert!(body.contains("Report herunterladen:\nhttps://analyzer.chatproai.io/api/report/abc\n"));
    }
}
