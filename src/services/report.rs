//! German consulting-style analysis report.
//!
//! The report is rendered to HTML with `maud` (all interpolated text is
//! escaped) and, when a [`PdfRenderer`] is configured, printed to PDF.
//!
//! # Layout
//!
//! 1. Cover page
//! 2. Executive summary (traffic lights, KPIs)
//! 3. Technical status quo
//! 4. Chatbot analysis and identified risks
//! 5. ROI breakdown with bar chart
//! 6. Recommendations
//! 7. Call to action
//! 8. Sources (own page)

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use uuid::Uuid;

use crate::models::{
    analysis::{Industry, short_id},
    crawl::{ChatbotPriority, CrawlReport},
    insights::{Insights, RoiCalculation, WebsiteCheck},
};
use crate::services::analyzer::euros;
use crate::services::pdf::{PdfRenderer, RenderError};

const DEMO_URL: &str = "https://calendly.com/chatproaiio/30min";

const STYLE: &str = r#"
:root {
  --primary-navy: #0f172a;
  --accent-blue: #2563eb;
  --text-primary: #1e293b;
  --text-secondary: #64748b;
  --success-green: #059669;
  --warning-orange: #d97706;
  --danger-red: #dc2626;
  --surface-light: #f8fafc;
  --border-light: #e2e8f0;
}
@page { size: A4; margin: 0; }
* { -webkit-print-color-adjust: exact; print-color-adjust: exact; }
body { font-family: 'Inter', -apple-system, 'Segoe UI', Roboto, sans-serif; margin: 0; color: var(--text-primary); font-size: 12px; line-height: 1.6; }
.cover-page { min-height: 100vh; page-break-after: always; background: linear-gradient(135deg, var(--primary-navy) 0%, #1e40af 100%); color: #fff; padding: 80px 60px; box-sizing: border-box; display: flex; flex-direction: column; justify-content: space-between; }
.logo { font-size: 18px; font-weight: 700; letter-spacing: 2px; }
.cover-title { font-size: 40px; font-weight: 700; margin-top: 120px; }
.company-name { font-size: 26px; font-weight: 300; margin-top: 12px; }
.cover-meta { display: grid; grid-template-columns: 1fr 1fr; gap: 24px; margin-top: 60px; font-size: 13px; }
.cover-footer { font-size: 11px; opacity: 0.8; }
.content-page { padding: 40px 60px; }
.page-title { font-size: 26px; color: var(--primary-navy); border-bottom: 3px solid var(--accent-blue); padding-bottom: 8px; }
.section-header { display: flex; align-items: center; gap: 12px; margin-bottom: 16px; }
.section-number { background: var(--accent-blue); color: #fff; width: 28px; height: 28px; border-radius: 50%; display: flex; align-items: center; justify-content: center; font-weight: 700; }
.section-title { font-size: 20px; font-weight: 600; color: var(--primary-navy); }
.traffic-lights { display: grid; grid-template-columns: repeat(4, 1fr); gap: 12px; margin: 20px 0; }
.traffic-light { border: 1px solid var(--border-light); border-radius: 8px; padding: 12px; text-align: center; }
.traffic-icon { font-size: 24px; }
.traffic-label { color: var(--text-secondary); font-size: 11px; }
.kpi-grid { display: grid; grid-template-columns: repeat(4, 1fr); gap: 12px; margin: 20px 0; }
.kpi-card { background: var(--surface-light); border-radius: 8px; padding: 16px; text-align: center; }
.kpi-label { color: var(--text-secondary); font-size: 11px; text-transform: uppercase; }
.kpi-value { font-size: 22px; font-weight: 700; color: var(--primary-navy); }
.kpi-unit { color: var(--text-secondary); font-size: 11px; }
.management-summary { border-left: 4px solid var(--accent-blue); background: var(--surface-light); padding: 16px; }
table { width: 100%; border-collapse: collapse; margin: 16px 0; }
th { text-align: left; background: var(--primary-navy); color: #fff; padding: 8px; font-weight: 600; }
td { border-bottom: 1px solid var(--border-light); padding: 8px; vertical-align: top; }
.status-good { color: var(--success-green); font-weight: 600; }
.status-warning { color: var(--warning-orange); font-weight: 600; }
.status-critical { color: var(--danger-red); font-weight: 600; }
.risk-card { border: 1px solid var(--border-light); border-left: 4px solid var(--danger-red); border-radius: 6px; padding: 12px 16px; margin-bottom: 12px; }
.risk-title { margin: 0 0 6px; font-size: 14px; }
.roi-value { text-align: right; font-weight: 600; white-space: nowrap; }
.roi-total td { font-weight: 700; border-top: 2px solid var(--primary-navy); }
.waterfall-title { font-weight: 600; margin-bottom: 8px; }
.waterfall-bar { display: grid; grid-template-columns: 180px 1fr 90px; align-items: center; gap: 8px; margin-bottom: 6px; }
.bar-visual { height: 14px; background: var(--accent-blue); border-radius: 3px; }
.bar-value { text-align: right; font-weight: 600; }
.rec-card { border: 1px solid var(--border-light); border-radius: 6px; padding: 12px 16px; margin-bottom: 12px; }
.rec-title { margin: 0 0 6px; font-size: 14px; }
.priority-badge { display: inline-block; font-size: 10px; font-weight: 700; padding: 2px 8px; border-radius: 10px; color: #fff; }
.priority-sofort { background: var(--danger-red); }
.priority-kurzfristig { background: var(--warning-orange); }
.priority-strategisch { background: var(--success-green); }
.cta-page { page-break-before: always; text-align: center; padding: 80px 60px; }
.cta-button { display: inline-block; background: var(--accent-blue); color: #fff; text-decoration: none; padding: 14px 32px; border-radius: 8px; font-weight: 600; }
.sources-page { page-break-before: always; }
.source-item { margin-bottom: 10px; }
.source-id { font-weight: 600; color: var(--accent-blue); }
"#;

/// Everything a report is built from.
#[derive(Debug)]
pub struct ReportInput<'a> {
    pub analysis_id: Uuid,
    pub company_name: &'a str,
    pub industry: Industry,
    pub crawl: &'a CrawlReport,
    pub insights: &'a Insights,
    pub generated_at: DateTime<Utc>,
}

/// Writes reports to the output directory.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    output_dir: PathBuf,
    pdf: Option<PdfRenderer>,
}

impl ReportGenerator {
    /// `pdf` is optional; without it reports stay HTML.
    pub fn new(output_dir: impl Into<PathBuf>, pdf: Option<PdfRenderer>) -> Self {
        Self {
            output_dir: output_dir.into(),
            pdf,
        }
    }

    /// Render the report and return the path of the file to serve.
    ///
    /// # Process
    ///
    /// 1. Write `chatpro_analyse_<id8>.html`
    /// 2. If PDF rendering is enabled, print it to `chatpro_analyse_<id8>.pdf`
    ///    and delete the HTML
    /// 3. If printing fails, keep and return the HTML
    ///
    /// # Errors
    ///
    /// Only failing to write the HTML is an error.
    pub async fn generate(&self, input: &ReportInput<'_>) -> Result<PathBuf, RenderError> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let stem = format!("chatpro_analyse_{}", short_id(input.analysis_id));
        let html_path = self.output_dir.join(format!("{}.html", stem));
        tokio::fs::write(&html_path, render_html(input)).await?;

        let Some(renderer) = &self.pdf else {
            return Ok(html_path);
        };

        let pdf_path = self.output_dir.join(format!("{}.pdf", stem));
        match renderer.render(&html_path, &pdf_path).await {
            Ok(()) => {
                if let Err(e) = tokio::fs::remove_file(&html_path).await {
                    tracing::warn!("Could not remove intermediate HTML {:?}: {}", html_path, e);
                }
                Ok(pdf_path)
            }
            Err(e) => {
                tracing::warn!("PDF conversion failed ({}), falling back to HTML", e);
                Ok(html_path)
            }
        }
    }
}

/// Render the full report document.
pub fn render_html(input: &ReportInput<'_>) -> String {
    let insights = input.insights;

    html! {
        (DOCTYPE)
        html lang="de" {
            head {
                meta charset="UTF-8";
                title { "Digitale Effizienz-Analyse - " (input.company_name) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                (cover(input))
                (executive_summary(insights))
                (website_section(input.crawl, &insights.website_check))
                (risk_section(insights))
                (roi_section(&insights.roi))
                (recommendation_section(insights))
                (call_to_action(input.company_name))
                (sources_section(insights))
            }
        }
    }
    .into_string()
}

fn cover(input: &ReportInput<'_>) -> Markup {
    let priority = input.insights.chatbot_analysis.priority;

    html! {
        div.cover-page {
            div {
                div.logo { "CHATPRO AI 🤖" }
                div.cover-title { "Digitale Effizienz-Analyse" }
                div.company-name { (input.company_name) }
                div.cover-meta {
                    div { strong { "Branche:" } br; (input.industry.label()) }
                    div { strong { "Analysedatum:" } br; (input.generated_at.format("%d.%m.%Y")) }
                    div { strong { "Referenz-ID:" } br; "CPA-" (short_id(input.analysis_id).to_uppercase()) }
                    div { strong { "Handlungspriorität:" } br; (priority.action_label()) }
                }
            }
            div.cover-footer {
                "Vertraulich - Erstellt von ChatPro AI Analytics"
                br;
                "© " (input.generated_at.format("%Y")) " FITCOACHAI LTD. - Alle Rechte vorbehalten"
            }
        }
    }
}

/// (icon, label, status) for the four traffic lights.
fn traffic_lights(insights: &Insights) -> [(&'static str, &'static str, &'static str); 4] {
    let check = &insights.website_check;
    let chatbot = &insights.chatbot_analysis;

    [
        if chatbot.exists {
            ("🟢", "Automatisierung", "GUT")
        } else {
            ("🔴", "Automatisierung", "KRITISCH")
        },
        if check.pages > 15 {
            ("🟡", "Skalierbarkeit", "OPTIMIERBAR")
        } else {
            ("🟢", "Skalierbarkeit", "GUT")
        },
        match chatbot.priority {
            ChatbotPriority::High => ("🔴", "Prozesseffizienz", "NIEDRIG"),
            ChatbotPriority::Medium => ("🟡", "Prozesseffizienz", "MITTEL"),
            ChatbotPriority::Low => ("🟢", "Prozesseffizienz", "HOCH"),
        },
        if check.language_count < 2 {
            ("🟡", "Wettbewerbsposition", "AUSBAUFÄHIG")
        } else {
            ("🟢", "Wettbewerbsposition", "STARK")
        },
    ]
}

fn priority_color(priority: ChatbotPriority) -> &'static str {
    match priority {
        ChatbotPriority::High => "var(--danger-red)",
        ChatbotPriority::Medium => "var(--warning-orange)",
        ChatbotPriority::Low => "var(--success-green)",
    }
}

fn priority_class(priority: ChatbotPriority) -> &'static str {
    match priority {
        ChatbotPriority::High => "priority-badge priority-sofort",
        ChatbotPriority::Medium => "priority-badge priority-kurzfristig",
        ChatbotPriority::Low => "priority-badge priority-strategisch",
    }
}

fn executive_summary(insights: &Insights) -> Markup {
    let summary = &insights.roi.summary;
    let priority = insights.chatbot_analysis.priority;

    html! {
        div.content-page {
            h1.page-title { "Executive Summary" }
            div.traffic-lights {
                @for (icon, label, status) in traffic_lights(insights) {
                    div.traffic-light {
                        div.traffic-icon { (icon) }
                        div.traffic-label { (label) }
                        div style="font-weight: 600;" { (status) }
                    }
                }
            }
            div.kpi-grid {
                div.kpi-card {
                    div.kpi-label { "Einsparpotenzial" }
                    div.kpi-value { (euros(summary.total_monthly)) }
                    div.kpi-unit { "pro Monat" }
                }
                div.kpi-card {
                    div.kpi-label { "ROI-Faktor" }
                    div.kpi-value { (format!("{:.1}x", summary.roi_multiplier)) }
                    div.kpi-unit { "Rendite-Multiplikator" }
                }
                div.kpi-card {
                    div.kpi-label { "Amortisation" }
                    div.kpi-value { (format!("{:.1}", summary.break_even_months)) }
                    div.kpi-unit { "Monate" }
                }
                div.kpi-card {
                    div.kpi-label { "Handlungsbedarf" }
                    div.kpi-value style=(format!("color: {}; font-size: 14px;", priority_color(priority))) {
                        (priority.action_label())
                    }
                    div.kpi-unit { "Prioritätsstufe" }
                }
            }
            div.management-summary {
                strong { "Management Summary: " }
                "Die Analyse zeigt erhebliches Optimierungspotenzial in der digitalen Kundeninteraktion. "
                "Durch strategische Automatisierung können monatlich " (euros(summary.total_monthly))
                " an Effizienzgewinnen realisiert werden. Die Amortisation erfolgt innerhalb von "
                (format!("{:.1}", summary.break_even_months)) " Monaten bei einem ROI-Faktor von "
                (format!("{:.1}x", summary.roi_multiplier)) "."
            }
        }
    }
}

fn website_section(crawl: &CrawlReport, check: &WebsiteCheck) -> Markup {
    let chatbot_type = crawl
        .chatbot
        .chatbot_type
        .as_deref()
        .unwrap_or("Keine Automatisierung");

    html! {
        div.content-page {
            div.section-header {
                div.section-number { "1" }
                div.section-title { "Technische Status-Quo Analyse" }
            }
            p {
                "Die detaillierte Analyse der bestehenden Webpräsenz "
                strong { (crawl.url) }
                " ergab folgende technische und strukturelle Charakteristika:"
            }
            table {
                thead {
                    tr { th { "Kriterium" } th { "Befund" } th { "Status" } th { "Geschäftsauswirkung" } }
                }
                tbody {
                    tr {
                        td { "Website-Erreichbarkeit" }
                        td { (check.title) " (" (check.response_time_ms) " ms)" }
                        td { (check.status) }
                        td { "Grundlage für digitale Kundengewinnung" }
                    }
                    tr {
                        td { "Umfang" }
                        td { (check.pages) " indexierte Seiten" }
                        @if check.pages > 20 {
                            td { span.status-warning { "⚠️ Hoch" } }
                            td { "Hoher Support-Bedarf durch Komplexität" }
                        } @else {
                            td { span.status-good { "✅ Standard" } }
                            td { "Überschaubare Struktur" }
                        }
                    }
                    tr {
                        td { "Mobile Optimierung" }
                        td { @if check.mobile_responsive { "Viewport definiert" } @else { "Kein Viewport" } }
                        @if check.mobile_responsive {
                            td { span.status-good { "✅ Optimiert" } }
                            td { "Nutzerfreundliche mobile Experience" }
                        } @else {
                            td { span.status-critical { "❌ Nicht optimiert" } }
                            td { "Potenzielle Abbrüche bei mobilen Nutzern" }
                        }
                    }
                    tr {
                        td { "Kundenservice-Automatisierung" }
                        td { (chatbot_type) }
                        @if crawl.has_chatbot() {
                            td { span.status-good { "✅ Vorhanden" } }
                            td { "Teilautomatisierte Kundenbetreuung" }
                        } @else {
                            td { span.status-critical { "❌ Nicht vorhanden" } }
                            td { "Manuelle Bearbeitung aller Anfragen erforderlich" }
                        }
                    }
                    tr {
                        td { "Mehrsprachigkeit" }
                        td { (check.language_count) " Sprache(n) erkannt: " (check.languages.join(", ")) }
                        @if check.language_count < 2 {
                            td { span.status-warning { "⚠️ Monolingual" } }
                            td { "Begrenzte Zielgruppenreichweite" }
                        } @else {
                            td { span.status-good { "✅ Multilingual" } }
                            td { "Internationale Markterschließung möglich" }
                        }
                    }
                    tr {
                        td { "Lead-Erfassung" }
                        td { (check.lead_forms_count) " Formular(e)" }
                        @if check.has_contact_info {
                            td { span.status-good { "✅ Kontakt sichtbar" } }
                        } @else {
                            td { span.status-warning { "⚠️ Kein Kontakt" } }
                        }
                        td { "Erreichbarkeit für Interessenten" }
                    }
                }
            }
        }
    }
}

fn risk_section(insights: &Insights) -> Markup {
    let chatbot = &insights.chatbot_analysis;

    html! {
        div.content-page {
            div.section-header {
                div.section-number { "2" }
                div.section-title { "Identifizierte Ineffizienzen & Geschäftsrisiken" }
            }
            p { strong { "Chatbot-Analyse: " } (chatbot.status) }
            @if !chatbot.issues.is_empty() {
                ul {
                    @for issue in &chatbot.issues {
                        li { (issue) }
                    }
                }
            }
            @if insights.pain_points.is_empty() {
                p { "Es wurden keine kritischen Schwachstellen identifiziert." }
            }
            @for point in &insights.pain_points {
                div.risk-card {
                    h4.risk-title { (point.issue) }
                    div { strong { "Auswirkung: " } (point.impact) }
                    div {
                        strong { "Daten-Evidenz: " } (point.cost)
                        @if !point.source_ids.is_empty() {
                            " [" (point.source_ids.join(", ")) "]"
                        }
                    }
                }
            }
        }
    }
}

fn roi_section(roi: &RoiCalculation) -> Markup {
    let summary = &roi.summary;
    let max_value = roi
        .line_items
        .iter()
        .map(|item| item.monthly_value)
        .max()
        .unwrap_or(0)
        .max(1);

    html! {
        div.content-page {
            div.section-header {
                div.section-number { "3" }
                div.section-title { "Wirtschaftlichkeitsberechnung" }
            }
            p {
                strong { "Annahmen: " }
                @for (i, assumption) in roi.assumptions.iter().enumerate() {
                    @if i > 0 { "; " }
                    (assumption.label) ": " (assumption.value)
                    @if !assumption.source_ids.is_empty() {
                        " [" (assumption.source_ids.join(", ")) "]"
                    }
                }
            }
            table {
                thead {
                    tr { th { "Hebel" } th { "Berechnung" } th style="text-align: right;" { "€/Monat" } }
                }
                tbody {
                    @for item in &roi.line_items {
                        tr {
                            td { (item.category) }
                            td {
                                (item.calculation)
                                @if !item.source_ids.is_empty() {
                                    " [" (item.source_ids.join(", ")) "]"
                                }
                            }
                            td.roi-value { (euros(item.monthly_value)) }
                        }
                    }
                    tr.roi-total {
                        td { "Gesamtpotenzial" }
                        td { "abzüglich " (euros(summary.monthly_cost)) " ChatPro AI: " (euros(summary.net_monthly)) " netto" }
                        td.roi-value { (euros(summary.total_monthly)) }
                    }
                }
            }
            div.waterfall-container {
                div.waterfall-title { "Aufschlüsselung der monatlichen Einsparungen" }
                @for item in &roi.line_items {
                    div.waterfall-bar {
                        div.bar-label { (item.category) }
                        div.bar-visual style=(format!("width: {}%;", item.monthly_value * 100 / max_value)) {}
                        div.bar-value { (euros(item.monthly_value)) }
                    }
                }
            }
            p {
                "Jahrespotenzial: " strong { (euros(summary.yearly)) }
                ". Einmalige Einrichtung: " (euros(summary.setup_cost)) "."
            }
        }
    }
}

fn recommendation_section(insights: &Insights) -> Markup {
    html! {
        div.content-page {
            div.section-header {
                div.section-number { "4" }
                div.section-title { "Handlungsempfehlungen" }
            }
            @for rec in &insights.recommendations {
                div.rec-card {
                    span class=(priority_class(rec.priority)) { (rec.priority.action_label()) }
                    h4.rec-title { (rec.title) }
                    div { (rec.description) }
                }
            }
        }
    }
}

fn call_to_action(company_name: &str) -> Markup {
    html! {
        div.cta-page {
            h1.page-title { "Nächster Schritt" }
            p {
                "Sehen Sie in einer kostenlosen 30-Minuten-Demo, wie ChatPro AI für "
                strong { (company_name) }
                " rund um die Uhr Anfragen beantwortet."
            }
            a.cta-button href=(DEMO_URL) { "📅 Kostenlose Demo buchen" }
        }
    }
}

fn sources_section(insights: &Insights) -> Markup {
    html! {
        div.content-page.sources-page {
            h1.page-title { "Quellenverzeichnis" }
            @for source in &insights.sources {
                div.source-item {
                    span.source-id { "[" (source.id) "] " }
                    (source.title)
                    br;
                    a href=(source.url) { (source.url) }
                    br;
                    em { (source.note) }
                }
            }
        }
    }
}
