//! Rule-based website analysis and ROI estimation.
//!
//! Turns a [`CrawlReport`] into the figures and findings shown in the report:
//! website check, chatbot analysis, pain points, industry ROI, recommendations
//! and the sources they cite.
//!
//! # ROI Models
//!
//! - **Hotel**: commission saved on direct bookings, extra bookings through
//!   24/7 availability, staff time saved, upselling
//! - **Everything else**: staff time saved plus additional leads
//!
//! All money is integral euros per month. Percentages are applied with
//! integer arithmetic so the published numbers are exact.

use crate::models::{
    analysis::{Industry, round1},
    crawl::{ChatbotPriority, CrawlReport},
    insights::{
        Assumption, ChatbotAnalysis, Insights, PainPoint, Recommendation, RoiCalculation,
        RoiLineItem, RoiSummary, WebsiteCheck,
    },
};
use crate::services::sources;

/// ChatPro AI subscription per month.
pub const MONTHLY_COST: i64 = 799;
/// One-off setup fee.
pub const SETUP_COST: i64 = 4999;

const HOURLY_WAGE: i64 = 25;
const DAYS_PER_MONTH: i64 = 30;

/// Analyse a crawled website for the given industry.
pub fn analyze(crawl: &CrawlReport, industry: Industry) -> Insights {
    Insights {
        website_check: website_check(crawl),
        chatbot_analysis: chatbot_analysis(crawl),
        pain_points: pain_points(crawl, industry),
        roi: roi(industry),
        recommendations: recommendations(crawl, industry),
        sources: sources::sources_for_industry(industry),
    }
}

fn website_check(crawl: &CrawlReport) -> WebsiteCheck {
    WebsiteCheck {
        status: if crawl.status_code == 200 {
            "✅ Online".to_string()
        } else {
            "❌ Problem".to_string()
        },
        title: crawl.title.clone(),
        pages: crawl.pages_count,
        languages: crawl.languages.clone(),
        language_count: crawl.languages.len(),
        mobile_responsive: crawl.mobile_responsive,
        response_time_ms: crawl.response_time_ms,
        has_contact_info: !crawl.contact_info.emails.is_empty(),
        lead_forms_count: crawl.lead_forms.len(),
    }
}

fn chatbot_analysis(crawl: &CrawlReport) -> ChatbotAnalysis {
    let detection = &crawl.chatbot;

    if !detection.detected {
        return ChatbotAnalysis {
            exists: false,
            chatbot_type: None,
            status: "❌ Kein Chatbot gefunden".to_string(),
            has_lead_form: false,
            issues: vec![
                "Keine 24/7-Verfügbarkeit".to_string(),
                "Potenzielle Leads gehen verloren außerhalb Geschäftszeiten".to_string(),
            ],
            priority: detection.priority,
        };
    }

    let vendor = detection.chatbot_type.as_deref().unwrap_or("unknown");

    let mut issues = Vec::new();
    if detection.has_lead_form {
        issues.push("Lead-Formular VOR Chat → 40-60% Drop-off [7]".to_string());
    }
    if vendor == "zendesk" {
        issues.push("Zendesk: E-Mail + Name erforderlich vor Konversation".to_string());
    }

    ChatbotAnalysis {
        exists: true,
        chatbot_type: Some(capitalize(vendor)),
        status: if issues.is_empty() {
            "✅ Chatbot gefunden".to_string()
        } else {
            "⚠️ Chatbot gefunden (mit Schwachstellen)".to_string()
        },
        has_lead_form: detection.has_lead_form,
        issues,
        priority: detection.priority,
    }
}

fn pain_points(crawl: &CrawlReport, industry: Industry) -> Vec<PainPoint> {
    let mut points = Vec::new();

    if !crawl.has_chatbot() {
        points.push(PainPoint {
            issue: "Keine 24/7-Verfügbarkeit".to_string(),
            impact: "Anfragen außerhalb Geschäftszeiten gehen verloren".to_string(),
            cost: "30-40% potenzielle Kunden verloren".to_string(),
            source_ids: Vec::new(),
        });
    }

    if crawl.chatbot.has_lead_form {
        points.push(PainPoint {
            issue: "Lead-Formular vor Chat".to_string(),
            impact: "40-60% der Interessenten brechen ab".to_string(),
            cost: "Hohe Lead-Verluste".to_string(),
            source_ids: vec!["7".to_string()],
        });
    }

    let languages = &crawl.languages;
    if languages.len() < 3 {
        points.push(PainPoint {
            issue: format!(
                "Nur {} Sprache(n): {}",
                languages.len(),
                languages.join(", ")
            ),
            impact: "Internationale Gäste können nicht betreut werden".to_string(),
            cost: "Verlust internationaler Buchungen".to_string(),
            source_ids: Vec::new(),
        });
    }

    if industry == Industry::Hotel && !crawl.has_chatbot() {
        points.push(PainPoint {
            issue: "Keine Booking.com-Direktbuchungs-Strategie".to_string(),
            impact: "15% Provision an Booking.com".to_string(),
            cost: "€1.500-3.000/Monat bei 50 Zimmern".to_string(),
            source_ids: vec!["2".to_string()],
        });
    }

    points
}

/// Industry-specific ROI estimate.
pub fn roi(industry: Industry) -> RoiCalculation {
    match industry {
        Industry::Hotel => hotel_roi(),
        _ => generic_roi(),
    }
}

fn hotel_roi() -> RoiCalculation {
    const ROOMS: i64 = 50;
    const OCCUPANCY_PCT: i64 = 70;
    const PRICE_PER_NIGHT: i64 = 120;
    const COMMISSION_PCT: i64 = 15;
    const DIRECT_BOOKING_GAIN_PCT: i64 = 10;
    const AVAILABILITY_GAIN_PCT: i64 = 10;
    const HOURS_SAVED: i64 = 40;
    const UPSELL_RATE_PCT: i64 = 20;
    const UPSELL_VALUE: i64 = 40;

    let nights = ROOMS * OCCUPANCY_PCT * DAYS_PER_MONTH / 100;
    let revenue = nights * PRICE_PER_NIGHT;

    let shifted_to_direct = revenue * DIRECT_BOOKING_GAIN_PCT / 100;
    let saved_commission = shifted_to_direct * COMMISSION_PCT / 100;

    let extra_bookings = revenue * AVAILABILITY_GAIN_PCT / 100;
    let extra_bookings_value = extra_bookings * COMMISSION_PCT / 100;

    let time_saving = HOURS_SAVED * HOURLY_WAGE;
    let upselling = nights * UPSELL_RATE_PCT / 100 * UPSELL_VALUE;

    let line_items = vec![
        RoiLineItem {
            category: "Direktbuchungen statt OTA-Provision".to_string(),
            calculation: format!(
                "{} Umsatz × {}% Direktbuchungen × {}% Provision",
                euros(revenue),
                DIRECT_BOOKING_GAIN_PCT,
                COMMISSION_PCT
            ),
            monthly_value: saved_commission,
            source_ids: ids(&["2", "9"]),
        },
        RoiLineItem {
            category: "Mehr Buchungen durch 24/7-Erreichbarkeit".to_string(),
            calculation: format!(
                "{} Umsatz × {}% Mehrbuchungen × {}% Marge",
                euros(revenue),
                AVAILABILITY_GAIN_PCT,
                COMMISSION_PCT
            ),
            monthly_value: extra_bookings_value,
            source_ids: ids(&["9"]),
        },
        RoiLineItem {
            category: "Zeitersparnis Rezeption".to_string(),
            calculation: format!(
                "{} h/Monat × {}/h",
                HOURS_SAVED,
                euros(HOURLY_WAGE)
            ),
            monthly_value: time_saving,
            source_ids: ids(&["1"]),
        },
        RoiLineItem {
            category: "Upselling (Frühstück, Late Check-out)".to_string(),
            calculation: format!(
                "{} Nächte × {}% × {}",
                thousands(nights),
                UPSELL_RATE_PCT,
                euros(UPSELL_VALUE)
            ),
            monthly_value: upselling,
            source_ids: ids(&["3"]),
        },
    ];

    let assumptions = vec![
        assumption("Zimmer", ROOMS.to_string(), &[]),
        assumption("Auslastung", format!("{}%", OCCUPANCY_PCT), &["4"]),
        assumption("Preis pro Nacht", euros(PRICE_PER_NIGHT), &["4"]),
        assumption("Booking.com-Provision", format!("{}%", COMMISSION_PCT), &["2"]),
        assumption("Stundenlohn", euros(HOURLY_WAGE), &["1"]),
    ];

    finish(assumptions, line_items)
}

fn generic_roi() -> RoiCalculation {
    const HOURS_SAVED: i64 = 30;
    const MONTHLY_INQUIRIES: i64 = 100;
    const LEAD_GAIN_PCT: i64 = 20;
    const VALUE_PER_LEAD: i64 = 50;

    let time_saving = HOURS_SAVED * HOURLY_WAGE;
    let extra_leads = MONTHLY_INQUIRIES * LEAD_GAIN_PCT / 100;
    let lead_revenue = extra_leads * VALUE_PER_LEAD;

    let line_items = vec![
        RoiLineItem {
            category: "Zeitersparnis Kundenservice".to_string(),
            calculation: format!(
                "{} h/Monat × {}/h",
                HOURS_SAVED,
                euros(HOURLY_WAGE)
            ),
            monthly_value: time_saving,
            source_ids: ids(&["1"]),
        },
        RoiLineItem {
            category: "Zusätzliche Leads durch 24/7".to_string(),
            calculation: format!(
                "{} Anfragen × {}% × {} pro Lead",
                MONTHLY_INQUIRIES,
                LEAD_GAIN_PCT,
                euros(VALUE_PER_LEAD)
            ),
            monthly_value: lead_revenue,
            source_ids: ids(&["3"]),
        },
    ];

    let assumptions = vec![
        assumption("Gesparte Stunden/Monat", HOURS_SAVED.to_string(), &["1"]),
        assumption("Anfragen/Monat", MONTHLY_INQUIRIES.to_string(), &[]),
        assumption("Lead-Steigerung", format!("{}%", LEAD_GAIN_PCT), &["3"]),
    ];

    finish(assumptions, line_items)
}

fn finish(assumptions: Vec<Assumption>, line_items: Vec<RoiLineItem>) -> RoiCalculation {
    let total: i64 = line_items.iter().map(|item| item.monthly_value).sum();

    let break_even_months = if total > 0 {
        round1(SETUP_COST as f64 / total as f64)
    } else {
        0.0
    };

    RoiCalculation {
        assumptions,
        line_items,
        summary: RoiSummary {
            total_monthly: total,
            monthly_cost: MONTHLY_COST,
            setup_cost: SETUP_COST,
            net_monthly: total - MONTHLY_COST,
            roi_multiplier: round1(total as f64 / MONTHLY_COST as f64),
            break_even_months,
            yearly: total * 12,
        },
    }
}

fn recommendations(crawl: &CrawlReport, industry: Industry) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    if !crawl.has_chatbot() {
        recs.push(recommendation(
            "ChatPro AI 24/7-Chatbot implementieren",
            "Anfragen rund um die Uhr beantworten, qualifizieren und ins CRM übertragen.",
            ChatbotPriority::High,
        ));
    }

    if crawl.languages.len() < 3 {
        recs.push(recommendation(
            "50+ Sprachen aktivieren für internationale Gäste",
            "Der Chatbot antwortet automatisch in der Sprache des Besuchers.",
            ChatbotPriority::Medium,
        ));
    }

    if industry == Industry::Hotel {
        recs.push(recommendation(
            "Booking.com-Integration (Phase 1-3)",
            "Direktbuchungen fördern und OTA-Provisionen schrittweise senken.",
            ChatbotPriority::High,
        ));
        recs.push(recommendation(
            "PMS-Integration für Pre-Arrival-Automation",
            "Check-in-Informationen und Upselling-Angebote vor der Anreise versenden.",
            ChatbotPriority::Medium,
        ));
    }

    recs.push(recommendation(
        "Dedicated Account Manager für monatliche Strategie-Calls",
        "Laufende Optimierung von Antworten, Conversion und Reporting.",
        ChatbotPriority::Low,
    ));

    recs
}

fn recommendation(title: &str, description: &str, priority: ChatbotPriority) -> Recommendation {
    Recommendation {
        title: title.to_string(),
        description: description.to_string(),
        priority,
    }
}

fn assumption(label: &str, value: String, source_ids: &[&str]) -> Assumption {
    Assumption {
        label: label.to_string(),
        value,
        source_ids: ids(source_ids),
    }
}

fn ids(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// German thousands grouping: `13180` -> `13.180`.
pub fn thousands(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// `13180` -> `€13.180`.
pub fn euros(amount: i64) -> String {
    if amount < 0 {
        format!("-€{}", thousands(-amount))
    } else {
        format!("€{}", thousands(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::crawl::{ChatbotDetection, ContactInfo};

    fn crawl(chatbot: ChatbotDetection, languages: &[&str]) -> CrawlReport {
        CrawlReport {
            url: "https://adoro-aparthotel.com".into(),
            final_url: "https://adoro-aparthotel.com/".into(),
            status_code: 200,
            title: "ADORO Aparthotel".into(),
            meta_description: String::new(),
            languages: languages.iter().map(|l| l.to_string()).collect(),
            chatbot,
            lead_forms: Vec::new(),
            pages_count: 21,
            mobile_responsive: true,
            contact_info: ContactInfo {
                emails: vec!["contact@adoro-aparthotel.com".into()],
                phones: vec!["+49 7223 3009640".into()],
            },
            response_time_ms: 465,
        }
    }

    fn gated_zendesk() -> ChatbotDetection {
        ChatbotDetection {
            detected: true,
            chatbot_type: Some("zendesk".into()),
            signature_found: Some("zdassets.com".into()),
            has_lead_form: true,
            priority: ChatbotPriority::High,
        }
    }

    #[test]
    fn hotel_roi_matches_published_figures() {
        let summary = roi(Industry::Hotel).summary;

        assert_eq!(summary.total_monthly, 13180);
        assert_eq!(summary.net_monthly, 12381);
        assert_eq!(summary.roi_multiplier, 16.5);
        assert_eq!(summary.break_even_months, 0.4);
        assert_eq!(summary.yearly, 158160);
    }

    #[test]
    fn hotel_line_items() {
        let values: Vec<i64> = roi(Industry::Hotel)
            .line_items
            .iter()
            .map(|item| item.monthly_value)
            .collect();
        assert_eq!(values, vec![1890, 1890, 1000, 8400]);
    }

    #[test]
    fn other_industries_use_generic_model() {
        for industry in [Industry::Fitness, Industry::Salon, Industry::Other] {
            let summary = roi(industry).summary;
            assert_eq!(summary.total_monthly, 1750);
            assert_eq!(summary.roi_multiplier, 2.2);
            assert_eq!(summary.break_even_months, 2.9);
        }
    }

    #[test]
    fn gated_chatbot_analysis() {
        let insights = analyze(&crawl(gated_zendesk(), &["de", "en"]), Industry::Hotel);

        let chatbot = &insights.chatbot_analysis;
        assert!(chatbot.exists);
        assert_eq!(chatbot.chatbot_type.as_deref(), Some("Zendesk"));
        assert_eq!(chatbot.issues.len(), 2);
        assert_eq!(chatbot.status, "⚠️ Chatbot gefunden (mit Schwachstellen)");
        assert_eq!(chatbot.priority, ChatbotPriority::High);

        let issues: Vec<&str> = insights.pain_points.iter().map(|p| p.issue.as_str()).collect();
        assert_eq!(
            issues,
            vec!["Lead-Formular vor Chat", "Nur 2 Sprache(n): de, en"]
        );
    }

    #[test]
    fn hotel_without_chatbot() {
        let insights = analyze(&crawl(ChatbotDetection::none(), &["de"]), Industry::Hotel);

        assert!(!insights.chatbot_analysis.exists);
        assert_eq!(insights.pain_points.len(), 3);
        assert_eq!(
            insights.pain_points.last().unwrap().issue,
            "Keine Booking.com-Direktbuchungs-Strategie"
        );

        let titles: Vec<&str> = insights
            .recommendations
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(titles.len(), 5);
        assert_eq!(titles[0], "ChatPro AI 24/7-Chatbot implementieren");
        assert_eq!(
            titles[4],
            "Dedicated Account Manager für monatliche Strategie-Calls"
        );
    }

    #[test]
    fn multilingual_site_with_modern_chatbot() {
        let chatbot = ChatbotDetection {
            detected: true,
            chatbot_type: Some("intercom".into()),
            signature_found: Some("intercom.io".into()),
            has_lead_form: false,
            priority: ChatbotPriority::Low,
        };
        let insights = analyze(&crawl(chatbot, &["de", "en", "fr"]), Industry::Salon);

        assert!(insights.pain_points.is_empty());
        assert_eq!(insights.chatbot_analysis.status, "✅ Chatbot gefunden");
        assert_eq!(insights.recommendations.len(), 1);
        assert_eq!(insights.website_check.language_count, 3);
        assert!(insights.website_check.has_contact_info);
    }

    #[test]
    fn cited_sources_exist_for_industry() {
        let insights = analyze(&crawl(gated_zendesk(), &["de"]), Industry::Hotel);
        let available: Vec<&str> = insights.sources.iter().map(|s| s.id.as_str()).collect();

        for item in &insights.roi.line_items {
            for id in &item.source_ids {
                assert!(available.contains(&id.as_str()), "missing source {id}");
            }
        }
    }

    #[test]
    fn german_number_formatting() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(13180), "13.180");
        assert_eq!(thousands(1234567), "1.234.567");
        assert_eq!(euros(-799), "-€799");
    }
}
