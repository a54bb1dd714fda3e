//! Catalogue of verified sources cited in ROI calculations and reports.

use crate::models::{analysis::Industry, insights::Source};

struct Entry {
    id: &'static str,
    title: &'static str,
    url: &'static str,
    figures: &'static [(&'static str, &'static str)],
    note: &'static str,
}

const CATALOGUE: &[Entry] = &[
    Entry {
        id: "1",
        title: "Destatis - Arbeitskosten Deutschland 2024",
        url: "https://www.destatis.de/DE/Themen/Arbeit/Arbeitskosten-Lohnnebenkosten/_inhalt.html",
        figures: &[
            ("average_labor_cost_per_hour", "43.40"),
            ("gastronomy_labor_cost", "25.00"),
            ("hotel_labor_cost", "28.50"),
        ],
        note: "Durchschnittliche Arbeitskosten pro Stunde inkl. Lohnnebenkosten",
    },
    Entry {
        id: "2",
        title: "Booking.com Kommission - Fewolino Studie 2024",
        url: "https://fewolino.com/wie-viel-kommission-nimmt-booking/",
        figures: &[
            ("commission_rate_min", "12"),
            ("commission_rate_max", "15"),
            ("commission_average", "13.5"),
        ],
        note: "Booking.com verlangt 12-15% Kommission pro Buchung",
    },
    Entry {
        id: "3",
        title: "Chatbot Lead-Steigerung - Innovation Visual Case Study",
        url: "https://www.innovationvisual.com/case-studies/tag/hubspot",
        figures: &[("qualified_leads_increase", "76")],
        note: "76% Steigerung qualifizierter Leads durch Chatbot-Implementation",
    },
    Entry {
        id: "4",
        title: "Hotel Occupancy Rate 2025 - Prostay Market Insights",
        url: "https://www.prostay.com/blog/hotel-booking-statistics-2025-market-insights-and-trends/",
        figures: &[
            ("global_occupancy_rate", "72"),
            ("average_booking_value_europe", "120"),
        ],
        note: "Durchschnittliche globale Auslastung 72% (2025)",
    },
    Entry {
        id: "5",
        title: "DEHOGA Branchenreport Gastronomie 2024",
        url: "https://www.dehoga-bundesverband.de/",
        figures: &[
            ("average_inquiries_per_day_restaurant", "35"),
            ("time_per_inquiry_minutes", "5"),
            ("reservation_conversion_rate", "45"),
        ],
        note: "Durchschnittlich 35 Anfragen/Tag in Restaurants",
    },
    Entry {
        id: "6",
        title: "McKinsey AI ROI Study 2025",
        url: "https://www.mckinsey.com/capabilities/quantumblack/our-insights/the-state-of-ai",
        figures: &[
            ("average_ai_roi_multiplier", "3.3"),
            ("payback_period_months", "6"),
            ("efficiency_gain_percent", "200"),
        ],
        note: "333% ROI durchschnittlich bei AI-Implementierungen",
    },
    Entry {
        id: "7",
        title: "Chatbot Drop-off Rate - Intercom Research 2024",
        url: "https://www.intercom.com/blog/chatbot-statistics/",
        figures: &[
            ("legacy_chatbot_dropoff_rate", "50"),
            ("modern_ai_chatbot_dropoff_rate", "15"),
        ],
        note: "Legacy Chatbots haben 40-60% Drop-off Rate",
    },
    Entry {
        id: "8",
        title: "E-Commerce Customer Support Costs - Zendesk Benchmark",
        url: "https://www.zendesk.com/blog/customer-service-costs/",
        figures: &[
            ("cost_per_support_ticket", "15"),
            ("average_tickets_per_month", "500"),
            ("chatbot_ticket_reduction", "65"),
        ],
        note: "AI-Chatbots reduzieren Support-Tickets um 65%",
    },
    Entry {
        id: "9",
        title: "Hotel Direct Booking vs OTA - Triptease Study 2024",
        url: "https://www.triptease.com/",
        figures: &[
            ("direct_booking_increase_with_chatbot", "23"),
            ("average_ota_commission_saved_per_booking", "18"),
        ],
        note: "23% mehr Direktbuchungen durch Chatbot-Assistenz",
    },
    Entry {
        id: "10",
        title: "Fitness Studio Lead Conversion - ClassPass Industry Report",
        url: "https://classpass.com/",
        figures: &[
            ("trial_conversion_rate_without_chatbot", "12"),
            ("trial_conversion_rate_with_chatbot", "28"),
            ("average_membership_value_monthly", "89"),
        ],
        note: "Chatbots steigern Probetraining-Conversion um 133%",
    },
    Entry {
        id: "11",
        title: "Real Estate Lead Response Time - Harvard Business Review",
        url: "https://hbr.org/2011/03/the-short-life-of-online-sales-leads",
        figures: &[
            ("lead_value_loss_after_5_minutes", "80"),
            ("optimal_response_time_seconds", "60"),
            ("chatbot_instant_response_conversion_lift", "391"),
        ],
        note: "Leads verlieren 80% Wert nach 5 Min ohne Antwort",
    },
    Entry {
        id: "12",
        title: "Salon Appointment No-Show Rate - Schedulicity Report",
        url: "https://www.schedulicity.com/",
        figures: &[
            ("average_no_show_rate", "15"),
            ("chatbot_reminder_no_show_reduction", "45"),
            ("average_appointment_value", "75"),
        ],
        note: "Automatische Erinnerungen reduzieren No-Shows um 45%",
    },
    Entry {
        id: "13",
        title: "B2B Lead Qualification - Salesforce State of Marketing 2025",
        url: "https://www.salesforce.com/resources/research-reports/state-of-marketing/",
        figures: &[
            ("manual_lead_qualification_hours_per_week", "12"),
            ("ai_lead_qualification_accuracy", "87"),
            ("sales_time_saved_percent", "40"),
        ],
        note: "AI-Chatbots qualifizieren Leads 87% genau, sparen 40% Zeit",
    },
];

impl Entry {
    fn to_source(&self) -> Source {
        Source {
            id: self.id.to_string(),
            title: self.title.to_string(),
            url: self.url.to_string(),
            figures: self
                .figures
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            note: self.note.to_string(),
        }
    }
}

/// Look up a source by catalogue id.
pub fn source(id: &str) -> Option<Source> {
    CATALOGUE.iter().find(|e| e.id == id).map(Entry::to_source)
}

/// Sources relevant for an industry, in citation order.
pub fn sources_for_industry(industry: Industry) -> Vec<Source> {
    let ids: &[&str] = match industry {
        Industry::Hotel => &["1", "2", "3", "4", "7", "9"],
        Industry::Restaurant => &["1", "3", "5", "7"],
        Industry::Fitness => &["1", "3", "7", "10"],
        Industry::Salon => &["1", "3", "7", "12"],
        Industry::Immobilien => &["1", "3", "7", "11"],
        _ => &["1", "3", "6", "7"],
    };

    ids.iter().filter_map(|id| source(id)).collect()
}
