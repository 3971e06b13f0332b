//! Derives normalized business signals from one [`EnrichmentRecord`].
//!
//! Every function here is total: missing or oddly-shaped input degrades to a
//! documented default instead of an error, so the assembled profile is always
//! fully populated.

use crate::models::{DecisionMaker, EnrichmentRecord};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;

pub const DEFAULT_KEY_PRODUCT: &str = "Business Services";
pub const PLACEHOLDER_DECISION_MAKER: &str = "Business Owner";
pub const PLACEHOLDER_ROLE: &str = "Decision Maker";

const MAX_SERVICE_ENTRIES: usize = 5;
const MAX_KEYWORD_ENTRIES: usize = 3;
const MIN_SERVICE_LEN: usize = 4;

/// Fixed pain points and goals for one industry.
#[derive(Debug)]
pub struct IndustryProfile {
    pub name: &'static str,
    /// Matched case-insensitively as substrings of `lead_industry`.
    pub keywords: &'static [&'static str],
    pub pain_points: &'static [&'static str],
    pub goals: &'static [&'static str],
}

/// Checked in order; first keyword hit wins.
pub const INDUSTRY_PROFILES: &[IndustryProfile] = &[IndustryProfile {
    name: "dental",
    keywords: &["dental", "dentist"],
    pain_points: &[
        "Missed appointments and last-minute cancellations",
        "Time-consuming insurance verification and billing",
        "Manual patient intake and paperwork",
        "Inconsistent patient follow-up and recall",
    ],
    goals: &[
        "Increase new patient bookings",
        "Reduce appointment no-shows",
        "Improve patient retention and recall rates",
        "Streamline front-office operations",
    ],
}];

pub const DEFAULT_INDUSTRY_PROFILE: IndustryProfile = IndustryProfile {
    name: "general",
    keywords: &[],
    pain_points: &[
        "Manual, repetitive administrative work",
        "Slow response times to customer inquiries",
        "Difficulty scaling operations efficiently",
        "Limited insight from business data",
    ],
    goals: &[
        "Grow revenue and customer base",
        "Improve operational efficiency",
        "Enhance customer experience",
        "Adopt AI and automation to stay competitive",
    ],
};

/// Picks the industry profile for a free-text industry label.
pub fn industry_profile(industry: Option<&str>) -> &'static IndustryProfile {
    let Some(industry) = industry.map(str::to_lowercase) else {
        return &DEFAULT_INDUSTRY_PROFILE;
    };

    INDUSTRY_PROFILES
        .iter()
        .find(|profile| profile.keywords.iter().any(|kw| industry.contains(kw)))
        .unwrap_or(&DEFAULT_INDUSTRY_PROFILE)
}

/// Key products/services, never empty.
///
/// Sources in priority order: the `services` summary (one entry per line),
/// the first few `top_keywords`, then a generic placeholder.
pub fn extract_key_products(record: &EnrichmentRecord) -> Vec<String> {
    let from_services: Vec<String> = record
        .content_summaries
        .as_ref()
        .and_then(|summaries| summaries.get("services"))
        .and_then(Value::as_str)
        .map(|services| {
            services
                .lines()
                .map(str::trim)
                .filter(|line| line.chars().count() >= MIN_SERVICE_LEN)
                .take(MAX_SERVICE_ENTRIES)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    if !from_services.is_empty() {
        return from_services;
    }

    let from_keywords: Vec<String> = record
        .keyword_signals
        .as_ref()
        .and_then(|signals| signals.get("top_keywords"))
        .and_then(Value::as_array)
        .map(|keywords| {
            keywords
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|kw| !kw.is_empty())
                .take(MAX_KEYWORD_ENTRIES)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    if !from_keywords.is_empty() {
        return from_keywords;
    }

    vec![DEFAULT_KEY_PRODUCT.to_string()]
}

pub fn extract_pain_points(record: &EnrichmentRecord) -> Vec<String> {
    industry_profile(record.lead_industry.as_deref())
        .pain_points
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn extract_goals(record: &EnrichmentRecord) -> Vec<String> {
    industry_profile(record.lead_industry.as_deref())
        .goals
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Lead contact first, then a distinct Apollo contact; never empty.
pub fn extract_decision_makers(record: &EnrichmentRecord) -> Vec<DecisionMaker> {
    let mut makers = Vec::new();

    let lead_name = non_blank(record.lead_name.as_deref());
    if let (Some(name), Some(title)) = (lead_name, non_blank(record.lead_title.as_deref())) {
        makers.push(DecisionMaker::new(name, title));
    }

    let apollo = record
        .metadata_insights
        .as_ref()
        .and_then(|insights| insights.get("apollo_contact"));
    if let Some(contact) = apollo {
        let name = non_blank(contact.get("name").and_then(Value::as_str));
        if let Some(name) = name.filter(|n| Some(*n) != lead_name) {
            let role = non_blank(contact.get("title").and_then(Value::as_str))
                .unwrap_or(PLACEHOLDER_ROLE);
            makers.push(DecisionMaker::new(name, role));
        }
    }

    if makers.is_empty() {
        makers.push(DecisionMaker::new(
            PLACEHOLDER_DECISION_MAKER,
            PLACEHOLDER_ROLE,
        ));
    }

    makers
}

/// Platform -> URL. Always has `website`; `twitter` is a guess from the domain.
pub fn extract_social_media(record: &EnrichmentRecord) -> BTreeMap<String, String> {
    let mut social = BTreeMap::new();
    social.insert("website".to_string(), website_for(&record.domain));

    let linkedin = record
        .metadata_insights
        .as_ref()
        .and_then(find_linkedin_url)
        .or_else(|| record.online_presence.as_ref().and_then(find_linkedin_url));
    if let Some(url) = linkedin {
        social.insert("linkedin".to_string(), url);
    }

    // Unverified: the handle is derived from the domain, not looked up.
    if let Some(handle) = record.domain.split('.').next().filter(|l| !l.is_empty()) {
        social.insert(
            "twitter".to_string(),
            format!("https://twitter.com/{}", handle),
        );
    }

    social
}

pub fn website_for(domain: &str) -> String {
    format!("https://{}", domain.trim())
}

fn linkedin_regex() -> &'static Regex {
    static LINKEDIN: OnceLock<Regex> = OnceLock::new();
    LINKEDIN.get_or_init(|| {
        Regex::new(r#"(?i)(?:https?://)?\b(?:[a-z0-9-]+\.)*linkedin\.com/[^\s"'<>()]+"#)
            .expect("linkedin pattern is valid")
    })
}

/// Depth-first search for the first LinkedIn URL among string values.
fn find_linkedin_url(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => linkedin_regex()
            .find(text)
            .and_then(|m| normalize_linkedin(m.as_str())),
        Value::Array(items) => items.iter().find_map(find_linkedin_url),
        Value::Object(map) => map.values().find_map(find_linkedin_url),
        _ => None,
    }
}

fn normalize_linkedin(raw: &str) -> Option<String> {
    let trimmed = raw.trim_end_matches(['.', ',', ';']);
    let candidate = if trimmed.to_ascii_lowercase().starts_with("http") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let parsed = url::Url::parse(&candidate).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    if host == "linkedin.com" || host.ends_with(".linkedin.com") {
        Some(parsed.to_string())
    } else {
        None
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> EnrichmentRecord {
        EnrichmentRecord {
            domain_id: "7".to_string(),
            domain: "acme.io".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn short_service_lines_are_dropped() {
        let rec = EnrichmentRecord {
            content_summaries: Some(json!({
                "services": "SEO\n  Web Design  \n\nBrand Strategy\nPPC\nCopywriting\nHosting\nAnalytics"
            })),
            ..record()
        };
        assert_eq!(
            extract_key_products(&rec),
            vec!["Web Design", "Brand Strategy", "Copywriting", "Hosting", "Analytics"]
        );
    }

    #[test]
    fn services_with_only_short_lines_fall_through_to_keywords() {
        let rec = EnrichmentRecord {
            content_summaries: Some(json!({ "services": "a\nbb\nccc" })),
            keyword_signals: Some(json!({ "top_keywords": ["cloud", "ai", "ops", "data"] })),
            ..record()
        };
        assert_eq!(extract_key_products(&rec), vec!["cloud", "ai", "ops"]);
    }

    #[test]
    fn non_text_services_are_ignored() {
        let rec = EnrichmentRecord {
            content_summaries: Some(json!({ "services": ["not", "text"] })),
            ..record()
        };
        assert_eq!(extract_key_products(&rec), vec![DEFAULT_KEY_PRODUCT]);
    }

    #[test]
    fn industry_matching_is_case_insensitive() {
        assert_eq!(industry_profile(Some("Pediatric DENTISTRY")).name, "dental");
        assert_eq!(industry_profile(Some("Family Dentist")).name, "dental");
        assert_eq!(industry_profile(Some("Technology")).name, "general");
        assert_eq!(industry_profile(None).name, "general");
    }

    #[test]
    fn apollo_contact_matching_lead_is_not_duplicated() {
        let rec = EnrichmentRecord {
            lead_name: Some("Jane Smith".to_string()),
            lead_title: Some("Owner".to_string()),
            metadata_insights: Some(json!({
                "apollo_contact": { "name": "Jane Smith", "title": "Founder" }
            })),
            ..record()
        };
        assert_eq!(
            extract_decision_makers(&rec),
            vec![DecisionMaker::new("Jane Smith", "Owner")]
        );
    }

    #[test]
    fn apollo_contact_without_title_gets_placeholder_role() {
        let rec = EnrichmentRecord {
            metadata_insights: Some(json!({ "apollo_contact": { "name": "Raj Patel" } })),
            ..record()
        };
        assert_eq!(
            extract_decision_makers(&rec),
            vec![DecisionMaker::new("Raj Patel", PLACEHOLDER_ROLE)]
        );
    }

    #[test]
    fn linkedin_found_in_nested_online_presence() {
        let rec = EnrichmentRecord {
            online_presence: Some(json!({
                "profiles": [
                    { "label": "Facebook", "href": "https://facebook.com/acme" },
                    { "label": "Company page", "href": "see www.linkedin.com/company/acme-io." }
                ]
            })),
            ..record()
        };
        let social = extract_social_media(&rec);
        assert_eq!(
            social.get("linkedin").map(String::as_str),
            Some("https://www.linkedin.com/company/acme-io")
        );
        assert_eq!(social.get("website").map(String::as_str), Some("https://acme.io"));
        assert_eq!(
            social.get("twitter").map(String::as_str),
            Some("https://twitter.com/acme")
        );
    }

    #[test]
    fn lookalike_hosts_are_not_linkedin() {
        let rec = EnrichmentRecord {
            metadata_insights: Some(json!({ "link": "https://notlinkedin.com/acme" })),
            ..record()
        };
        assert!(!extract_social_media(&rec).contains_key("linkedin"));
    }
}
