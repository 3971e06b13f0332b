use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use std::collections::BTreeMap;

// ============ Database Models ============

/// One enrichment row from `intelligence_bundles`, joined with its domain.
///
/// Written by the external ingestion pipeline; this service only reads it.
/// The JSONB columns are kept as raw `Value`s because their shape is not
/// guaranteed; the extractors in [`crate::extraction`] tolerate anything.
#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize, Deserialize)]
pub struct EnrichmentRecord {
    /// Domain identifier (text-cast primary key of `domains`).
    pub domain_id: String,
    /// Website hostname, e.g. `acme-dental.com`.
    pub domain: String,
    pub lead_company: Option<String>,
    pub lead_industry: Option<String>,
    pub lead_location: Option<String>,
    pub lead_name: Option<String>,
    pub lead_title: Option<String>,
    /// Free-text company description produced upstream by an LLM.
    pub llm_digest: Option<String>,
    /// Category name -> summary text (e.g. `"services"`).
    pub content_summaries: Option<Value>,
    /// Contains an ordered `top_keywords` list.
    pub keyword_signals: Option<Value>,
    /// May contain `apollo_contact: { name, title }` and social links.
    pub metadata_insights: Option<Value>,
    pub online_presence: Option<Value>,
    pub created_at: Option<DateTime<Utc>>,
}

/// A row from `scraped_contents` used by the text search and profile views.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ScrapedContent {
    pub content_type: String,
    pub url: String,
    pub title: Option<String>,
    pub content: String,
    pub metadata_json: Option<Value>,
    pub scraped_at: Option<DateTime<Utc>>,
}

// ============ Business Intelligence ============

/// Person who can sign off on a purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionMaker {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
}

impl DecisionMaker {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Canonical, fully-populated company profile.
///
/// Every required field has a non-null default. The optional enrichment
/// fields are only ever filled by callers of `POST /api/v1/pitch` and are
/// omitted from JSON when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessIntelligence {
    #[serde(deserialize_with = "null_as_default")]
    pub domain_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub domain: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub industry: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub website: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub key_products: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub pain_points: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub goals: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub decision_makers: Vec<DecisionMaker>,
    #[serde(deserialize_with = "null_as_default")]
    pub social_media: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub competitors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
    #[serde(
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub recent_news: Vec<NewsItem>,

    /// Untransformed source row, kept for diagnostics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<EnrichmentRecord>,
}

/// Reads an explicit JSON `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Short marketing copy inviting a visitor to talk to an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketingPitch {
    /// At most ten words (advisory).
    pub headline: String,
    /// At most twenty words (advisory).
    pub subheadline: String,
    pub key_benefits: Vec<String>,
    pub call_to_action: String,
    pub personalized_insights: Vec<String>,
    pub social_proof: Option<String>,
}

// ============ API Models ============

/// Query parameters for the domain lookup endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupParams {
    pub agent_name: Option<String>,
    pub include_pitch: Option<bool>,
}

/// Response of `GET /business-intelligence/domain/{domain_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessIntelligenceResponse {
    pub data: BusinessIntelligence,
    pub marketing_pitch: Option<MarketingPitch>,
}

/// Body of `POST /api/v1/pitch`.
#[derive(Debug, Clone, Deserialize)]
pub struct PitchRequest {
    pub business_intelligence: BusinessIntelligence,
    pub agent_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PitchResponse {
    pub marketing_pitch: MarketingPitch,
    /// True when the AI path is configured for this process.
    pub ai_available: bool,
}

/// Body of `POST /business-intelligence/search/{domain}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub content_types: Option<Vec<String>>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub domain: String,
    pub content_type: String,
    pub title: Option<String>,
    pub url: String,
    pub content_snippet: String,
    pub metadata: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub total_results: usize,
    pub query: String,
    pub domain: String,
}

/// Human-oriented summary of a domain's intelligence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub domain: String,
    pub company_name: String,
    pub industry: String,
    pub location: String,
    pub services: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    pub team: Vec<String>,
    /// Scraped content type -> first couple of excerpts, joined.
    pub content_excerpts: BTreeMap<String, String>,
    pub content_types_available: Vec<String>,
    pub intelligence_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// `skip`/`limit` query parameters for admin listings.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Pagination {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl Pagination {
    pub const DEFAULT_LIMIT: i64 = 100;
    pub const MAX_LIMIT: i64 = 100;

    /// `(offset, limit)` with negative skips zeroed and the limit clamped to `1..=100`.
    pub fn bounds(&self) -> (i64, i64) {
        let offset = self.skip.unwrap_or(0).max(0);
        let limit = self
            .limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT);
        (offset, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_bounds_are_clamped() {
        assert_eq!(Pagination::default().bounds(), (0, 100));
        let p = Pagination {
            skip: Some(-5),
            limit: Some(1000),
        };
        assert_eq!(p.bounds(), (0, 100));
        let p = Pagination {
            skip: Some(20),
            limit: Some(0),
        };
        assert_eq!(p.bounds(), (20, 1));
    }

    #[test]
    fn optional_intelligence_fields_are_omitted() {
        let bi = BusinessIntelligence {
            company_name: "Acme".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&bi).unwrap();
        assert_eq!(json["company_name"], "Acme");
        assert!(json.get("employee_count").is_none());
        assert!(json.get("recent_news").is_none());
        assert!(json.get("raw_data").is_none());
        assert!(json["social_media"].is_object());
    }

    #[test]
    fn partial_intelligence_deserializes_with_defaults() {
        let bi: BusinessIntelligence =
            serde_json::from_str(r#"{"company_name": "TechCorp", "employee_count": 150}"#).unwrap();
        assert_eq!(bi.company_name, "TechCorp");
        assert_eq!(bi.employee_count, Some(150));
        assert!(bi.key_products.is_empty());
    }

    #[test]
    fn nulls_and_missing_nested_fields_read_as_blank() {
        let bi: BusinessIntelligence = serde_json::from_str(
            r#"{
                "company_name": "TechCorp",
                "location": null,
                "goals": null,
                "decision_makers": [{"name": "Sarah Johnson"}, {"name": "Raj Patel", "role": null}],
                "recent_news": [{"summary": "Opened a second office"}]
            }"#,
        )
        .unwrap();
        assert_eq!(bi.location, "");
        assert!(bi.goals.is_empty());
        assert_eq!(bi.decision_makers[0], DecisionMaker::new("Sarah Johnson", ""));
        assert_eq!(bi.decision_makers[1].role, "");
        assert_eq!(bi.recent_news[0].title, "");
        assert_eq!(bi.recent_news[0].summary.as_deref(), Some("Opened a second office"));
    }
}
