//! Business intelligence assembly.
//!
//! Looks up the newest enrichment row for a domain, runs the extractors and
//! returns a profile in which every field is populated:
//! 1. Validate the domain identifier
//! 2. Load the row from the record store
//! 3. Normalize it through `extraction`
//!
//! Store failures are logged here and collapsed into a generic
//! `InternalError`; only `NotFound` carries a caller-visible message.

use crate::errors::AppError;
use crate::extraction::{
    extract_decision_makers, extract_goals, extract_key_products, extract_pain_points,
    extract_social_media, website_for,
};
use crate::models::{
    BusinessIntelligence, BusinessProfile, EnrichmentRecord, ScrapedContent, SearchRequest,
    SearchResult,
};
use crate::record_store::RecordStore;
use std::collections::BTreeMap;

pub const DEFAULT_INDUSTRY: &str = "General Business";
pub const DEFAULT_DESCRIPTION: &str = "No description available";
pub const DEFAULT_LOCATION: &str = "Unknown";
pub const UNKNOWN_COMPANY: &str = "Unknown";

pub const DEFAULT_SEARCH_CONTENT_TYPES: &[&str] = &["services", "about", "team", "blog", "general"];
pub const DEFAULT_SEARCH_LIMIT: i64 = 10;
pub const MAX_SEARCH_LIMIT: i64 = 50;

const SNIPPET_CONTEXT_CHARS: usize = 100;
const PROFILE_LIST_LIMIT: usize = 3;
const PROFILE_ABOUT_CHARS: usize = 500;
const PROFILE_EXCERPT_CHARS: usize = 200;

/// Loads and assembles the intelligence profile for `domain_id`.
pub async fn get_business_intelligence(
    store: &dyn RecordStore,
    domain_id: &str,
) -> Result<BusinessIntelligence, AppError> {
    let domain_id = domain_id.trim();
    if domain_id.is_empty() {
        return Err(AppError::BadRequest("domain_id cannot be empty".to_string()));
    }

    let record = match store.latest_by_domain_id(domain_id).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            tracing::info!("No business intelligence data found for domain_id: {}", domain_id);
            return Err(AppError::NotFound(format!(
                "No business intelligence data found for domain {}",
                domain_id
            )));
        }
        Err(e) => {
            tracing::error!(
                "Error retrieving business intelligence for domain {}: {}",
                domain_id,
                e
            );
            return Err(AppError::InternalError(
                "Failed to retrieve business intelligence".to_string(),
            ));
        }
    };

    let intelligence = assemble(record);
    tracing::info!(
        "Assembled business intelligence for domain_id {}: company={}, industry={}",
        intelligence.domain_id,
        intelligence.company_name,
        intelligence.industry
    );

    Ok(intelligence)
}

/// Builds the canonical profile from one row. Total: never fails.
pub fn assemble(record: EnrichmentRecord) -> BusinessIntelligence {
    let company_name = non_blank(&record.lead_company)
        .unwrap_or_else(|| record.domain.trim().to_string());
    let industry = non_blank(&record.lead_industry).unwrap_or_else(|| DEFAULT_INDUSTRY.to_string());
    let description =
        non_blank(&record.llm_digest).unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());
    let location =
        non_blank(&record.lead_location).unwrap_or_else(|| DEFAULT_LOCATION.to_string());

    BusinessIntelligence {
        domain_id: record.domain_id.clone(),
        domain: record.domain.clone(),
        company_name,
        industry,
        description,
        website: website_for(&record.domain),
        location,
        key_products: extract_key_products(&record),
        pain_points: extract_pain_points(&record),
        goals: extract_goals(&record),
        decision_makers: extract_decision_makers(&record),
        social_media: extract_social_media(&record),
        raw_data: Some(record),
        ..Default::default()
    }
}

/// Profile for a domain, or an "unavailable" placeholder when nothing is stored.
pub async fn get_business_profile(
    store: &dyn RecordStore,
    domain_id: &str,
) -> Result<BusinessProfile, AppError> {
    let intelligence = match get_business_intelligence(store, domain_id).await {
        Ok(bi) => bi,
        Err(e) if e.is_not_found() => return Ok(unavailable_profile(domain_id)),
        Err(e) => return Err(e),
    };

    // Scraped pages are optional decoration; the profile stands without them.
    let scraped = match store.scraped_content(&intelligence.domain).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::debug!(
                "Could not load scraped content for {}: {}",
                intelligence.domain,
                e
            );
            Vec::new()
        }
    };

    Ok(build_profile(&intelligence, &scraped))
}

/// The identifier is echoed under `domain` only; nothing is known about the company.
pub fn unavailable_profile(domain: &str) -> BusinessProfile {
    BusinessProfile {
        domain: domain.to_string(),
        company_name: UNKNOWN_COMPANY.to_string(),
        industry: DEFAULT_INDUSTRY.to_string(),
        location: DEFAULT_LOCATION.to_string(),
        services: Vec::new(),
        about: None,
        team: Vec::new(),
        content_excerpts: BTreeMap::new(),
        content_types_available: Vec::new(),
        intelligence_available: false,
        status: Some("No intelligence data available".to_string()),
    }
}

pub fn build_profile(bi: &BusinessIntelligence, scraped: &[ScrapedContent]) -> BusinessProfile {
    let about = if bi.description == DEFAULT_DESCRIPTION || bi.description.trim().is_empty() {
        None
    } else {
        Some(truncate_with_ellipsis(&bi.description, PROFILE_ABOUT_CHARS))
    };

    let team = bi
        .decision_makers
        .iter()
        .take(PROFILE_LIST_LIMIT)
        .map(|dm| format!("{} ({})", dm.name, dm.role))
        .collect();

    let mut grouped: BTreeMap<String, Vec<&ScrapedContent>> = BTreeMap::new();
    for row in scraped {
        grouped.entry(row.content_type.clone()).or_default().push(row);
    }

    let content_excerpts = grouped
        .iter()
        .filter_map(|(content_type, rows)| {
            let combined = rows
                .iter()
                .take(2)
                .map(|row| take_chars(row.content.trim(), PROFILE_EXCERPT_CHARS))
                .filter(|excerpt| !excerpt.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            if combined.is_empty() {
                None
            } else {
                Some((
                    content_type.clone(),
                    truncate_with_ellipsis(&combined, PROFILE_ABOUT_CHARS),
                ))
            }
        })
        .collect();

    BusinessProfile {
        domain: bi.domain.clone(),
        company_name: bi.company_name.clone(),
        industry: bi.industry.clone(),
        location: bi.location.clone(),
        services: bi.key_products.iter().take(PROFILE_LIST_LIMIT).cloned().collect(),
        about,
        team,
        content_excerpts,
        content_types_available: grouped.keys().cloned().collect(),
        intelligence_available: true,
        status: None,
    }
}

/// Case-insensitive substring search over a domain's scraped pages.
pub async fn search_scraped_content(
    store: &dyn RecordStore,
    domain: &str,
    request: &SearchRequest,
) -> Result<Vec<SearchResult>, AppError> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(AppError::BadRequest("query cannot be empty".to_string()));
    }

    let content_types: Vec<String> = match &request.content_types {
        Some(types) if !types.is_empty() => types.clone(),
        _ => DEFAULT_SEARCH_CONTENT_TYPES
            .iter()
            .map(|t| t.to_string())
            .collect(),
    };
    let limit = request
        .limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .clamp(1, MAX_SEARCH_LIMIT);

    let rows = store
        .search_scraped_content(domain, &content_types, query, limit)
        .await
        .map_err(|e| {
            tracing::error!("Error searching business intelligence for domain {}: {}", domain, e);
            AppError::InternalError("Failed to search business intelligence".to_string())
        })?;

    Ok(rows
        .into_iter()
        .map(|row| SearchResult {
            domain: domain.to_string(),
            content_snippet: snippet_around(&row.content, query),
            content_type: row.content_type,
            title: row.title,
            url: row.url,
            metadata: row.metadata_json.unwrap_or_else(|| serde_json::json!({})),
        })
        .collect())
}

/// Up to 100 characters either side of the first match, wrapped in `...`.
///
/// Falls back to the first 200 characters when the query does not occur.
/// Works on character indices so multi-byte text is never split.
pub fn snippet_around(content: &str, query: &str) -> String {
    let chars: Vec<char> = content.chars().collect();
    let lowered: Vec<char> = chars.iter().map(|c| fold_char(*c)).collect();
    let needle: Vec<char> = query.chars().map(fold_char).collect();

    let position = if needle.is_empty() || needle.len() > lowered.len() {
        None
    } else {
        lowered
            .windows(needle.len())
            .position(|window| window == needle.as_slice())
    };

    match position {
        Some(pos) => {
            let start = pos.saturating_sub(SNIPPET_CONTEXT_CHARS);
            let end = (pos + needle.len() + SNIPPET_CONTEXT_CHARS).min(chars.len());
            format!("...{}...", chars[start..end].iter().collect::<String>())
        }
        None => format!(
            "{}...",
            chars.iter().take(2 * SNIPPET_CONTEXT_CHARS).collect::<String>()
        ),
    }
}

/// Single-char lowercase so indices line up with the original text.
fn fold_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn take_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", take_chars(text, max))
    } else {
        text.to_string()
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
