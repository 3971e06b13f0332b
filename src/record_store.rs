use crate::errors::{AppError, ResultExt};
use crate::models::{EnrichmentRecord, ScrapedContent};
use async_trait::async_trait;
use sqlx::PgPool;

/// Read-only access to the pre-scraped company data.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Newest enrichment row for a domain identifier, if any.
    async fn latest_by_domain_id(
        &self,
        domain_id: &str,
    ) -> Result<Option<EnrichmentRecord>, AppError>;

    /// All scraped pages for a hostname, grouped by content type, newest first.
    async fn scraped_content(&self, domain: &str) -> Result<Vec<ScrapedContent>, AppError>;

    /// Scraped pages whose content contains `query` (case-insensitive).
    async fn search_scraped_content(
        &self,
        domain: &str,
        content_types: &[String],
        query: &str,
        limit: i64,
    ) -> Result<Vec<ScrapedContent>, AppError>;
}

/// Postgres-backed store over `intelligence_bundles`, `domains` and `scraped_contents`.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn latest_by_domain_id(
        &self,
        domain_id: &str,
    ) -> Result<Option<EnrichmentRecord>, AppError> {
        let record = sqlx::query_as::<_, EnrichmentRecord>(
            r#"
            SELECT
                ib.domain_id::text AS domain_id,
                d.domain,
                ib.lead_company,
                ib.lead_industry,
                ib.lead_location,
                ib.lead_name,
                ib.lead_title,
                ib.llm_digest,
                ib.content_summaries,
                ib.keyword_signals,
                ib.metadata_insights,
                ib.online_presence,
                ib.created_at
            FROM intelligence_bundles ib
            JOIN domains d ON d.id = ib.domain_id
            WHERE ib.domain_id::text = $1
            ORDER BY ib.created_at DESC NULLS LAST
            LIMIT 1
            "#,
        )
        .bind(domain_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("loading intelligence bundle for domain_id {}", domain_id))?;

        Ok(record)
    }

    async fn scraped_content(&self, domain: &str) -> Result<Vec<ScrapedContent>, AppError> {
        let rows = sqlx::query_as::<_, ScrapedContent>(
            r#"
            SELECT sc.content_type, sc.url, sc.title, sc.content, sc.metadata_json, sc.scraped_at
            FROM scraped_contents sc
            JOIN domains d ON sc.domain_id = d.id
            WHERE d.domain = $1
            ORDER BY sc.content_type, sc.scraped_at DESC
            "#,
        )
        .bind(domain)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("loading scraped content for {}", domain))?;

        Ok(rows)
    }

    async fn search_scraped_content(
        &self,
        domain: &str,
        content_types: &[String],
        query: &str,
        limit: i64,
    ) -> Result<Vec<ScrapedContent>, AppError> {
        let pattern = format!("%{}%", escape_like(&query.to_lowercase()));

        let rows = sqlx::query_as::<_, ScrapedContent>(
            r#"
            SELECT sc.content_type, sc.url, sc.title, sc.content, sc.metadata_json, sc.scraped_at
            FROM scraped_contents sc
            JOIN domains d ON sc.domain_id = d.id
            WHERE d.domain = $1
              AND sc.content_type = ANY($2)
              AND LOWER(sc.content) LIKE $3
            ORDER BY sc.scraped_at DESC
            LIMIT $4
            "#,
        )
        .bind(domain)
        .bind(content_types)
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("searching scraped content for {}", domain))?;

        Ok(rows)
    }
}

/// Escapes LIKE wildcards so user input matches literally.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
