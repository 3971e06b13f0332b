use crate::config::Config;
use crate::errors::AppError;
use crate::intelligence;
use crate::models::*;
use crate::pitch::{PitchService, DEFAULT_AGENT_NAME};
use crate::record_store::{PgRecordStore, RecordStore};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state injected into handlers.
///
/// Built once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (inquiries, projects).
    pub db: PgPool,
    /// Application configuration.
    pub config: Config,
    /// Read-only access to enrichment rows and scraped pages.
    pub record_store: Arc<dyn RecordStore>,
    /// AI pitch generation with template fallback.
    pub pitch_service: PitchService,
}

impl AppState {
    /// Wires the Postgres record store and the configured pitch generator.
    pub fn new(db: PgPool, config: Config) -> Self {
        let pitch_service = PitchService::from_config(&config);
        Self {
            record_store: Arc::new(PgRecordStore::new(db.clone())),
            db,
            config,
            pitch_service,
        }
    }
}

/// Health check endpoint.
///
/// Returns the service status and version. Not rate limited.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "shortforge-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// GET /api/v1/business-intelligence/health
///
/// Reports whether AI pitch generation is configured. Never calls the provider.
pub async fn business_intelligence_health(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "business-intelligence-api",
            "pitch_generation_available": state.pitch_service.is_available()
        })),
    )
}

/// GET /api/v1/business-intelligence/domain/:domain_id
///
/// Assembles the intelligence profile for a domain and, unless
/// `include_pitch=false`, attaches a marketing pitch for `agent_name`.
///
/// # Returns
///
/// * `Result<Json<BusinessIntelligenceResponse>, AppError>` - 404 when the
///   domain has no enrichment row; the pitch itself never fails.
pub async fn get_business_intelligence(
    State(state): State<Arc<AppState>>,
    Path(domain_id): Path<String>,
    Query(params): Query<LookupParams>,
) -> Result<Json<BusinessIntelligenceResponse>, AppError> {
    tracing::info!("GET /business-intelligence/domain/{} - params: {:?}", domain_id, params);

    let data = intelligence::get_business_intelligence(state.record_store.as_ref(), &domain_id)
        .await?;

    let marketing_pitch = if params.include_pitch.unwrap_or(true) {
        let agent_name = params
            .agent_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_AGENT_NAME);
        Some(state.pitch_service.generate_pitch(&data, agent_name).await)
    } else {
        None
    };

    tracing::info!(
        "Business intelligence for {} assembled ({}), pitch: {}",
        domain_id,
        data.company_name,
        marketing_pitch.is_some()
    );

    Ok(Json(BusinessIntelligenceResponse {
        data,
        marketing_pitch,
    }))
}

/// GET /api/v1/business-intelligence/profile/:domain_id
pub async fn get_business_profile(
    State(state): State<Arc<AppState>>,
    Path(domain_id): Path<String>,
) -> Result<Json<BusinessProfile>, AppError> {
    tracing::info!("GET /business-intelligence/profile/{}", domain_id);

    let profile = intelligence::get_business_profile(state.record_store.as_ref(), &domain_id).await?;
    Ok(Json(profile))
}

/// POST /api/v1/business-intelligence/search/:domain
pub async fn search_business_intelligence(
    State(state): State<Arc<AppState>>,
    Path(domain): Path<String>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    tracing::info!("POST /business-intelligence/search/{} - query: {:?}", domain, request.query);

    let results =
        intelligence::search_scraped_content(state.record_store.as_ref(), &domain, &request)
            .await?;

    Ok(Json(SearchResponse {
        total_results: results.len(),
        results,
        query: request.query,
        domain,
    }))
}

/// POST /api/v1/pitch
///
/// Generates a pitch from caller-supplied intelligence, e.g. a partial
/// profile the frontend already holds. Always answers 200 with a pitch.
pub async fn generate_pitch(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PitchRequest>,
) -> Result<Json<PitchResponse>, AppError> {
    let agent_name = request
        .agent_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_AGENT_NAME);

    tracing::info!(
        "POST /pitch - company: {:?}, agent: {}",
        request.business_intelligence.company_name,
        agent_name
    );

    let marketing_pitch = state
        .pitch_service
        .generate_pitch(&request.business_intelligence, agent_name)
        .await;

    Ok(Json(PitchResponse {
        marketing_pitch,
        ai_available: state.pitch_service.is_available(),
    }))
}

/// Checks the `X-Admin-Token` header against `ADMIN_API_KEY`.
///
/// With no key configured every admin request is rejected.
pub fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), AppError> {
    let Some(ref expected) = state.config.admin_api_key else {
        return Err(AppError::Unauthorized(
            "Admin endpoints are disabled (ADMIN_API_KEY not set)".to_string(),
        ));
    };

    let token = headers
        .get("x-admin-token")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing X-Admin-Token header".to_string()))?;

    if !constant_time_compare(token, expected) {
        tracing::warn!("Invalid admin token received");
        return Err(AppError::Unauthorized("Invalid admin token".to_string()));
    }

    Ok(())
}

/// Constant-time string comparison; only the length leaks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.as_bytes()
        .iter()
        .zip(b.as_bytes().iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
