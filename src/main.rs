use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use shortforge_api::{
    config::Config, db::Database, handlers, handlers::AppState, inquiry_handler, project_handler,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// Initializes logging, configuration, the database pool and the pitch
/// generator, then serves the HTTP routes behind CORS, tracing, a body-size
/// limit and per-IP rate limiting.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shortforge_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize database connection pool
    let db = Database::new(&config.database_url).await?;
    tracing::info!("Database connection pool established");

    let cors = cors_layer(&config)?;
    let port = config.port;

    // Build application state
    let app_state = Arc::new(AppState::new(db.pool.clone(), config));
    tracing::info!(
        "Pitch generation: {}",
        if app_state.pitch_service.is_available() {
            "OpenAI with template fallback"
        } else {
            "template only"
        }
    );

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("invalid rate limiter configuration"))?,
    );

    let protected_routes = Router::new()
        // Business intelligence
        .route(
            "/api/v1/business-intelligence/health",
            get(handlers::business_intelligence_health),
        )
        .route(
            "/api/v1/business-intelligence/domain/:domain_id",
            get(handlers::get_business_intelligence),
        )
        .route(
            "/api/v1/business-intelligence/profile/:domain_id",
            get(handlers::get_business_profile),
        )
        .route(
            "/api/v1/business-intelligence/search/:domain",
            post(handlers::search_business_intelligence),
        )
        .route("/api/v1/pitch", post(handlers::generate_pitch))
        // Contact inquiries (create is public, the rest admin)
        .route(
            "/api/v1/inquiries",
            post(inquiry_handler::create_inquiry).get(inquiry_handler::list_inquiries),
        )
        .route(
            "/api/v1/inquiries/:id",
            get(inquiry_handler::get_inquiry).put(inquiry_handler::update_inquiry),
        )
        // Projects (admin)
        .route(
            "/api/v1/projects",
            post(project_handler::create_project).get(project_handler::list_projects),
        )
        .route(
            "/api/v1/projects/:id",
            get(project_handler::get_project).put(project_handler::update_project),
        )
        .route(
            "/api/v1/projects/:id/updates",
            post(project_handler::create_project_update),
        )
        .layer(
            ServiceBuilder::new()
                // Request size limit: 1MB max payload
                .layer(RequestBodyLimitLayer::new(1024 * 1024))
                // Rate limiting: 10 req/sec per IP, burst of 20
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    // Health check bypasses rate limiting
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Permissive when no origins are configured, otherwise an explicit allow-list.
fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    if config.cors_allowed_origins.is_empty() {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set - allowing any origin");
        return Ok(CorsLayer::permissive());
    }

    let origins = config
        .cors_allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| anyhow::anyhow!("invalid CORS origin: {}", origin))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    tracing::info!("CORS restricted to {:?}", config.cors_allowed_origins);
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any))
}
