//! Prints the assembled business intelligence and marketing pitch for one domain id.
//!
//! Usage: `lookup_domain <domain_id> [agent_name]`

use shortforge_api::config::Config;
use shortforge_api::db::Database;
use shortforge_api::handlers::AppState;
use shortforge_api::intelligence;
use shortforge_api::pitch::DEFAULT_AGENT_NAME;
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let mut args = env::args().skip(1);
    let domain_id = args
        .next()
        .ok_or_else(|| anyhow::anyhow!("usage: lookup_domain <domain_id> [agent_name]"))?;
    let agent_name = args.next().unwrap_or_else(|| DEFAULT_AGENT_NAME.to_string());

    let config = Config::from_env()?;
    let db = Database::new(&config.database_url).await?;
    let state = AppState::new(db.pool, config);

    tracing::info!("Looking up domain {}", domain_id);

    let bi = intelligence::get_business_intelligence(state.record_store.as_ref(), &domain_id)
        .await
        .map_err(|e| anyhow::anyhow!("lookup failed: {}", e))?;
    let pitch = state.pitch_service.generate_pitch(&bi, &agent_name).await;

    println!("{}", serde_json::to_string_pretty(&bi)?);
    println!("{}", serde_json::to_string_pretty(&pitch)?);

    Ok(())
}
