use axum::routing::{get, post};
use axum::Router;
use tracing_subscriber::EnvFilter;

use course_search::api;
use course_search::config::Config;
use course_search::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("Catalog file: {}", config.catalog_path().display());
    tracing::info!("LLM provider: {} ({})", config.llm.provider, config.llm.base_url);

    let state = AppState::new(config.clone())?;

    // Build the primary index before accepting traffic. On failure the catalog
    // stays unloaded: each /ask_course retries the load and reports the store or
    // embedding error until one succeeds.
    if let Err(e) = state.catalog.reload().await {
        tracing::error!("Initial catalog load failed: {e}");
    }

    let app = Router::new()
        .route("/ask_course", post(api::ask::ask_course))
        .route("/get_roadmap", post(api::roadmap::get_roadmap))
        .route("/api/catalog", get(api::catalog::status))
        .route("/api/catalog/reload", post(api::catalog::reload))
        .route("/api/catalog/courses", post(api::catalog::import))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
