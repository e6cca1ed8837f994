//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::common::Error;
use crate::config::Config;
use crate::domains::summaries::{SummaryGenerator, SummaryStore};
use crate::domains::sync::SyncService;
use crate::kernel::{
    AnthropicClient, BaseSummaryModel, CongressClient, OpenAIClient, ServerDeps,
};
use crate::server::middleware::require_cron_secret;
use crate::server::routes::{
    backfill_summaries_handler, get_bill_handler, health_handler, list_bills_handler,
    search_bills_handler, sync_bills_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub server_deps: Arc<ServerDeps>,
    pub sync_service: Arc<SyncService>,
    pub cron_secret: String,
}

/// Build the Axum application router.
///
/// All dependencies are constructed here, once, and handed to the router
/// and the scheduler — nothing is lazily initialized at call sites.
///
/// Returns (Router, Arc<SyncService>) — the sync service is also needed by
/// the scheduled tasks.
pub fn build_app(pool: PgPool, config: &Config) -> Result<(Router, Arc<SyncService>), Error> {
    let bill_source = Arc::new(CongressClient::new(config.congress_api_key.clone())?);

    // Provider order is the fallback order: Anthropic first, OpenAI second.
    let mut providers: Vec<Arc<dyn BaseSummaryModel>> = Vec::new();
    if let Some(key) = &config.anthropic_api_key {
        providers.push(Arc::new(AnthropicClient::new(key)));
    }
    if let Some(key) = &config.openai_api_key {
        providers.push(Arc::new(OpenAIClient::new(key)));
    }
    if providers.is_empty() {
        tracing::warn!("no AI provider configured, summary generation will fail");
    }

    let generator = Arc::new(SummaryGenerator::new(providers));
    let summaries = SummaryStore::new(pool.clone());

    let server_deps = Arc::new(ServerDeps::new(
        pool.clone(),
        bill_source,
        generator,
        summaries,
    ));
    let sync_service = Arc::new(SyncService::new(server_deps.clone()));

    let state = AppState {
        db_pool: pool,
        server_deps,
        sync_service: sync_service.clone(),
        cron_secret: config.cron_secret.clone(),
    };

    let cron_routes = Router::new()
        .route("/sync-bills", post(sync_bills_handler))
        .route("/backfill-summaries", post(backfill_summaries_handler))
        .layer(middleware::from_fn(require_cron_secret));

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/api/bills", get(list_bills_handler))
        .route("/api/bills/search", get(search_bills_handler))
        .route("/api/bills/:id", get(get_bill_handler))
        .nest("/api/cron", cron_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(Extension(state));

    Ok((app, sync_service))
}
