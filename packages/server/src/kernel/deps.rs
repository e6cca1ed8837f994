//! Server dependencies (using traits for testability)
//!
//! Central dependency container constructed once at process start and
//! passed by reference to every component that needs it — no module-level
//! singletons. External services sit behind trait abstractions so tests
//! can inject mocks.

use std::sync::Arc;

use sqlx::PgPool;

use crate::domains::summaries::{SummaryGenerator, SummaryStore};
use crate::kernel::BaseBillSource;

/// Dependencies shared by the orchestrator and the HTTP routes
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    /// Legislative data source (congress.gov in production)
    pub bill_source: Arc<dyn BaseBillSource>,
    /// Summary generation with ordered provider fallback
    pub generator: Arc<SummaryGenerator>,
    /// Document store for generated summaries
    pub summaries: SummaryStore,
}

impl ServerDeps {
    pub fn new(
        db_pool: PgPool,
        bill_source: Arc<dyn BaseBillSource>,
        generator: Arc<SummaryGenerator>,
        summaries: SummaryStore,
    ) -> Self {
        Self {
            db_pool,
            bill_source,
            generator,
            summaries,
        }
    }
}
