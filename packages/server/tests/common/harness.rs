//! Test harness with testcontainers for integration testing.
//!
//! The Postgres container is started once on the first test and shared by
//! the whole run; migrations run once against it. Tests isolate themselves
//! by using distinct bill identities rather than truncating shared tables.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::PgPool;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

use server_core::domains::bills::NewBill;
use server_core::domains::summaries::{SummaryGenerator, SummaryStore};
use server_core::kernel::{BaseBillSource, BaseSummaryModel, ServerDeps};

/// Shared test infrastructure that persists across all tests.
struct SharedTestInfra {
    base_url: String,
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let host = postgres.get_host().await?;
        let port = postgres.get_host_port_ipv4(5432).await?;
        let base_url = format!("postgresql://postgres:postgres@{}:{}", host, port);
        let db_url = format!("{base_url}/postgres");

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            base_url,
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Pool connected to the shared migrated test database.
pub async fn test_pool() -> PgPool {
    let infra = SharedTestInfra::get().await;

    PgPool::connect(&infra.db_url)
        .await
        .expect("Failed to connect to test database")
}

/// Fresh migrated database on the shared container, for tests that scan
/// whole tables (e.g. backfill runs). `name` must be unique per test.
#[allow(dead_code)]
pub async fn isolated_pool(name: &str) -> PgPool {
    let infra = SharedTestInfra::get().await;

    let admin = PgPool::connect(&infra.db_url)
        .await
        .expect("Failed to connect to test database");
    sqlx::query(&format!("CREATE DATABASE {name}"))
        .execute(&admin)
        .await
        .expect("Failed to create isolated test database");

    let pool = PgPool::connect(&format!("{}/{}", infra.base_url, name))
        .await
        .expect("Failed to connect to isolated test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on isolated test database");

    pool
}

/// ServerDeps wired with a mock bill source and mock providers.
#[allow(dead_code)]
pub fn deps_with(
    pool: PgPool,
    bill_source: Arc<dyn BaseBillSource>,
    providers: Vec<Arc<dyn BaseSummaryModel>>,
) -> Arc<ServerDeps> {
    Arc::new(ServerDeps::new(
        pool.clone(),
        bill_source,
        Arc::new(SummaryGenerator::new(providers)),
        SummaryStore::new(pool),
    ))
}

/// A plausible NewBill for store tests.
#[allow(dead_code)]
pub fn sample_bill(congress: i32, bill_type: &str, number: i32) -> NewBill {
    NewBill {
        congress_number: congress,
        bill_type: bill_type.to_string(),
        bill_number: number,
        title: format!("{} {} Act", bill_type.to_uppercase(), number),
        short_title: None,
        introduced_date: chrono::NaiveDate::from_ymd_opt(2025, 7, 1),
        latest_action_date: chrono::NaiveDate::from_ymd_opt(2025, 7, 21),
        latest_action_text: Some("Referred to the Committee on Ways and Means.".to_string()),
        sponsor_name: Some("Rep. Jordan Example [D-MN-5]".to_string()),
        sponsor_party: Some("D".to_string()),
        sponsor_state: Some("MN".to_string()),
        status: "In Committee".to_string(),
        subjects: vec!["Taxation".to_string()],
        congress_url: None,
        full_text_url: None,
    }
}
