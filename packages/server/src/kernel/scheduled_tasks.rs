//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! Two periodic jobs:
//! - Hourly sync: discover and ingest new bills from congress.gov
//! - Daily backfill: generate summaries for bills that are missing one
//!
//! Jobs call the orchestrator directly and log failures; a failed run never
//! takes the process down.

use std::sync::Arc;

use anyhow::Result;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::sync::{SyncService, DEFAULT_BACKFILL_LIMIT, DEFAULT_SYNC_LIMIT};

/// Start all scheduled tasks
pub async fn start_scheduler(sync_service: Arc<SyncService>) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    // Bill sync - runs every hour
    let service = sync_service.clone();
    let sync_job = Job::new_async("0 0 * * * *", move |_uuid, _lock| {
        let service = service.clone();
        Box::pin(async move {
            match service.run_sync(DEFAULT_SYNC_LIMIT).await {
                Ok(report) => tracing::info!(
                    processed = report.processed,
                    skipped = report.skipped,
                    errors = report.errors.len(),
                    "scheduled sync complete"
                ),
                Err(e) => tracing::error!("Scheduled sync failed: {}", e),
            }
        })
    })?;

    scheduler.add(sync_job).await?;

    // Summary backfill - runs daily at 03:30 UTC
    let service = sync_service.clone();
    let backfill_job = Job::new_async("0 30 3 * * *", move |_uuid, _lock| {
        let service = service.clone();
        Box::pin(async move {
            match service.run_backfill(DEFAULT_BACKFILL_LIMIT).await {
                Ok(report) => tracing::info!(
                    checked = report.checked,
                    generated = report.generated,
                    skipped = report.skipped,
                    errors = report.errors.len(),
                    "scheduled backfill complete"
                ),
                Err(e) => tracing::error!("Scheduled backfill failed: {}", e),
            }
        })
    })?;

    scheduler.add(backfill_job).await?;
    scheduler.start().await?;

    tracing::info!("Scheduled tasks started (hourly bill sync, daily summary backfill)");
    Ok(scheduler)
}
