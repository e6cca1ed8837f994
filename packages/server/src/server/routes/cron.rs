//! Administrative sync/backfill endpoints.
//!
//! Both sit behind the bearer-secret middleware and return the per-run
//! report. Unlike the public read paths these include failure detail in
//! their 500 responses — they are operator-facing.

use axum::extract::{Extension, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domains::sync::{BackfillReport, SyncReport, DEFAULT_BACKFILL_LIMIT, DEFAULT_SYNC_LIMIT};
use crate::server::app::AppState;

#[derive(Debug, Deserialize)]
pub struct CronQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub success: bool,
    #[serde(flatten)]
    pub report: SyncReport,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct BackfillResponse {
    pub success: bool,
    #[serde(flatten)]
    pub report: BackfillReport,
    pub message: String,
}

/// POST /api/cron/sync-bills
pub async fn sync_bills_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<CronQuery>,
) -> Response {
    let limit = params.limit.unwrap_or(DEFAULT_SYNC_LIMIT);

    match state.sync_service.run_sync(limit).await {
        Ok(report) => {
            let message = format!(
                "Synced {} new bills, skipped {} existing bills",
                report.processed, report.skipped
            );
            Json(SyncResponse {
                success: true,
                report,
                message,
            })
            .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "sync failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Sync failed", "details": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// POST /api/cron/backfill-summaries
pub async fn backfill_summaries_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<CronQuery>,
) -> Response {
    let limit = params.limit.unwrap_or(DEFAULT_BACKFILL_LIMIT);

    match state.sync_service.run_backfill(limit).await {
        Ok(report) => {
            let message = format!(
                "Generated {} summaries, skipped {} existing, {} errors",
                report.generated,
                report.skipped,
                report.errors.len()
            );
            Json(BackfillResponse {
                success: true,
                report,
                message,
            })
            .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "backfill failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Backfill failed", "details": e.to_string() })),
            )
                .into_response()
        }
    }
}
