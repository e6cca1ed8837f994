//! Sync and backfill batch jobs.
//!
//! Both modes run a finite candidate list to completion, one item at a
//! time, with a fixed sleep between successful items to bound the request
//! rate against upstream services. Every per-item failure is recorded in
//! the run report and processing continues; only the initial candidate
//! fetch can fail the whole run.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::common::Error;
use crate::domains::bills::{format_bill_id, Bill, BillStatus, NewBill};
use crate::domains::summaries::{BillInput, TEXT_UNAVAILABLE_PLACEHOLDER};
use crate::kernel::congress_client::BillStub;
use crate::kernel::ServerDeps;

/// Congress session synced by default.
pub const CURRENT_CONGRESS: i32 = 119;

/// Default candidate count for a sync run.
pub const DEFAULT_SYNC_LIMIT: i64 = 50;

/// Default candidate count for a backfill run.
pub const DEFAULT_BACKFILL_LIMIT: i64 = 10;

const SYNC_ITEM_DELAY: Duration = Duration::from_secs(1);
const BACKFILL_ITEM_DELAY: Duration = Duration::from_secs(2);

/// Cap on the error list returned from a sync run.
const MAX_REPORTED_ERRORS: usize = 10;

/// Aggregate report for one sync run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct SyncReport {
    pub processed: u32,
    pub skipped: u32,
    pub errors: Vec<String>,
}

/// Aggregate report for one backfill run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct BackfillReport {
    pub checked: u32,
    pub generated: u32,
    pub skipped: u32,
    pub errors: Vec<String>,
}

enum SyncOutcome {
    Inserted,
    Skipped,
    DetailsUnavailable,
}

/// Runs the sync and backfill jobs against injected dependencies.
pub struct SyncService {
    deps: Arc<ServerDeps>,
    sync_delay: Duration,
    backfill_delay: Duration,
}

impl SyncService {
    pub fn new(deps: Arc<ServerDeps>) -> Self {
        Self {
            deps,
            sync_delay: SYNC_ITEM_DELAY,
            backfill_delay: BACKFILL_ITEM_DELAY,
        }
    }

    /// Override the inter-item delays (tests use zero).
    pub fn with_delays(deps: Arc<ServerDeps>, sync_delay: Duration, backfill_delay: Duration) -> Self {
        Self {
            deps,
            sync_delay,
            backfill_delay,
        }
    }

    /// Discover and ingest new bills from the upstream source.
    pub async fn run_sync(&self, limit: i64) -> Result<SyncReport, Error> {
        tracing::info!(limit, "fetching recent bills from congress.gov");
        let stubs = self
            .deps
            .bill_source
            .fetch_recent_bills(CURRENT_CONGRESS, limit)
            .await?;
        tracing::info!(count = stubs.len(), "bills to process");

        let mut report = SyncReport::default();

        for stub in &stubs {
            match self.sync_one(stub).await {
                Ok(SyncOutcome::Inserted) => {
                    report.processed += 1;
                    tokio::time::sleep(self.sync_delay).await;
                }
                Ok(SyncOutcome::Skipped) => report.skipped += 1,
                Ok(SyncOutcome::DetailsUnavailable) => {
                    report.errors.push(format!(
                        "Could not fetch details for {}{}",
                        stub.bill_type, stub.number
                    ));
                }
                Err(e) => {
                    tracing::error!(
                        bill = %format!("{}{}", stub.bill_type, stub.number),
                        error = %e,
                        "error processing bill"
                    );
                    report.errors.push(format!(
                        "Error processing {}{}: {}",
                        stub.bill_type, stub.number, e
                    ));
                }
            }
        }

        report.errors.truncate(MAX_REPORTED_ERRORS);
        tracing::info!(
            processed = report.processed,
            skipped = report.skipped,
            errors = report.errors.len(),
            "sync run complete"
        );
        Ok(report)
    }

    async fn sync_one(&self, stub: &BillStub) -> Result<SyncOutcome, Error> {
        let deps = &self.deps;
        let bill_type = stub.bill_type.to_lowercase();

        if Bill::exists(stub.congress, &bill_type, stub.number, &deps.db_pool).await? {
            return Ok(SyncOutcome::Skipped);
        }

        tracing::info!(
            bill = %format!("{}{}", stub.bill_type, stub.number),
            congress = stub.congress,
            "processing bill"
        );

        let Some(details) = deps
            .bill_source
            .fetch_bill_details(stub.congress, &stub.bill_type, stub.number)
            .await?
        else {
            return Ok(SyncOutcome::DetailsUnavailable);
        };

        // Subjects are best-effort; a failure never blocks ingestion.
        let subjects = deps
            .bill_source
            .fetch_bill_subjects(stub.congress, &stub.bill_type, stub.number)
            .await
            .unwrap_or_default();

        let action = stub.latest_action.as_ref();
        let action_text = action.and_then(|a| a.text.clone());
        let status = BillStatus::classify(action_text.as_deref().unwrap_or(""));

        let sponsor = details.sponsors.first();
        let new_bill = NewBill {
            congress_number: stub.congress,
            bill_type: bill_type.clone(),
            bill_number: stub.number,
            title: details.title.clone().unwrap_or_else(|| stub.title.clone()),
            short_title: None,
            introduced_date: details
                .introduced_date
                .as_deref()
                .and_then(parse_upstream_date),
            latest_action_date: action
                .and_then(|a| a.action_date.as_deref())
                .and_then(parse_upstream_date),
            latest_action_text: action_text,
            sponsor_name: sponsor.and_then(|s| s.full_name.clone()),
            sponsor_party: sponsor.and_then(|s| s.party.clone()),
            sponsor_state: sponsor.and_then(|s| s.state.clone()),
            status: status.as_str().to_string(),
            subjects,
            congress_url: stub.url.clone(),
            full_text_url: None,
        };

        let inserted = Bill::insert(&new_bill, &deps.db_pool).await?;

        // Summary generation is best-effort: the bill row stays persisted
        // even when every provider fails.
        if let Err(e) = self.generate_and_store_summary(&inserted).await {
            tracing::error!(
                bill_id = inserted.id,
                error = %e,
                "failed to generate summary, bill saved without one"
            );
        }

        Ok(SyncOutcome::Inserted)
    }

    /// Fill missing summaries for already-ingested bills, most recent first.
    pub async fn run_backfill(&self, limit: i64) -> Result<BackfillReport, Error> {
        tracing::info!(limit, "fetching bills from database");
        let bills = Bill::find_recent(limit, &self.deps.db_pool).await?;
        tracing::info!(count = bills.len(), "bills to check");

        let mut report = BackfillReport::default();

        for bill in &bills {
            report.checked += 1;
            match self.backfill_one(bill).await {
                Ok(true) => {
                    report.generated += 1;
                    tokio::time::sleep(self.backfill_delay).await;
                }
                Ok(false) => report.skipped += 1,
                Err(e) => {
                    tracing::error!(bill_id = bill.id, error = %e, "error processing bill");
                    report.errors.push(format!("Bill {}: {}", bill.id, e));
                }
            }
        }

        tracing::info!(
            checked = report.checked,
            generated = report.generated,
            skipped = report.skipped,
            errors = report.errors.len(),
            "backfill run complete"
        );
        Ok(report)
    }

    async fn backfill_one(&self, bill: &Bill) -> Result<bool, Error> {
        if self.deps.summaries.get_by_bill_id(bill.id).await?.is_some() {
            tracing::debug!(bill_id = bill.id, "summary already exists, skipping");
            return Ok(false);
        }

        tracing::info!(
            bill_id = bill.id,
            bill = %format!("{} {}", bill.bill_type.to_uppercase(), bill.bill_number),
            "generating summary"
        );
        self.generate_and_store_summary(bill).await?;
        Ok(true)
    }

    /// Fetch text (best-effort, placeholder on absence or failure), generate
    /// a summary and persist it.
    async fn generate_and_store_summary(&self, bill: &Bill) -> Result<(), Error> {
        let deps = &self.deps;

        let bill_text = match deps
            .bill_source
            .fetch_bill_text(bill.congress_number, &bill.bill_type, bill.bill_number)
            .await
        {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::info!(bill_id = bill.id, "no text available, summarizing from title");
                TEXT_UNAVAILABLE_PLACEHOLDER.to_string()
            }
            Err(e) => {
                tracing::warn!(bill_id = bill.id, error = %e, "text fetch failed, summarizing from title");
                TEXT_UNAVAILABLE_PLACEHOLDER.to_string()
            }
        };

        let input = BillInput {
            title: bill.title.clone(),
            bill_number: format!("{} {}", bill.bill_type.to_uppercase(), bill.bill_number),
            introduced_date: bill
                .introduced_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            sponsor: bill
                .sponsor_name
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            bill_text,
        };

        let result = deps.generator.generate(input).await?;

        deps.summaries
            .upsert(
                bill.id,
                &format_bill_id(bill.congress_number, &bill.bill_type, bill.bill_number),
                result.summary,
                &result.model_used,
                result.processing_time_ms,
            )
            .await?;

        Ok(())
    }
}

fn parse_upstream_date(date: &str) -> Option<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_upstream_date() {
        assert_eq!(
            parse_upstream_date("2025-07-21"),
            chrono::NaiveDate::from_ymd_opt(2025, 7, 21)
        );
        assert_eq!(parse_upstream_date("not a date"), None);
    }
}
