//! End-to-end sync and backfill runs with a mock bill source and mock
//! providers over a real Postgres.
//!
//! Tests use distinct congress numbers so the shared database never causes
//! cross-test interference.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{deps_with, isolated_pool, sample_bill, test_pool};
use server_core::domains::bills::Bill;
use server_core::domains::sync::SyncService;
use server_core::kernel::{BaseSummaryModel, MockBillSource, MockSummaryModel};

fn service(deps: Arc<server_core::kernel::ServerDeps>) -> SyncService {
    SyncService::with_delays(deps, Duration::ZERO, Duration::ZERO)
}

#[tokio::test]
async fn test_sync_ingests_new_bill_with_committee_status() {
    let pool = test_pool().await;

    // Text fetch fails: the summary must still be generated from the
    // title-only placeholder.
    let source = Arc::new(
        MockBillSource::new()
            .with_bill(119, "hr", 4821, "Referred to the Committee on Ways and Means.")
            .with_text_failure(119, "hr", 4821)
            .with_subjects(119, "hr", 4821, vec!["Taxation", "Commerce"]),
    );
    let model = Arc::new(MockSummaryModel::new("mock-model"));
    let providers: Vec<Arc<dyn BaseSummaryModel>> = vec![model.clone()];

    let deps = deps_with(pool.clone(), source.clone(), providers);
    let report = service(deps.clone()).run_sync(50).await.unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(report.skipped, 0);
    assert!(report.errors.is_empty());

    let bill = Bill::find_by_id(
        sqlx::query_scalar::<_, i32>(
            "SELECT id FROM bills WHERE congress_number = 119 AND bill_type = 'hr' AND bill_number = 4821",
        )
        .fetch_one(&pool)
        .await
        .unwrap(),
        &pool,
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(bill.status, "In Committee");
    assert_eq!(bill.subjects, vec!["Taxation", "Commerce"]);
    assert_eq!(bill.sponsor_party.as_deref(), Some("D"));

    // Text was attempted, and the failure still produced a summary
    assert_eq!(source.text_calls(), vec!["119-hr-4821".to_string()]);
    assert_eq!(model.call_count(), 1);
    let doc = deps.summaries.get_by_bill_id(bill.id).await.unwrap().unwrap();
    assert_eq!(doc.congress_bill_id, "119-hr-4821");
    assert_eq!(doc.model_used, "mock-model");
}

#[tokio::test]
async fn test_sync_skips_already_ingested_bills() {
    let pool = test_pool().await;

    Bill::insert(&sample_bill(921, "hr", 5), &pool).await.unwrap();

    let source = Arc::new(MockBillSource::new().with_bill(
        921,
        "hr",
        5,
        "Referred to the Committee on Rules.",
    ));
    let model = Arc::new(MockSummaryModel::new("mock-model"));
    let providers: Vec<Arc<dyn BaseSummaryModel>> = vec![model.clone()];

    let deps = deps_with(pool, source, providers);
    let report = service(deps).run_sync(50).await.unwrap();

    assert_eq!(report.processed, 0);
    assert_eq!(report.skipped, 1);
    assert!(report.errors.is_empty());
    // No provider call for a skipped bill
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn test_sync_records_error_when_details_unavailable() {
    let pool = test_pool().await;

    let source = Arc::new(MockBillSource::new().with_unresolvable_bill(
        922,
        "s",
        9,
        "Introduced in Senate",
    ));
    let providers: Vec<Arc<dyn BaseSummaryModel>> = vec![Arc::new(MockSummaryModel::new("m"))];

    let deps = deps_with(pool.clone(), source, providers);
    let report = service(deps).run_sync(50).await.unwrap();

    assert_eq!(report.processed, 0);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("Could not fetch details for s9"));
    assert!(!Bill::exists(922, "s", 9, &pool).await.unwrap());
}

#[tokio::test]
async fn test_sync_keeps_bill_when_summary_generation_fails() {
    let pool = test_pool().await;

    let source = Arc::new(
        MockBillSource::new()
            .with_bill(923, "hr", 12, "Introduced in House")
            .with_text(923, "hr", 12, "SECTION 1. SHORT TITLE."),
    );
    // Malformed output and no fallback: generation fails, bill stays.
    let model = Arc::new(MockSummaryModel::new("mock-model").with_response("no json here"));
    let providers: Vec<Arc<dyn BaseSummaryModel>> = vec![model.clone()];

    let deps = deps_with(pool.clone(), source, providers);
    let report = service(deps.clone()).run_sync(50).await.unwrap();

    // Generation failure is non-fatal for the sync item
    assert_eq!(report.processed, 1);
    assert!(report.errors.is_empty());

    let id = sqlx::query_scalar::<_, i32>(
        "SELECT id FROM bills WHERE congress_number = 923 AND bill_type = 'hr' AND bill_number = 12",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(deps.summaries.get_by_bill_id(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_backfill_generates_missing_summary() {
    let pool = isolated_pool("backfill_generates").await;

    let bill = Bill::insert(&sample_bill(924, "hr", 31), &pool).await.unwrap();

    let source = Arc::new(MockBillSource::new().with_text(
        924,
        "hr",
        31,
        "SEC. 2. DEFINITIONS.",
    ));
    let model = Arc::new(MockSummaryModel::new("mock-model"));
    let providers: Vec<Arc<dyn BaseSummaryModel>> = vec![model.clone()];

    let deps = deps_with(pool, source, providers);
    let report = service(deps.clone()).run_backfill(10).await.unwrap();

    assert_eq!(report.checked, 1);
    assert_eq!(report.generated, 1);
    assert_eq!(report.skipped, 0);
    assert!(report.errors.is_empty());
    assert_eq!(model.call_count(), 1);

    let doc = deps.summaries.get_by_bill_id(bill.id).await.unwrap().unwrap();
    assert_eq!(doc.congress_bill_id, "924-hr-31");
    assert_eq!(doc.model_used, "mock-model");
}

#[tokio::test]
async fn test_backfill_skips_bill_with_existing_summary() {
    let pool = isolated_pool("backfill_skips").await;

    let bill = Bill::insert(&sample_bill(925, "hr", 40), &pool).await.unwrap();

    let model = Arc::new(MockSummaryModel::new("mock-model"));
    let providers: Vec<Arc<dyn BaseSummaryModel>> = vec![model.clone()];
    let source = Arc::new(MockBillSource::new());
    let deps = deps_with(pool, source.clone(), providers);

    // Seed an existing summary directly through the store
    deps.summaries
        .upsert(
            bill.id,
            "925-hr-40",
            server_core::domains::summaries::GeneratedSummary {
                one_liner: "Existing summary.".to_string(),
                short_summary: "Already generated.".to_string(),
                detailed_summary: "This summary was generated on a previous run.".to_string(),
                key_points: vec![],
                who_affected: vec![],
                potential_effects: vec![],
                bipartisan_support: false,
            },
            "earlier-model",
            7,
        )
        .await
        .unwrap();

    let report = service(deps.clone()).run_backfill(10).await.unwrap();

    assert_eq!(report.checked, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.generated, 0);
    // No provider call and no text fetch for the already-summarized bill
    assert_eq!(model.call_count(), 0);
    assert!(source.text_calls().is_empty());
    // Document untouched
    let doc = deps.summaries.get_by_bill_id(bill.id).await.unwrap().unwrap();
    assert_eq!(doc.model_used, "earlier-model");
}

#[tokio::test]
async fn test_backfill_reports_error_on_malformed_output_without_fallback() {
    let pool = isolated_pool("backfill_malformed").await;

    let bill = Bill::insert(&sample_bill(926, "hr", 50), &pool).await.unwrap();

    let source = Arc::new(MockBillSource::new());
    let model = Arc::new(MockSummaryModel::new("mock-model").with_response("I refuse."));
    let providers: Vec<Arc<dyn BaseSummaryModel>> = vec![model];

    let deps = deps_with(pool.clone(), source, providers);
    let report = service(deps.clone()).run_backfill(10).await.unwrap();

    assert_eq!(report.checked, 1);
    assert_eq!(report.generated, 0);
    assert_eq!(report.errors.len(), 1);
    assert!(report
        .errors
        .iter()
        .any(|e| e.contains(&format!("Bill {}", bill.id))));
    // Bill row still present, still without a summary
    assert!(Bill::find_by_id(bill.id, &pool).await.unwrap().is_some());
    assert!(deps.summaries.get_by_bill_id(bill.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_sync_fallback_model_recorded_on_summary() {
    let pool = test_pool().await;

    let source = Arc::new(
        MockBillSource::new()
            .with_bill(927, "hr", 61, "Passed House.")
            .with_text(927, "hr", 61, "SEC. 1."),
    );
    let primary = Arc::new(MockSummaryModel::new("primary").with_failure("over capacity"));
    let fallback = Arc::new(MockSummaryModel::new("fallback"));
    let providers: Vec<Arc<dyn BaseSummaryModel>> = vec![primary.clone(), fallback.clone()];

    let deps = deps_with(pool.clone(), source, providers);
    let report = service(deps.clone()).run_sync(50).await.unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(primary.call_count(), 1);
    assert_eq!(fallback.call_count(), 1);

    let id = sqlx::query_scalar::<_, i32>(
        "SELECT id FROM bills WHERE congress_number = 927 AND bill_type = 'hr' AND bill_number = 61",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    let doc = deps.summaries.get_by_bill_id(id).await.unwrap().unwrap();
    assert_eq!(doc.model_used, "fallback");

    let bill = Bill::find_by_id(id, &pool).await.unwrap().unwrap();
    assert_eq!(bill.status, "Passed House");
}
