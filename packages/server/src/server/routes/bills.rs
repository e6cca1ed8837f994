//! Bill read endpoints: list, search, detail.

use axum::extract::{Extension, Path, Query};
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{Error, Page, PageInfo};
use crate::domains::bills::{Bill, BillFilter};
use crate::domains::summaries::{SummaryBody, SummaryDocument};
use crate::server::app::AppState;

#[derive(Debug, Deserialize)]
pub struct ListBillsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchBillsQuery {
    pub q: Option<String>,
    pub status: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Abbreviated summary carried inline on list results.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCard {
    pub one_liner: String,
    pub short_summary: String,
}

impl From<&SummaryDocument> for SummaryCard {
    fn from(doc: &SummaryDocument) -> Self {
        SummaryCard {
            one_liner: doc.summary.one_liner.clone(),
            short_summary: doc.summary.short_summary.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BillWithSummary {
    #[serde(flatten)]
    pub bill: Bill,
    pub summary: Option<SummaryCard>,
}

#[derive(Debug, Serialize)]
pub struct BillsResponse {
    pub bills: Vec<BillWithSummary>,
    pub pagination: PageInfo,
}

/// Full summary payload on the detail endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDetail {
    #[serde(flatten)]
    pub summary: SummaryBody,
    pub generated_at: DateTime<Utc>,
    pub model_used: String,
}

#[derive(Debug, Serialize)]
pub struct BillDetailResponse {
    pub bill: Bill,
    pub summary: Option<SummaryDetail>,
}

async fn paginated_bills(
    state: &AppState,
    filter: BillFilter,
    page: Page,
) -> Result<BillsResponse, Error> {
    let (bills, total) = Bill::search(&filter, &page, &state.db_pool).await?;

    let bill_ids: Vec<i32> = bills.iter().map(|b| b.id).collect();
    let summaries = state.server_deps.summaries.get_for_bills(&bill_ids).await?;

    let pagination = PageInfo::new(&page, bills.len(), total);
    let bills = bills
        .into_iter()
        .map(|bill| {
            let summary = summaries.get(&bill.id).map(SummaryCard::from);
            BillWithSummary { bill, summary }
        })
        .collect();

    Ok(BillsResponse { bills, pagination })
}

/// GET /api/bills — paginated list, optionally filtered by status.
pub async fn list_bills_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<ListBillsQuery>,
) -> Result<Json<BillsResponse>, Error> {
    let filter = BillFilter {
        status: params.status,
        ..Default::default()
    };
    let page = Page::new(params.page, params.limit);

    Ok(Json(paginated_bills(&state, filter, page).await?))
}

/// GET /api/bills/search — free-text query plus status and date-range filters.
pub async fn search_bills_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<SearchBillsQuery>,
) -> Result<Json<BillsResponse>, Error> {
    let filter = BillFilter {
        query: params.q.filter(|q| !q.is_empty()),
        status: params.status,
        introduced_from: params.from,
        introduced_to: params.to,
    };
    let page = Page::new(params.page, params.limit);

    Ok(Json(paginated_bills(&state, filter, page).await?))
}

/// GET /api/bills/{id} — full bill plus full summary (or null).
pub async fn get_bill_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<BillDetailResponse>, Error> {
    let bill = Bill::find_by_id(id, &state.db_pool)
        .await?
        .ok_or(Error::BillNotFound(id))?;

    let summary = state
        .server_deps
        .summaries
        .get_by_bill_id(id)
        .await?
        .map(|doc| SummaryDetail {
            summary: doc.summary,
            generated_at: doc.generated_at,
            model_used: doc.model_used,
        });

    Ok(Json(BillDetailResponse { bill, summary }))
}
