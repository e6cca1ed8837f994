use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::common::{Error, Page};

/// Bill model - SQL persistence layer
///
/// One row per unique (congress_number, bill_type, bill_number) triple,
/// enforced by the `unique_bill` constraint. `status` is computed once at
/// ingestion from the latest action text.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: i32,
    pub congress_number: i32,
    pub bill_type: String,
    pub bill_number: i32,
    pub title: String,
    pub short_title: Option<String>,
    pub introduced_date: Option<NaiveDate>,
    pub latest_action_date: Option<NaiveDate>,
    pub latest_action_text: Option<String>,
    pub sponsor_name: Option<String>,
    pub sponsor_party: Option<String>,
    pub sponsor_state: Option<String>,
    pub status: String,
    pub subjects: Vec<String>,
    pub congress_url: Option<String>,
    pub full_text_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a new bill row; the surrogate id and timestamps are assigned
/// by the database at insert.
#[derive(Debug, Clone)]
pub struct NewBill {
    pub congress_number: i32,
    pub bill_type: String,
    pub bill_number: i32,
    pub title: String,
    pub short_title: Option<String>,
    pub introduced_date: Option<NaiveDate>,
    pub latest_action_date: Option<NaiveDate>,
    pub latest_action_text: Option<String>,
    pub sponsor_name: Option<String>,
    pub sponsor_party: Option<String>,
    pub sponsor_state: Option<String>,
    pub status: String,
    pub subjects: Vec<String>,
    pub congress_url: Option<String>,
    pub full_text_url: Option<String>,
}

/// Filter for the read/query/search paths. All predicates are optional and
/// combine with AND.
#[derive(Debug, Default, Clone)]
pub struct BillFilter {
    /// Case-insensitive substring over title, short_title and sponsor_name
    pub query: Option<String>,
    /// Exact status label match
    pub status: Option<String>,
    /// Introduced on or after this date
    pub introduced_from: Option<NaiveDate>,
    /// Introduced on or before this date
    pub introduced_to: Option<NaiveDate>,
}

// Single predicate shared by the page query and the count query so the
// total always reflects the same filter as the returned page.
const FILTER_WHERE: &str = "($1::text IS NULL OR status = $1)
       AND ($2::text IS NULL OR (
              title ILIKE '%' || $2 || '%'
              OR short_title ILIKE '%' || $2 || '%'
              OR sponsor_name ILIKE '%' || $2 || '%'))
       AND ($3::date IS NULL OR introduced_date >= $3)
       AND ($4::date IS NULL OR introduced_date <= $4)";

impl Bill {
    /// Find bill by surrogate id
    pub async fn find_by_id(id: i32, pool: &PgPool) -> Result<Option<Self>, Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM bills WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Equality lookup on the identity triple, used for idempotent ingestion
    pub async fn exists(
        congress_number: i32,
        bill_type: &str,
        bill_number: i32,
        pool: &PgPool,
    ) -> Result<bool, Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM bills
                WHERE congress_number = $1 AND bill_type = $2 AND bill_number = $3
             )",
        )
        .bind(congress_number)
        .bind(bill_type)
        .bind(bill_number)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Insert a new bill row.
    ///
    /// A unique-constraint rejection maps to `Error::DuplicateBill` so a
    /// race between concurrent sync runs surfaces as a reportable per-item
    /// error instead of aborting the batch.
    pub async fn insert(new_bill: &NewBill, pool: &PgPool) -> Result<Self, Error> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO bills (
                congress_number,
                bill_type,
                bill_number,
                title,
                short_title,
                introduced_date,
                latest_action_date,
                latest_action_text,
                sponsor_name,
                sponsor_party,
                sponsor_state,
                status,
                subjects,
                congress_url,
                full_text_url
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING *",
        )
        .bind(new_bill.congress_number)
        .bind(&new_bill.bill_type)
        .bind(new_bill.bill_number)
        .bind(&new_bill.title)
        .bind(&new_bill.short_title)
        .bind(new_bill.introduced_date)
        .bind(new_bill.latest_action_date)
        .bind(&new_bill.latest_action_text)
        .bind(&new_bill.sponsor_name)
        .bind(&new_bill.sponsor_party)
        .bind(&new_bill.sponsor_state)
        .bind(&new_bill.status)
        .bind(&new_bill.subjects)
        .bind(&new_bill.congress_url)
        .bind(&new_bill.full_text_url)
        .fetch_one(pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.constraint() == Some("unique_bill") => {
                Error::DuplicateBill {
                    congress: new_bill.congress_number,
                    bill_type: new_bill.bill_type.clone(),
                    bill_number: new_bill.bill_number,
                }
            }
            _ => e.into(),
        })
    }

    /// Most recently ingested bills, used as the backfill candidate list
    pub async fn find_recent(limit: i64, pool: &PgPool) -> Result<Vec<Self>, Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM bills ORDER BY created_at DESC, id DESC LIMIT $1")
            .bind(limit)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Filtered, paginated query ordered by introduced_date descending.
    ///
    /// Returns the page of bills plus the total count matching the filter.
    pub async fn search(
        filter: &BillFilter,
        page: &Page,
        pool: &PgPool,
    ) -> Result<(Vec<Self>, i64), Error> {
        let page_sql = format!(
            "SELECT * FROM bills
             WHERE {FILTER_WHERE}
             ORDER BY introduced_date DESC NULLS LAST
             LIMIT $5 OFFSET $6"
        );
        let bills = sqlx::query_as::<_, Self>(&page_sql)
            .bind(&filter.status)
            .bind(&filter.query)
            .bind(filter.introduced_from)
            .bind(filter.introduced_to)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM bills WHERE {FILTER_WHERE}");
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(&filter.status)
            .bind(&filter.query)
            .bind(filter.introduced_from)
            .bind(filter.introduced_to)
            .fetch_one(pool)
            .await?;

        Ok((bills, total))
    }
}
