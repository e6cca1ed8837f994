//! Document store for AI-generated summaries.
//!
//! Summaries live in a schemaless JSONB table keyed by bill id, written
//! with full-replace semantics — a regeneration overwrites the whole
//! document, never merges fields.

use std::collections::HashMap;

use sqlx::types::Json;
use sqlx::PgPool;

use crate::common::Error;

use super::models::{GeneratedSummary, SummaryDocument};

/// Result cap for full-text search.
const SEARCH_LIMIT: i64 = 50;

#[derive(Clone)]
pub struct SummaryStore {
    pool: PgPool,
}

impl SummaryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_bill_id(&self, bill_id: i32) -> Result<Option<SummaryDocument>, Error> {
        let row = sqlx::query_scalar::<_, Json<SummaryDocument>>(
            "SELECT document FROM bill_summaries WHERE bill_id = $1",
        )
        .bind(bill_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|Json(doc)| doc))
    }

    /// Summaries for the given bill ids. Ids without a stored summary are
    /// simply absent from the map.
    pub async fn get_for_bills(
        &self,
        bill_ids: &[i32],
    ) -> Result<HashMap<i32, SummaryDocument>, Error> {
        if bill_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_scalar::<_, Json<SummaryDocument>>(
            "SELECT document FROM bill_summaries WHERE bill_id = ANY($1)",
        )
        .bind(bill_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|Json(doc)| (doc.bill_id, doc))
            .collect())
    }

    /// Create or wholesale-replace the summary document for a bill.
    pub async fn upsert(
        &self,
        bill_id: i32,
        congress_bill_id: &str,
        summary: GeneratedSummary,
        model_used: &str,
        processing_time_ms: u64,
    ) -> Result<(), Error> {
        let document = SummaryDocument::new(
            bill_id,
            congress_bill_id,
            summary,
            model_used,
            processing_time_ms,
        );

        sqlx::query(
            "INSERT INTO bill_summaries (bill_id, document)
             VALUES ($1, $2)
             ON CONFLICT (bill_id) DO UPDATE SET document = EXCLUDED.document",
        )
        .bind(bill_id)
        .bind(Json(&document))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete(&self, bill_id: i32) -> Result<(), Error> {
        sqlx::query("DELETE FROM bill_summaries WHERE bill_id = $1")
            .bind(bill_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Full-text search over the indexed summary fields, capped at 50
    /// results in the store's native rank order.
    pub async fn search(&self, query: &str) -> Result<Vec<SummaryDocument>, Error> {
        let rows = sqlx::query_scalar::<_, Json<SummaryDocument>>(
            "SELECT document FROM bill_summaries
             WHERE search_text @@ plainto_tsquery('english', $1)
             ORDER BY ts_rank(search_text, plainto_tsquery('english', $1)) DESC
             LIMIT $2",
        )
        .bind(query)
        .bind(SEARCH_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|Json(doc)| doc).collect())
    }
}
