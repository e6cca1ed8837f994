// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic. The sync
// orchestrator and summary generator run against these seams so tests can
// substitute mocks for the remote services.
//
// Naming convention: Base* for trait names (e.g., BaseBillSource)

use async_trait::async_trait;

use super::congress_client::{BillDetail, BillStub};
use crate::common::Error;

// =============================================================================
// Bill Source Trait (Infrastructure - legislative data service)
// =============================================================================

#[async_trait]
pub trait BaseBillSource: Send + Sync {
    /// Recent bill stubs for a congress session, upstream order preserved
    async fn fetch_recent_bills(&self, congress: i32, limit: i64) -> Result<Vec<BillStub>, Error>;

    /// Full detail record, or None when upstream reports not-found
    async fn fetch_bill_details(
        &self,
        congress: i32,
        bill_type: &str,
        bill_number: i32,
    ) -> Result<Option<BillDetail>, Error>;

    /// Plain text of the most recent rendition, or None when no text exists
    /// or retrieval fails
    async fn fetch_bill_text(
        &self,
        congress: i32,
        bill_type: &str,
        bill_number: i32,
    ) -> Result<Option<String>, Error>;

    /// Subject labels; empty on any upstream failure
    async fn fetch_bill_subjects(
        &self,
        congress: i32,
        bill_type: &str,
        bill_number: i32,
    ) -> Result<Vec<String>, Error>;
}

// =============================================================================
// Summary Model Trait (Infrastructure - LLM completion)
// =============================================================================

#[async_trait]
pub trait BaseSummaryModel: Send + Sync {
    /// Identifier recorded as `modelUsed` on generated summaries
    fn model_id(&self) -> &str;

    /// Complete a prompt, returning the raw text response
    async fn complete(&self, prompt: &str) -> Result<String, Error>;
}
