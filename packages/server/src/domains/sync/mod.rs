// Sync domain: scheduled ingestion and summary backfill.

pub mod orchestrator;

pub use orchestrator::{
    BackfillReport, SyncReport, SyncService, CURRENT_CONGRESS, DEFAULT_BACKFILL_LIMIT,
    DEFAULT_SYNC_LIMIT,
};
