pub mod bills;
pub mod cron;
pub mod health;

pub use bills::{get_bill_handler, list_bills_handler, search_bills_handler};
pub use cron::{backfill_summaries_handler, sync_bills_handler};
pub use health::health_handler;
