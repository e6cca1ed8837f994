// Summaries domain: AI generation and the summary document store.

pub mod generator;
pub mod models;
pub mod store;

pub use generator::{
    BillInput, SummaryGenerator, SummaryResult, MAX_BILL_TEXT_CHARS, TEXT_UNAVAILABLE_PLACEHOLDER,
    TRUNCATION_MARKER,
};
pub use models::{GeneratedSummary, SummaryBody, SummaryDocument, PROMPT_VERSION};
pub use store::SummaryStore;
