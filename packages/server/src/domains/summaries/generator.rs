//! Plain-language summary generation with provider fallback.
//!
//! Providers are an ordered list tried in sequence; the first success wins
//! and later providers are never invoked. A malformed response is not
//! retried against the same provider.

use std::sync::Arc;
use std::time::Instant;

use crate::common::Error;
use crate::kernel::BaseSummaryModel;

use super::models::GeneratedSummary;

/// Bill text beyond this many characters is truncated before prompting.
pub const MAX_BILL_TEXT_CHARS: usize = 50_000;

/// Appended when bill text is truncated.
pub const TRUNCATION_MARKER: &str = "\n\n[Text truncated...]";

/// Passed as bill text when no rendition could be fetched, so the model
/// bases its analysis on the title.
pub const TEXT_UNAVAILABLE_PLACEHOLDER: &str =
    "Full bill text not available. Please base analysis on the title.";

const EMPTY_TEXT_FALLBACK: &str = "Bill text not available.";

const PROMPT_TEMPLATE: &str = r#"You are an expert at analyzing US Congressional bills and explaining them in plain language that any citizen can understand. Your goal is to be informative, accurate, and unbiased.

Analyze the following bill and provide a comprehensive summary:

BILL TITLE: {title}
BILL NUMBER: {billNumber}
INTRODUCED: {introducedDate}
SPONSOR: {sponsor}

FULL TEXT:
{billText}

Provide your analysis in JSON format with the following structure:
{
  "oneLiner": "A single sentence summary, max 280 characters",
  "shortSummary": "2-3 sentence summary suitable for a card display",
  "detailedSummary": "Full paragraph explanation of what the bill does",
  "keyPoints": ["3-5 key bullet points about the bill"],
  "whoAffected": ["Groups of people or entities impacted by this bill"],
  "potentialEffects": ["Likely outcomes if this bill becomes law"],
  "bipartisanSupport": true/false
}

Focus on:
1. What the bill actually does (not political spin)
2. Who would be affected and how
3. Key provisions in plain language
4. Potential real-world impacts

Be objective and avoid partisan language. If the bill text is truncated or unavailable, base your analysis on the title and any available context.

Respond ONLY with valid JSON, no additional text."#;

/// Bill fields substituted into the prompt template.
#[derive(Debug, Clone)]
pub struct BillInput {
    pub title: String,
    pub bill_number: String,
    pub introduced_date: String,
    pub sponsor: String,
    pub bill_text: String,
}

/// A validated summary plus which model produced it and how long it took.
#[derive(Debug, Clone)]
pub struct SummaryResult {
    pub summary: GeneratedSummary,
    pub model_used: String,
    pub processing_time_ms: u64,
}

/// Generates summaries by trying each configured provider in order.
pub struct SummaryGenerator {
    providers: Vec<Arc<dyn BaseSummaryModel>>,
}

impl SummaryGenerator {
    pub fn new(providers: Vec<Arc<dyn BaseSummaryModel>>) -> Self {
        Self { providers }
    }

    pub async fn generate(&self, input: BillInput) -> Result<SummaryResult, Error> {
        if self.providers.is_empty() {
            return Err(Error::NoProviderConfigured);
        }

        let prompt = build_prompt(&input);
        let mut last_error = String::new();

        for provider in &self.providers {
            let started = Instant::now();
            match attempt(provider.as_ref(), &prompt).await {
                Ok(summary) => {
                    let processing_time_ms = started.elapsed().as_millis() as u64;
                    tracing::info!(
                        model = provider.model_id(),
                        processing_time_ms,
                        "summary generated"
                    );
                    return Ok(SummaryResult {
                        summary,
                        model_used: provider.model_id().to_string(),
                        processing_time_ms,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        model = provider.model_id(),
                        error = %e,
                        "provider failed, falling through"
                    );
                    last_error = e.to_string();
                }
            }
        }

        Err(Error::GenerationFailed(last_error))
    }
}

/// One attempt against one provider: complete, extract the JSON object,
/// validate the shape. Any failure falls through to the next provider.
async fn attempt(
    provider: &dyn BaseSummaryModel,
    prompt: &str,
) -> Result<GeneratedSummary, Error> {
    let response = provider.complete(prompt).await?;

    let json = extract_json(&response).ok_or_else(|| {
        Error::Provider(format!(
            "no JSON object found in {} response",
            provider.model_id()
        ))
    })?;

    serde_json::from_str(json)
        .map_err(|e| Error::Provider(format!("invalid summary payload: {e}")))
}

fn build_prompt(input: &BillInput) -> String {
    PROMPT_TEMPLATE
        .replace("{title}", &input.title)
        .replace("{billNumber}", &input.bill_number)
        .replace("{introducedDate}", &input.introduced_date)
        .replace("{sponsor}", &input.sponsor)
        .replace("{billText}", &prepare_bill_text(&input.bill_text))
}

/// Cap the bill text at MAX_BILL_TEXT_CHARS characters, marking the cut;
/// substitute a fixed sentence when the text is empty.
fn prepare_bill_text(text: &str) -> String {
    if text.is_empty() {
        return EMPTY_TEXT_FALLBACK.to_string();
    }
    match text.char_indices().nth(MAX_BILL_TEXT_CHARS) {
        Some((byte_index, _)) => format!("{}{}", &text[..byte_index], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

/// Extract the first top-level JSON object from free-text model output.
/// Greedy: first `{` through last `}` — providers may wrap JSON in prose.
fn extract_json(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    (end >= start).then(|| &response[start..=end])
}
