//! Summary document types.
//!
//! The document is stored wholesale as JSON keyed by bill id; field names
//! are camelCase on the wire and in the stored document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version of the prompt template that produced a summary.
pub const PROMPT_VERSION: &str = "1.0";

/// Shape the model is asked to return. Unknown fields are ignored; missing
/// or ill-typed fields fail validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSummary {
    pub one_liner: String,
    pub short_summary: String,
    pub detailed_summary: String,
    pub key_points: Vec<String>,
    pub who_affected: Vec<String>,
    pub potential_effects: Vec<String>,
    pub bipartisan_support: bool,
}

/// Full stored document for one bill's summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDocument {
    pub bill_id: i32,
    pub congress_bill_id: String,
    pub generated_at: DateTime<Utc>,
    pub model_used: String,
    pub prompt_version: String,
    pub summary: SummaryBody,
    pub metadata: SummaryMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryBody {
    pub one_liner: String,
    pub short_summary: String,
    pub detailed_summary: String,
    pub key_points: Vec<String>,
    pub impact: Impact,
    pub political_context: PoliticalContext,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Impact {
    pub who_affected: Vec<String>,
    pub potential_effects: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoliticalContext {
    pub bipartisan_support: bool,
    pub related_bills: Vec<String>,
    pub controversial_aspects: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetadata {
    pub processing_time_ms: u64,
    pub token_count: i64,
    pub cost: f64,
}

impl SummaryDocument {
    /// Assemble the stored document from a generation result. relatedBills
    /// and controversialAspects are not populated by the generation path;
    /// tokenCount and cost are likewise always zero.
    pub fn new(
        bill_id: i32,
        congress_bill_id: &str,
        summary: GeneratedSummary,
        model_used: &str,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            bill_id,
            congress_bill_id: congress_bill_id.to_string(),
            generated_at: Utc::now(),
            model_used: model_used.to_string(),
            prompt_version: PROMPT_VERSION.to_string(),
            summary: SummaryBody {
                one_liner: summary.one_liner,
                short_summary: summary.short_summary,
                detailed_summary: summary.detailed_summary,
                key_points: summary.key_points,
                impact: Impact {
                    who_affected: summary.who_affected,
                    potential_effects: summary.potential_effects,
                },
                political_context: PoliticalContext {
                    bipartisan_support: summary.bipartisan_support,
                    related_bills: Vec::new(),
                    controversial_aspects: Vec::new(),
                },
            },
            metadata: SummaryMetadata {
                processing_time_ms,
                token_count: 0,
                cost: 0.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_summary() -> GeneratedSummary {
        GeneratedSummary {
            one_liner: "Funds rural broadband.".to_string(),
            short_summary: "Expands grants for rural broadband deployment.".to_string(),
            detailed_summary: "The bill establishes a grant program...".to_string(),
            key_points: vec!["Creates a grant program".to_string()],
            who_affected: vec!["Rural residents".to_string()],
            potential_effects: vec!["Faster internet access".to_string()],
            bipartisan_support: true,
        }
    }

    #[test]
    fn test_document_assembly() {
        let doc = SummaryDocument::new(7, "119-hr-4821", sample_summary(), "test-model", 1200);
        assert_eq!(doc.bill_id, 7);
        assert_eq!(doc.congress_bill_id, "119-hr-4821");
        assert_eq!(doc.prompt_version, PROMPT_VERSION);
        assert!(doc.summary.political_context.related_bills.is_empty());
        assert!(doc.summary.political_context.controversial_aspects.is_empty());
        assert_eq!(doc.metadata.token_count, 0);
        assert_eq!(doc.metadata.cost, 0.0);
        assert_eq!(doc.metadata.processing_time_ms, 1200);
    }

    #[test]
    fn test_document_round_trips_camel_case() {
        let doc = SummaryDocument::new(7, "119-hr-4821", sample_summary(), "test-model", 5);
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.pointer("/summary/oneLiner").is_some());
        assert!(json.pointer("/summary/impact/whoAffected").is_some());
        assert!(json
            .pointer("/summary/politicalContext/bipartisanSupport")
            .is_some());
        assert!(json.pointer("/metadata/processingTimeMs").is_some());
    }
}
