//! congress.gov v3 API client.
//!
//! Wraps the remote legislative-data service behind typed operations. All
//! not-found responses are modeled as absent results, never as errors.

use std::time::Duration;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use super::traits::BaseBillSource;
use crate::common::Error;

const BASE_URL: &str = "https://api.congress.gov/v3";

/// Bill stub from the list endpoint, in upstream (most-recent-first) order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillStub {
    pub congress: i32,
    #[serde(rename = "type")]
    pub bill_type: String,
    pub number: i32,
    #[serde(default)]
    pub title: String,
    pub latest_action: Option<LatestAction>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestAction {
    pub action_date: Option<String>,
    pub text: Option<String>,
}

/// Full detail record for a single bill.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillDetail {
    pub title: Option<String>,
    pub introduced_date: Option<String>,
    #[serde(default)]
    pub sponsors: Vec<SponsorRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorRef {
    pub full_name: Option<String>,
    pub party: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BillListResponse {
    #[serde(default)]
    bills: Vec<BillStub>,
}

#[derive(Debug, Deserialize)]
struct BillDetailResponse {
    bill: Option<BillDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextVersionsResponse {
    #[serde(default)]
    text_versions: Vec<TextVersion>,
}

#[derive(Debug, Deserialize)]
struct TextVersion {
    #[serde(default)]
    formats: Vec<TextFormat>,
}

#[derive(Debug, Deserialize)]
struct TextFormat {
    #[serde(rename = "type")]
    format_type: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubjectsResponse {
    subjects: Option<SubjectsBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubjectsBody {
    #[serde(default)]
    legislative_subjects: Vec<Subject>,
}

#[derive(Debug, Deserialize)]
struct Subject {
    name: String,
}

/// congress.gov implementation of BaseBillSource
pub struct CongressClient {
    api_key: String,
    client: reqwest::Client,
}

impl CongressClient {
    /// Create a new client. Fails fast when the API key is missing, before
    /// any network call.
    pub fn new(api_key: String) -> Result<Self, Error> {
        if api_key.trim().is_empty() {
            return Err(Error::Configuration(
                "CONGRESS_API_KEY is not set".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { api_key, client })
    }

    /// GET a congress.gov endpoint. 404 maps to Ok(None); any other non-2xx
    /// maps to `Error::Upstream`.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &str,
    ) -> Result<Option<T>, Error> {
        let url = format!(
            "{BASE_URL}{path}?format=json{query}&api_key={}",
            self.api_key
        );
        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(Some(response.json().await?))
    }
}

#[async_trait]
impl BaseBillSource for CongressClient {
    async fn fetch_recent_bills(&self, congress: i32, limit: i64) -> Result<Vec<BillStub>, Error> {
        tracing::debug!(congress, limit, "fetching recent bills");

        let response: Option<BillListResponse> = self
            .get_json(&format!("/bill/{congress}"), &format!("&limit={limit}"))
            .await?;

        Ok(response.map(|r| r.bills).unwrap_or_default())
    }

    async fn fetch_bill_details(
        &self,
        congress: i32,
        bill_type: &str,
        bill_number: i32,
    ) -> Result<Option<BillDetail>, Error> {
        let path = format!("/bill/{congress}/{}/{bill_number}", bill_type.to_lowercase());
        let response: Option<BillDetailResponse> = self.get_json(&path, "").await?;

        Ok(response.and_then(|r| r.bill))
    }

    async fn fetch_bill_text(
        &self,
        congress: i32,
        bill_type: &str,
        bill_number: i32,
    ) -> Result<Option<String>, Error> {
        let path = format!(
            "/bill/{congress}/{}/{bill_number}/text",
            bill_type.to_lowercase()
        );
        let response: Option<TextVersionsResponse> = self.get_json(&path, "").await?;

        let versions = match response {
            Some(r) => r.text_versions,
            None => return Ok(None),
        };

        // The first version listed is the most recent. Prefer the formatted
        // rendition over plain text.
        let Some(latest) = versions.first() else {
            return Ok(None);
        };
        let format = latest
            .formats
            .iter()
            .find(|f| f.format_type == "Formatted Text")
            .or_else(|| latest.formats.iter().find(|f| f.format_type == "Plain Text"));
        let Some(format) = format else {
            return Ok(None);
        };
        let Some(url) = &format.url else {
            return Ok(None);
        };

        // Retrieval failure means "no text available", not an error.
        let text_response = match self.client.get(url).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                tracing::debug!(status = %r.status(), url, "bill text retrieval failed");
                return Ok(None);
            }
            Err(e) => {
                tracing::debug!(error = %e, url, "bill text retrieval failed");
                return Ok(None);
            }
        };
        let text = match text_response.text().await {
            Ok(t) => t,
            Err(_) => return Ok(None),
        };

        if format.format_type == "Formatted Text" {
            Ok(Some(clean_html_text(&text)))
        } else {
            Ok(Some(text))
        }
    }

    async fn fetch_bill_subjects(
        &self,
        congress: i32,
        bill_type: &str,
        bill_number: i32,
    ) -> Result<Vec<String>, Error> {
        let path = format!(
            "/bill/{congress}/{}/{bill_number}/subjects",
            bill_type.to_lowercase()
        );

        // Any upstream failure yields an empty list, never an error.
        let response: Option<SubjectsResponse> = match self.get_json(&path, "").await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(error = %e, "subject fetch failed");
                return Ok(Vec::new());
            }
        };

        Ok(response
            .and_then(|r| r.subjects)
            .map(|s| s.legislative_subjects.into_iter().map(|s| s.name).collect())
            .unwrap_or_default())
    }
}

lazy_static! {
    static ref STYLE_RE: Regex = Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap();
    static ref SCRIPT_RE: Regex = Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap();
    static ref TAG_RE: Regex = Regex::new(r"<[^>]+>").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// Strip a formatted-text rendition down to plain text: drop style/script
/// blocks, collapse tags to spaces, decode the five standard entities,
/// collapse whitespace.
fn clean_html_text(html: &str) -> String {
    let text = STYLE_RE.replace_all(html, "");
    let text = SCRIPT_RE.replace_all(&text, "");
    let text = TAG_RE.replace_all(&text, " ");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");
    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}
