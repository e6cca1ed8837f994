// Mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::congress_client::{BillDetail, BillStub, LatestAction, SponsorRef};
use super::traits::{BaseBillSource, BaseSummaryModel};
use crate::common::Error;

// =============================================================================
// Mock Bill Source
// =============================================================================

fn key(congress: i32, bill_type: &str, bill_number: i32) -> String {
    format!("{}-{}-{}", congress, bill_type.to_lowercase(), bill_number)
}

/// Configurable in-memory BaseBillSource with call recording.
#[derive(Default)]
pub struct MockBillSource {
    bills: Mutex<Vec<BillStub>>,
    details: Mutex<HashMap<String, BillDetail>>,
    texts: Mutex<HashMap<String, String>>,
    text_failures: Mutex<HashSet<String>>,
    subjects: Mutex<HashMap<String, Vec<String>>>,
    text_calls: Mutex<Vec<String>>,
}

impl MockBillSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a bill stub returned by fetch_recent_bills, with matching
    /// default details so a sync run can ingest it.
    pub fn with_bill(self, congress: i32, bill_type: &str, number: i32, action_text: &str) -> Self {
        let stub = BillStub {
            congress,
            bill_type: bill_type.to_string(),
            number,
            title: format!("{} {} Act", bill_type.to_uppercase(), number),
            latest_action: Some(LatestAction {
                action_date: Some("2025-07-21".to_string()),
                text: Some(action_text.to_string()),
            }),
            url: Some(format!(
                "https://api.congress.gov/v3/bill/{congress}/{}/{number}",
                bill_type.to_lowercase()
            )),
        };
        let detail = BillDetail {
            title: Some(format!("{} {} Act", bill_type.to_uppercase(), number)),
            introduced_date: Some("2025-07-01".to_string()),
            sponsors: vec![SponsorRef {
                full_name: Some("Rep. Jordan Example [D-MN-5]".to_string()),
                party: Some("D".to_string()),
                state: Some("MN".to_string()),
            }],
        };
        self.bills.lock().unwrap().push(stub);
        self.details
            .lock()
            .unwrap()
            .insert(key(congress, bill_type, number), detail);
        self
    }

    /// Queue a stub whose detail fetch reports not-found.
    pub fn with_unresolvable_bill(
        self,
        congress: i32,
        bill_type: &str,
        number: i32,
        action_text: &str,
    ) -> Self {
        let this = self.with_bill(congress, bill_type, number, action_text);
        this.details
            .lock()
            .unwrap()
            .remove(&key(congress, bill_type, number));
        this
    }

    pub fn with_text(self, congress: i32, bill_type: &str, number: i32, text: &str) -> Self {
        self.texts
            .lock()
            .unwrap()
            .insert(key(congress, bill_type, number), text.to_string());
        self
    }

    /// Make the text fetch for one bill fail with an upstream error.
    pub fn with_text_failure(self, congress: i32, bill_type: &str, number: i32) -> Self {
        self.text_failures
            .lock()
            .unwrap()
            .insert(key(congress, bill_type, number));
        self
    }

    pub fn with_subjects(
        self,
        congress: i32,
        bill_type: &str,
        number: i32,
        subjects: Vec<&str>,
    ) -> Self {
        self.subjects.lock().unwrap().insert(
            key(congress, bill_type, number),
            subjects.into_iter().map(String::from).collect(),
        );
        self
    }

    /// Bills whose text was requested.
    pub fn text_calls(&self) -> Vec<String> {
        self.text_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseBillSource for MockBillSource {
    async fn fetch_recent_bills(
        &self,
        _congress: i32,
        limit: i64,
    ) -> Result<Vec<BillStub>, Error> {
        let bills = self.bills.lock().unwrap();
        Ok(bills.iter().take(limit as usize).cloned().collect())
    }

    async fn fetch_bill_details(
        &self,
        congress: i32,
        bill_type: &str,
        bill_number: i32,
    ) -> Result<Option<BillDetail>, Error> {
        let details = self.details.lock().unwrap();
        Ok(details.get(&key(congress, bill_type, bill_number)).cloned())
    }

    async fn fetch_bill_text(
        &self,
        congress: i32,
        bill_type: &str,
        bill_number: i32,
    ) -> Result<Option<String>, Error> {
        let k = key(congress, bill_type, bill_number);
        self.text_calls.lock().unwrap().push(k.clone());

        if self.text_failures.lock().unwrap().contains(&k) {
            return Err(Error::Upstream {
                status: 502,
                body: "mock text fetch failure".to_string(),
            });
        }
        Ok(self.texts.lock().unwrap().get(&k).cloned())
    }

    async fn fetch_bill_subjects(
        &self,
        congress: i32,
        bill_type: &str,
        bill_number: i32,
    ) -> Result<Vec<String>, Error> {
        let subjects = self.subjects.lock().unwrap();
        Ok(subjects
            .get(&key(congress, bill_type, bill_number))
            .cloned()
            .unwrap_or_default())
    }
}

// =============================================================================
// Mock Summary Model
// =============================================================================

/// Canned valid payload used when no response is queued.
const DEFAULT_PAYLOAD: &str = r#"{
    "oneLiner": "Mock one-liner summary.",
    "shortSummary": "Mock short summary of the bill.",
    "detailedSummary": "Mock detailed summary describing what the bill does.",
    "keyPoints": ["Mock key point"],
    "whoAffected": ["Mock constituency"],
    "potentialEffects": ["Mock effect"],
    "bipartisanSupport": false
}"#;

enum MockCompletion {
    Respond(String),
    Fail(String),
}

/// BaseSummaryModel that replays queued responses and counts calls.
///
/// With an empty queue it returns a canned valid payload, so orchestrator
/// tests work without per-test setup.
pub struct MockSummaryModel {
    id: String,
    completions: Mutex<VecDeque<MockCompletion>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockSummaryModel {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            completions: Mutex::new(VecDeque::new()),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_response(self, response: &str) -> Self {
        self.completions
            .lock()
            .unwrap()
            .push_back(MockCompletion::Respond(response.to_string()));
        self
    }

    pub fn with_failure(self, message: &str) -> Self {
        self.completions
            .lock()
            .unwrap()
            .push_back(MockCompletion::Fail(message.to_string()));
        self
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl BaseSummaryModel for MockSummaryModel {
    fn model_id(&self) -> &str {
        &self.id
    }

    async fn complete(&self, _prompt: &str) -> Result<String, Error> {
        *self.call_count.lock().unwrap() += 1;

        match self.completions.lock().unwrap().pop_front() {
            Some(MockCompletion::Respond(r)) => Ok(r),
            Some(MockCompletion::Fail(m)) => Err(Error::Provider(m)),
            None => Ok(DEFAULT_PAYLOAD.to_string()),
        }
    }
}
