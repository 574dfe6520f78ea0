//! Competitions and mock-test results.

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use techlearns_core::SessionContext;
use techlearns_core::competition::{Competition, upcoming_internal};
use techlearns_core::mock_test::MockTestResult;

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::require_token;

pub const COMPETITIONS_PATH: &str = "/api/competitions?type=internal";
pub const MY_RESULTS_PATH: &str = "/api/mock-tests/my-results";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListEnvelope<T> {
    Competitions { competitions: Vec<T> },
    Results { results: Vec<T> },
    Bare(Vec<T>),
}

impl ListEnvelope<Value> {
    /// Decode each entry on its own; entries that do not fit `T` are dropped.
    fn decode_entries<T: DeserializeOwned>(self, kind: &str) -> Vec<T> {
        let items = match self {
            Self::Competitions { competitions } => competitions,
            Self::Results { results } => results,
            Self::Bare(items) => items,
        };
        let total = items.len();
        let decoded: Vec<T> = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!("skipping malformed {} entry: {}", kind, e);
                    None
                }
            })
            .collect();
        if decoded.len() < total {
            let dropped = total - decoded.len();
            tracing::debug!("dropped {} of {} {} entries", dropped, total, kind);
        }
        decoded
    }
}

/// Client for the dashboard widgets.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    api: ApiClient,
}

impl DashboardClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Internal competitions still open at `now`.
    ///
    /// The query already asks for internal entries; the filter is applied
    /// again locally together with the end-date check.
    pub async fn competitions(
        &self,
        session: &SessionContext,
        now: DateTime<Utc>,
    ) -> ClientResult<Vec<Competition>> {
        let request = self.api.request(Method::GET, COMPETITIONS_PATH, session.token());
        let envelope: ListEnvelope<Value> = self.api.send_json(request).await?;
        let all: Vec<Competition> = envelope.decode_entries("competition");
        let open: Vec<Competition> = upcoming_internal(&all, now).into_iter().cloned().collect();
        tracing::debug!("{} of {} competitions open", open.len(), all.len());
        Ok(open)
    }

    /// The logged-in learner's mock-test attempts.
    pub async fn my_results(&self, session: &SessionContext) -> ClientResult<Vec<MockTestResult>> {
        let token = require_token(session)?;
        let request = self.api.request(Method::GET, MY_RESULTS_PATH, Some(token));
        let envelope: ListEnvelope<Value> = self.api.send_json(request).await?;
        Ok(envelope.decode_entries("mock-test result"))
    }
}
