//! Competitions listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a competition is hosted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionType {
    Internal,
    External,
    #[serde(other)]
    Other,
}

/// A competition as returned by `GET /api/competitions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub competition_type: CompetitionType,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub prize: Option<String>,
    #[serde(default)]
    pub registration_link: Option<String>,
}

impl Competition {
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.end_date >= now
    }

    /// Whole days left until the end date, zero once it has passed.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        (self.end_date - now).num_days().max(0)
    }
}

/// Internal competitions that have not ended yet, in server order.
pub fn upcoming_internal(competitions: &[Competition], now: DateTime<Utc>) -> Vec<&Competition> {
    competitions
        .iter()
        .filter(|c| c.competition_type == CompetitionType::Internal && c.is_open(now))
        .collect()
}
