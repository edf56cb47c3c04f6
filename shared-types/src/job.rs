use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

/// Textual form of `Job Posting Date` on the wire
pub const POSTING_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Server-assigned job identifier.
///
/// This is the only identifier the client addresses jobs by. `Job URL` is
/// data, never a key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct JobId(pub i64);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobIdError {
    #[error("Job identifier is empty")]
    Empty,

    #[error("Invalid job identifier: {0}")]
    Invalid(String),
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = JobIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(JobIdError::Empty);
        }
        if !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(JobIdError::Invalid(trimmed.to_string()));
        }
        trimmed
            .parse::<i64>()
            .map(JobId)
            .map_err(|_| JobIdError::Invalid(trimmed.to_string()))
    }
}

/// A job listing as returned by the jobs API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct JobRecord {
    pub id: JobId,
    #[serde(rename = "Job Title")]
    pub title: Option<String>,
    #[serde(rename = "Company URL")]
    pub company_url: Option<String>,
    #[serde(rename = "Job URL")]
    pub job_url: Option<String>,
    #[serde(rename = "Job Posting Date")]
    pub posting_date: Option<String>,
}

/// Body of a create (POST) or update (PUT) request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct JobPayload {
    #[serde(rename = "Job Title")]
    pub title: String,
    #[serde(rename = "Company URL")]
    pub company_url: String,
    #[serde(rename = "Job URL")]
    pub job_url: String,
    /// Omitted entirely when the form left the date blank
    #[serde(
        rename = "Job Posting Date",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    #[ts(optional)]
    pub posting_date: Option<String>,
}

impl JobPayload {
    pub fn with_posting_date(mut self, posted_at: Option<NaiveDateTime>) -> Self {
        self.posting_date = posted_at.map(|dt| format_posting_date(&dt));
        self
    }
}

pub fn format_posting_date(dt: &NaiveDateTime) -> String {
    dt.format(POSTING_DATE_FORMAT).to_string()
}
