use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod job;

pub use job::{
    format_posting_date, JobId, JobIdError, JobPayload, JobRecord, POSTING_DATE_FORMAT,
};

/// Error response for API endpoints
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}
