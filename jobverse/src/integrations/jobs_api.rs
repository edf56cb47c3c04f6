use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::RequestBuilder;
use shared_types::{ErrorResponse, JobId, JobPayload, JobRecord};
use std::time::{Duration, Instant};
use url::Url;

use crate::config::DEFAULT_BASE_URL;

/// Listing filter. Only fields with content end up in the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub keyword: Option<String>,
    pub posted_after: Option<NaiveDate>,
}

impl JobFilter {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(keyword) = self
            .keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
        {
            pairs.push(("keyword", keyword.to_string()));
        }

        if let Some(date) = self.posted_after {
            pairs.push(("posted_after", date.format("%Y-%m-%d").to_string()));
        }

        pairs
    }

    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response. `message` is the server's `error` field when it sent one.
    #[error("{}", status_message(.status, .message))]
    Status { status: u16, message: Option<String> },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

fn status_message(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => message.clone(),
        None => format!("HTTP error! status: {}", status),
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

/// The four calls the front end makes against the jobs REST API.
///
/// Every call is exactly one request; nothing is retried or cached.
#[async_trait]
pub trait JobsApi: Send + Sync {
    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<JobRecord>, ApiError>;

    async fn get_job(&self, id: JobId) -> Result<JobRecord, ApiError>;

    /// POST when `id` is `None`, PUT otherwise. `None` back means the server
    /// sent no body, or one that is not a job record.
    async fn upsert_job(
        &self,
        id: Option<JobId>,
        payload: &JobPayload,
    ) -> Result<Option<JobRecord>, ApiError>;

    async fn delete_job(&self, id: JobId) -> Result<(), ApiError>;
}

pub struct HttpJobsApi {
    base_url: Url,
    http_client: reqwest::Client,
}

impl HttpJobsApi {
    pub fn builder() -> HttpJobsApiBuilder {
        HttpJobsApiBuilder::new()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn listing_url(&self, filter: &JobFilter) -> Url {
        listing_url(&self.base_url, filter)
    }

    pub fn item_url(&self, id: JobId) -> Url {
        item_url(&self.base_url, id)
    }

    async fn send(
        &self,
        request: RequestBuilder,
        label: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let start = Instant::now();
        let response = request.send().await.map_err(|e| {
            tracing::warn!("{} request failed: {}", label, e);
            ApiError::from(e)
        })?;

        let status = response.status();
        tracing::debug!(
            "{} response received in {:?}, status={}",
            label,
            start.elapsed(),
            status
        );

        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorResponse>()
            .await
            .ok()
            .map(|body| body.error)
            .filter(|error| !error.trim().is_empty());

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl JobsApi for HttpJobsApi {
    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<JobRecord>, ApiError> {
        let url = self.listing_url(filter);
        tracing::debug!("Listing jobs from {}", url);

        let response = self.send(self.http_client.get(url), "list_jobs").await?;
        Ok(response.json::<Vec<JobRecord>>().await?)
    }

    async fn get_job(&self, id: JobId) -> Result<JobRecord, ApiError> {
        let response = self
            .send(self.http_client.get(self.item_url(id)), "get_job")
            .await?;
        Ok(response.json::<JobRecord>().await?)
    }

    async fn upsert_job(
        &self,
        id: Option<JobId>,
        payload: &JobPayload,
    ) -> Result<Option<JobRecord>, ApiError> {
        let request = match id {
            Some(id) => self.http_client.put(self.item_url(id)),
            None => self.http_client.post(self.base_url.clone()),
        };

        let response = self.send(request.json(payload), "upsert_job").await?;
        let body = response.bytes().await?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        // 2xx means the job was saved whatever the body says
        match serde_json::from_slice::<JobRecord>(&body) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                tracing::warn!("upsert_job response is not a job record: {}", e);
                Ok(None)
            }
        }
    }

    async fn delete_job(&self, id: JobId) -> Result<(), ApiError> {
        self.send(self.http_client.delete(self.item_url(id)), "delete_job")
            .await?;
        Ok(())
    }
}

/// Base path plus a query string holding only the filter fields that are set
pub fn listing_url(base_url: &Url, filter: &JobFilter) -> Url {
    let mut url = base_url.clone();
    let pairs = filter.query_pairs();

    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }

    url
}

pub fn item_url(base_url: &Url, id: JobId) -> Url {
    let mut url = base_url.clone();
    // The builder rejects cannot-be-a-base URLs, so this always succeeds
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(&id.to_string());
    }
    url
}

/// Builder for [`HttpJobsApi`]
pub struct HttpJobsApiBuilder {
    base_url: String,
    timeout: Duration,
}

impl HttpJobsApiBuilder {
    fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<HttpJobsApi, ApiError> {
        let base_url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {}", self.base_url, e)))?;

        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl(self.base_url));
        }

        let http_client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;

        Ok(HttpJobsApi {
            base_url,
            http_client,
        })
    }
}
