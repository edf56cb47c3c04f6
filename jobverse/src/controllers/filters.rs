use chrono::NaiveDate;
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::helpers::Debouncer;
use crate::integrations::JobFilter;

/// Current keyword/date filter plus the debounce timer for keyword typing
pub struct FilterController {
    filter: Mutex<JobFilter>,
    debouncer: Debouncer,
}

impl FilterController {
    pub fn new(debounce: Duration) -> Self {
        Self {
            filter: Mutex::new(JobFilter::default()),
            debouncer: Debouncer::new(debounce),
        }
    }

    pub async fn current(&self) -> JobFilter {
        self.filter.lock().await.clone()
    }

    pub async fn replace(&self, filter: JobFilter) {
        *self.filter.lock().await = filter;
    }

    pub async fn set_keyword(&self, keyword: impl Into<String>) {
        self.filter.lock().await.keyword = Some(keyword.into());
    }

    pub async fn set_posted_after(&self, posted_after: Option<NaiveDate>) {
        self.filter.lock().await.posted_after = posted_after;
    }

    /// Blank both fields and drop any pending keyword refresh
    pub async fn clear(&self) {
        self.debouncer.cancel();
        *self.filter.lock().await = JobFilter::default();
    }

    /// Run `refresh` once typing has paused for the debounce delay
    pub fn debounce<F>(&self, refresh: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.debouncer.schedule(refresh);
    }

    pub fn cancel_pending(&self) -> bool {
        self.debouncer.cancel()
    }

    pub fn has_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub async fn settle(&self) {
        self.debouncer.settle().await;
    }
}
