use chrono::{NaiveDate, Utc};
use shared_types::JobId;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;
use tokio::sync::Mutex;

use super::filters::FilterController;
use super::modal::{
    CloseTrigger, JobForm, ModalController, ModalState, ADD_TITLE, EDIT_TITLE,
};
use crate::config::ClientConfig;
use crate::helpers::{RequestFence, Ticket};
use crate::integrations::{JobFilter, JobsApi};
use crate::render::{render_listing, Listing, LOAD_FAILED_MESSAGE};
use crate::surface::Surface;

pub const INVALID_IDENTIFIER_MESSAGE: &str = "Invalid job identifier";
pub const EDIT_LOAD_FAILED_MESSAGE: &str = "Failed to load job details. Please try again.";
pub const DELETE_CONFIRM_MESSAGE: &str =
    "Are you sure you want to delete this job? This action cannot be undone.";

/// User input the board reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// First load of the page
    Init,
    ApplyFilters,
    ClearFilters,
    /// One keystroke in the keyword box; the listing follows after the debounce delay
    KeywordInput(String),
    KeywordEnter,
    PostedAfterChanged(Option<NaiveDate>),
    /// A suggestion tag was clicked
    Suggestion(String),
    AddJob,
    /// Edit control on a card, carrying its raw `data-id`
    EditJob(String),
    /// Delete control on a card, carrying its raw `data-id`
    DeleteJob(String),
    CloseModal(CloseTrigger),
    SubmitForm(JobForm),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Rendered(usize),
    Empty,
    Failed,
    /// A newer request was issued while this one was in flight; nothing was drawn
    Stale,
}

#[derive(Debug, Clone)]
pub struct BoardOptions {
    pub debounce: Duration,
    /// Skeleton cards shown while a listing request is outstanding; 0 disables them
    pub skeleton_count: usize,
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            skeleton_count: 6,
        }
    }
}

impl From<&ClientConfig> for BoardOptions {
    fn from(config: &ClientConfig) -> Self {
        Self {
            debounce: config.filters.debounce(),
            skeleton_count: config.render.skeleton_count,
        }
    }
}

/// Fetch, render and edit loop for the job listing.
///
/// The server is the only source of truth: every successful mutation is
/// followed by a full re-fetch, and the board never patches the listing.
pub struct JobBoard {
    api: Arc<dyn JobsApi>,
    surface: Arc<dyn Surface>,
    fence: RequestFence,
    filters: FilterController,
    modal: Mutex<ModalController>,
    render_lock: StdMutex<()>,
    skeleton_count: usize,
}

impl JobBoard {
    pub fn new(
        api: Arc<dyn JobsApi>,
        surface: Arc<dyn Surface>,
        options: BoardOptions,
    ) -> Arc<Self> {
        Arc::new(Self {
            api,
            surface,
            fence: RequestFence::new(),
            filters: FilterController::new(options.debounce),
            modal: Mutex::new(ModalController::new()),
            render_lock: StdMutex::new(()),
            skeleton_count: options.skeleton_count,
        })
    }

    pub async fn dispatch(self: &Arc<Self>, event: UiEvent) {
        tracing::debug!("Dispatching {:?}", event);

        match event {
            UiEvent::Init => {
                self.refresh().await;
            }
            UiEvent::ApplyFilters => {
                self.apply_filters().await;
            }
            UiEvent::ClearFilters => self.clear_filters().await,
            UiEvent::KeywordInput(keyword) => self.keyword_input(keyword).await,
            UiEvent::KeywordEnter => self.keyword_enter().await,
            UiEvent::PostedAfterChanged(date) => self.posted_after_changed(date).await,
            UiEvent::Suggestion(term) => self.suggestion(term).await,
            UiEvent::AddJob => self.open_add().await,
            UiEvent::EditJob(raw_id) => {
                if let Some(id) = self.parse_identifier(&raw_id) {
                    self.open_edit(id).await;
                }
            }
            UiEvent::DeleteJob(raw_id) => {
                if let Some(id) = self.parse_identifier(&raw_id) {
                    self.delete(id).await;
                }
            }
            UiEvent::CloseModal(trigger) => self.close_modal(trigger).await,
            UiEvent::SubmitForm(form) => {
                self.submit(form).await;
            }
        }
    }

    /// Fetch with the current filter and redraw the whole listing.
    ///
    /// Responses are applied only if no newer refresh was issued meanwhile.
    pub async fn refresh(&self) -> RefreshOutcome {
        let ticket = self.fence.issue();
        let filter = self.filters.current().await;

        if self.skeleton_count > 0 {
            self.render_if_current(ticket, &Listing::Loading(self.skeleton_count));
        }

        let result = self.api.list_jobs(&filter).await;

        let (listing, outcome) = match result {
            Ok(jobs) => {
                let outcome = if jobs.is_empty() {
                    RefreshOutcome::Empty
                } else {
                    RefreshOutcome::Rendered(jobs.len())
                };
                (Listing::from_jobs(jobs), outcome)
            }
            Err(e) => {
                tracing::error!("Error fetching jobs: {}", e);
                (
                    Listing::Error(LOAD_FAILED_MESSAGE.to_string()),
                    RefreshOutcome::Failed,
                )
            }
        };

        if !self.render_if_current(ticket, &listing) {
            tracing::debug!(
                "Discarding stale listing response (generation {}, latest {})",
                ticket.generation(),
                self.fence.latest()
            );
            return RefreshOutcome::Stale;
        }

        if let RefreshOutcome::Rendered(count) = outcome {
            tracing::info!("Rendered {} jobs", count);
        }
        outcome
    }

    fn render_if_current(&self, ticket: Ticket, listing: &Listing) -> bool {
        let _guard = self.render_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.fence.is_current(ticket) {
            return false;
        }
        self.surface.replace_listing(render_listing(listing, Utc::now()));
        true
    }

    pub async fn set_filter(&self, filter: JobFilter) {
        self.filters.replace(filter).await;
    }

    pub async fn filter(&self) -> JobFilter {
        self.filters.current().await
    }

    pub async fn apply_filters(&self) -> RefreshOutcome {
        self.filters.cancel_pending();
        self.refresh().await
    }

    pub async fn clear_filters(&self) {
        self.filters.clear().await;
        self.refresh().await;
    }

    pub async fn keyword_input(self: &Arc<Self>, keyword: String) {
        self.filters.set_keyword(keyword).await;

        let board = Arc::clone(self);
        self.filters.debounce(async move {
            board.refresh().await;
        });
    }

    pub async fn keyword_enter(&self) {
        self.filters.cancel_pending();
        self.refresh().await;
    }

    pub async fn posted_after_changed(&self, posted_after: Option<NaiveDate>) {
        self.filters.set_posted_after(posted_after).await;
        self.refresh().await;
    }

    pub async fn suggestion(&self, term: String) {
        self.filters.cancel_pending();
        self.filters.set_keyword(term.trim()).await;
        self.refresh().await;
    }

    /// Wait for a pending debounced refresh to finish
    pub async fn settle(&self) {
        self.filters.settle().await;
    }

    pub async fn modal_state(&self) -> ModalState {
        self.modal.lock().await.state()
    }

    /// Fields of the open modal, `None` while it is closed
    pub async fn modal_form(&self) -> Option<JobForm> {
        let modal = self.modal.lock().await;
        modal.is_open().then(|| modal.form().clone())
    }

    pub async fn open_add(&self) {
        let mut modal = self.modal.lock().await;
        let form = modal.open_for_create();
        self.surface.show_modal(ADD_TITLE, form);
    }

    pub async fn open_edit(&self, id: JobId) {
        match self.api.get_job(id).await {
            Ok(record) => {
                let mut modal = self.modal.lock().await;
                let form = modal.open_for_edit(&record);
                self.surface.show_modal(EDIT_TITLE, form);
            }
            Err(e) => {
                tracing::error!("Error fetching job {} for edit: {}", id, e);
                self.surface.alert(EDIT_LOAD_FAILED_MESSAGE);
            }
        }
    }

    pub async fn close_modal(&self, trigger: CloseTrigger) {
        let closed = self.modal.lock().await.close(trigger);
        if closed {
            self.surface.hide_modal();
        }
    }

    /// Create or update depending on the form's hidden identifier.
    ///
    /// On success the modal closes and the listing is re-fetched; on failure
    /// the modal stays open with the user's input.
    pub async fn submit(&self, form: JobForm) -> bool {
        let id = match form.identifier() {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Rejecting form submission: {}", e);
                self.surface.alert(INVALID_IDENTIFIER_MESSAGE);
                return false;
            }
        };

        let payload = form.to_payload();
        match self.api.upsert_job(id, &payload).await {
            Ok(_) => {
                self.modal.lock().await.reset();
                self.surface.hide_modal();
                self.refresh().await;
                match id {
                    Some(id) => tracing::info!("Job {} updated successfully!", id),
                    None => tracing::info!("Job created successfully!"),
                }
                true
            }
            Err(e) => {
                tracing::error!("Error saving job: {}", e);
                self.surface.alert(&format!("Error saving job: {}", e));
                false
            }
        }
    }

    /// Delete after explicit confirmation. A failure leaves the listing as it was.
    pub async fn delete(&self, id: JobId) -> bool {
        if !self.surface.confirm(DELETE_CONFIRM_MESSAGE) {
            tracing::debug!("Delete of job {} declined", id);
            return false;
        }

        match self.api.delete_job(id).await {
            Ok(()) => {
                self.refresh().await;
                tracing::info!("Job {} deleted successfully!", id);
                true
            }
            Err(e) => {
                tracing::error!("Error deleting job {}: {}", id, e);
                self.surface.alert(&format!("Error deleting job: {}", e));
                false
            }
        }
    }

    fn parse_identifier(&self, raw_id: &str) -> Option<JobId> {
        match raw_id.parse::<JobId>() {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("{}", e);
                self.surface.alert(INVALID_IDENTIFIER_MESSAGE);
                None
            }
        }
    }
}
