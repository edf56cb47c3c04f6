use async_trait::async_trait;
use chrono::NaiveDate;
use shared_types::{JobId, JobPayload, JobRecord};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use jobverse::controllers::board::{
    DELETE_CONFIRM_MESSAGE, EDIT_LOAD_FAILED_MESSAGE, INVALID_IDENTIFIER_MESSAGE,
};
use jobverse::controllers::{
    BoardOptions, CloseTrigger, JobBoard, JobForm, ModalState, RefreshOutcome, UiEvent,
};
use jobverse::integrations::{ApiError, JobFilter, JobsApi};
use jobverse::surface::{MemorySurface, Surface};

/// In-memory jobs backend with switchable failures and per-keyword latency
#[derive(Default)]
struct FakeJobsApi {
    jobs: Mutex<Vec<JobRecord>>,
    list_calls: Mutex<Vec<JobFilter>>,
    upserts: Mutex<Vec<(Option<JobId>, JobPayload)>>,
    deletes: Mutex<Vec<JobId>>,
    latency: Mutex<HashMap<String, Duration>>,
    fail_list: Mutex<bool>,
    fail_get: Mutex<bool>,
    save_error: Mutex<Option<String>>,
    delete_error: Mutex<Option<String>>,
}

impl FakeJobsApi {
    fn with_jobs(jobs: Vec<JobRecord>) -> Arc<Self> {
        let api = Self::default();
        *api.jobs.lock().unwrap() = jobs;
        Arc::new(api)
    }

    fn list_calls(&self) -> Vec<JobFilter> {
        self.list_calls.lock().unwrap().clone()
    }
}

fn server_error(message: &str) -> ApiError {
    ApiError::Status {
        status: 500,
        message: Some(message.to_string()),
    }
}

#[async_trait]
impl JobsApi for FakeJobsApi {
    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<JobRecord>, ApiError> {
        self.list_calls.lock().unwrap().push(filter.clone());

        let keyword = filter.keyword.clone().unwrap_or_default();
        let delay = self.latency.lock().unwrap().get(&keyword).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if *self.fail_list.lock().unwrap() {
            return Err(ApiError::Network("connection refused".to_string()));
        }

        let keyword = keyword.trim().to_lowercase();
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|job| {
                keyword.is_empty()
                    || job
                        .title
                        .as_deref()
                        .map(|title| title.to_lowercase().contains(&keyword))
                        .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn get_job(&self, id: JobId) -> Result<JobRecord, ApiError> {
        if *self.fail_get.lock().unwrap() {
            return Err(server_error("Job not found"));
        }
        self.jobs
            .lock()
            .unwrap()
            .iter()
            .find(|job| job.id == id)
            .cloned()
            .ok_or(ApiError::Status {
                status: 404,
                message: Some("Job not found".to_string()),
            })
    }

    async fn upsert_job(
        &self,
        id: Option<JobId>,
        payload: &JobPayload,
    ) -> Result<Option<JobRecord>, ApiError> {
        if let Some(message) = self.save_error.lock().unwrap().clone() {
            return Err(server_error(&message));
        }
        self.upserts.lock().unwrap().push((id, payload.clone()));

        let mut jobs = self.jobs.lock().unwrap();
        let next_id = jobs.iter().map(|job| job.id.0).max().unwrap_or(0) + 1;
        let id = id.unwrap_or(JobId(next_id));
        let record = JobRecord {
            id,
            title: Some(payload.title.clone()),
            company_url: Some(payload.company_url.clone()),
            job_url: Some(payload.job_url.clone()),
            posting_date: payload.posting_date.clone(),
        };
        jobs.retain(|job| job.id != id);
        jobs.push(record.clone());
        Ok(Some(record))
    }

    async fn delete_job(&self, id: JobId) -> Result<(), ApiError> {
        if let Some(message) = self.delete_error.lock().unwrap().clone() {
            return Err(server_error(&message));
        }
        self.deletes.lock().unwrap().push(id);
        self.jobs.lock().unwrap().retain(|job| job.id != id);
        Ok(())
    }
}

fn job(id: i64, title: &str) -> JobRecord {
    JobRecord {
        id: JobId(id),
        title: Some(title.to_string()),
        company_url: Some("https://www.acme.io".to_string()),
        job_url: Some(format!("https://acme.io/jobs/{}", id)),
        posting_date: Some("2024-05-01 09:00:00".to_string()),
    }
}

fn board_with(
    api: Arc<FakeJobsApi>,
    skeleton_count: usize,
) -> (Arc<JobBoard>, Arc<MemorySurface>) {
    let surface = Arc::new(MemorySurface::new());
    let board = JobBoard::new(
        api,
        surface.clone() as Arc<dyn Surface>,
        BoardOptions {
            debounce: Duration::from_millis(500),
            skeleton_count,
        },
    );
    (board, surface)
}

fn card_ids(surface: &MemorySurface) -> Vec<String> {
    surface
        .listing()
        .map(|listing| {
            listing
                .find_by_class("job-item")
                .into_iter()
                .filter_map(|card| card.get_attr("data-id").map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn test_init_renders_cards_in_server_order() {
    let api = FakeJobsApi::with_jobs(vec![job(2, "Rust Engineer"), job(1, "Data Engineer")]);
    let (board, surface) = board_with(api.clone(), 6);

    board.dispatch(UiEvent::Init).await;

    assert_eq!(card_ids(&surface), vec!["2", "1"]);
    // skeleton first, then the cards
    assert_eq!(surface.listing_renders(), 2);
    assert_eq!(api.list_calls(), vec![JobFilter::default()]);
}

#[tokio::test]
async fn test_empty_and_error_placeholders() {
    let api = FakeJobsApi::with_jobs(vec![]);
    let (board, surface) = board_with(api.clone(), 0);

    assert_eq!(board.refresh().await, RefreshOutcome::Empty);
    let html = surface.listing_html().unwrap();
    assert!(html.contains("No jobs found"));
    assert!(!html.contains("Something went wrong"));

    *api.fail_list.lock().unwrap() = true;
    assert_eq!(board.refresh().await, RefreshOutcome::Failed);
    let text = surface.listing().unwrap().text_content();
    assert!(text.contains("Something went wrong"));
    assert!(text.contains("Failed to load jobs. Please try again later."));
    assert!(card_ids(&surface).is_empty());
}

#[tokio::test]
async fn test_edit_and_submit_updates_by_id() {
    let api = FakeJobsApi::with_jobs(vec![job(1, "Rust Engineer")]);
    let (board, surface) = board_with(api.clone(), 0);

    board.dispatch(UiEvent::EditJob("1".to_string())).await;
    assert_eq!(board.modal_state().await, ModalState::OpenForEdit(JobId(1)));

    let (title, mut form) = surface.modal().unwrap();
    assert_eq!(title, "Edit Job");
    assert_eq!(form.id, "1");
    assert_eq!(form.posting_date, "2024-05-01T09:00");

    form.title = "Senior Rust Engineer".to_string();
    board.dispatch(UiEvent::SubmitForm(form)).await;

    let upserts = api.upserts.lock().unwrap().clone();
    assert_eq!(upserts.len(), 1);
    assert_eq!(upserts[0].0, Some(JobId(1)));
    assert_eq!(upserts[0].1.title, "Senior Rust Engineer");
    assert_eq!(
        upserts[0].1.posting_date.as_deref(),
        Some("2024-05-01 09:00:00")
    );

    assert_eq!(board.modal_state().await, ModalState::Closed);
    assert!(surface.modal().is_none());
    assert_eq!(api.list_calls().len(), 1);
    assert!(surface.listing_html().unwrap().contains("Senior Rust Engineer"));
}

#[tokio::test]
async fn test_add_submits_create() {
    let api = FakeJobsApi::with_jobs(vec![job(1, "Rust Engineer")]);
    let (board, surface) = board_with(api.clone(), 0);

    board.dispatch(UiEvent::AddJob).await;
    let (title, form) = surface.modal().unwrap();
    assert_eq!(title, "Add New Job");
    assert_eq!(form, JobForm::default());

    board
        .dispatch(UiEvent::SubmitForm(JobForm {
            title: "Site Reliability Engineer".to_string(),
            job_url: "https://acme.io/jobs/2".to_string(),
            ..JobForm::default()
        }))
        .await;

    let upserts = api.upserts.lock().unwrap().clone();
    assert_eq!(upserts[0].0, None);
    assert_eq!(upserts[0].1.posting_date, None);
    assert_eq!(card_ids(&surface), vec!["1", "2"]);
}

#[tokio::test]
async fn test_failed_save_keeps_modal_open() {
    let api = FakeJobsApi::with_jobs(vec![]);
    *api.save_error.lock().unwrap() = Some("Database is locked".to_string());
    let (board, surface) = board_with(api.clone(), 0);

    board.dispatch(UiEvent::AddJob).await;
    let form = JobForm {
        title: "Rust Engineer".to_string(),
        ..JobForm::default()
    };
    board.dispatch(UiEvent::SubmitForm(form)).await;

    assert_eq!(surface.alerts(), vec!["Error saving job: Database is locked"]);
    assert_eq!(board.modal_state().await, ModalState::OpenForCreate);
    assert!(surface.modal().is_some());
    assert!(api.list_calls().is_empty());
}

#[tokio::test]
async fn test_close_triggers_hide_modal() {
    let api = FakeJobsApi::with_jobs(vec![job(1, "Rust Engineer")]);
    let (board, surface) = board_with(api, 0);

    board.dispatch(UiEvent::CloseModal(CloseTrigger::Escape)).await;
    assert!(surface.modal().is_none());

    board.dispatch(UiEvent::EditJob("1".to_string())).await;
    board.dispatch(UiEvent::CloseModal(CloseTrigger::Overlay)).await;
    assert_eq!(board.modal_state().await, ModalState::Closed);
    assert!(surface.modal().is_none());
    assert_eq!(board.modal_form().await, None);
}

#[tokio::test]
async fn test_edit_fetch_failure_alerts() {
    let api = FakeJobsApi::with_jobs(vec![job(1, "Rust Engineer")]);
    *api.fail_get.lock().unwrap() = true;
    let (board, surface) = board_with(api, 0);

    board.dispatch(UiEvent::EditJob("1".to_string())).await;

    assert_eq!(surface.alerts(), vec![EDIT_LOAD_FAILED_MESSAGE]);
    assert_eq!(board.modal_state().await, ModalState::Closed);
    assert!(surface.modal().is_none());
}

#[tokio::test]
async fn test_invalid_identifier_is_rejected_before_any_request() {
    let api = FakeJobsApi::with_jobs(vec![job(1, "Rust Engineer")]);
    let (board, surface) = board_with(api.clone(), 0);

    board
        .dispatch(UiEvent::DeleteJob("https://acme.io/jobs/1".to_string()))
        .await;
    board.dispatch(UiEvent::EditJob(String::new())).await;

    assert_eq!(
        surface.alerts(),
        vec![INVALID_IDENTIFIER_MESSAGE, INVALID_IDENTIFIER_MESSAGE]
    );
    assert!(surface.confirmations().is_empty());
    assert!(api.deletes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_declined_delete_sends_nothing() {
    let api = FakeJobsApi::with_jobs(vec![job(1, "Rust Engineer")]);
    let (board, surface) = board_with(api.clone(), 0);
    surface.set_confirm_answer(false);

    board.dispatch(UiEvent::DeleteJob("1".to_string())).await;

    assert_eq!(surface.confirmations(), vec![DELETE_CONFIRM_MESSAGE]);
    assert!(api.deletes.lock().unwrap().is_empty());
    assert!(api.list_calls().is_empty());
}

#[tokio::test]
async fn test_confirmed_delete_refetches() {
    let api = FakeJobsApi::with_jobs(vec![job(1, "Rust Engineer"), job(2, "Data Engineer")]);
    let (board, surface) = board_with(api.clone(), 0);
    board.dispatch(UiEvent::Init).await;

    board.dispatch(UiEvent::DeleteJob("1".to_string())).await;

    assert_eq!(*api.deletes.lock().unwrap(), vec![JobId(1)]);
    assert_eq!(card_ids(&surface), vec!["2"]);
}

#[tokio::test]
async fn test_failed_delete_leaves_listing_untouched() {
    let api = FakeJobsApi::with_jobs(vec![job(1, "Rust Engineer")]);
    let (board, surface) = board_with(api.clone(), 0);
    board.dispatch(UiEvent::Init).await;

    let before = surface.listing_html();
    let renders = surface.listing_renders();
    *api.delete_error.lock().unwrap() = Some("Job not found".to_string());

    board.dispatch(UiEvent::DeleteJob("1".to_string())).await;

    assert_eq!(surface.alerts(), vec!["Error deleting job: Job not found"]);
    assert_eq!(surface.listing_html(), before);
    assert_eq!(surface.listing_renders(), renders);
    assert_eq!(api.list_calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_stale_response_is_discarded() {
    let api = FakeJobsApi::with_jobs(vec![job(1, "Rust Engineer"), job(2, "Data Engineer")]);
    api.latency
        .lock()
        .unwrap()
        .insert("rust".to_string(), Duration::from_secs(2));
    api.latency
        .lock()
        .unwrap()
        .insert("data".to_string(), Duration::from_millis(100));
    let (board, surface) = board_with(api.clone(), 0);

    board
        .set_filter(JobFilter {
            keyword: Some("rust".to_string()),
            posted_after: None,
        })
        .await;
    let slow_board = board.clone();
    let slow = tokio::spawn(async move { slow_board.refresh().await });
    while api.list_calls().is_empty() {
        tokio::task::yield_now().await;
    }

    board
        .set_filter(JobFilter {
            keyword: Some("data".to_string()),
            posted_after: None,
        })
        .await;
    assert_eq!(board.refresh().await, RefreshOutcome::Rendered(1));
    assert_eq!(slow.await.unwrap(), RefreshOutcome::Stale);

    assert_eq!(card_ids(&surface), vec!["2"]);
    assert_eq!(surface.listing_renders(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_keyword_burst_sends_one_request() {
    let api = FakeJobsApi::with_jobs(vec![job(1, "Rust Engineer"), job(2, "Data Engineer")]);
    let (board, surface) = board_with(api.clone(), 0);

    for keyword in ["r", "ru", "rus", "rust"] {
        board.dispatch(UiEvent::KeywordInput(keyword.to_string())).await;
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(api.list_calls().is_empty());

    board.settle().await;

    let calls = api.list_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].keyword.as_deref(), Some("rust"));
    assert_eq!(card_ids(&surface), vec!["1"]);
}

#[tokio::test(start_paused = true)]
async fn test_enter_skips_the_debounce() {
    let api = FakeJobsApi::with_jobs(vec![job(1, "Rust Engineer")]);
    let (board, _surface) = board_with(api.clone(), 0);

    board.dispatch(UiEvent::KeywordInput("rust".to_string())).await;
    board.dispatch(UiEvent::KeywordEnter).await;
    assert_eq!(api.list_calls().len(), 1);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(api.list_calls().len(), 1);
}

#[tokio::test]
async fn test_filter_events() {
    let api = FakeJobsApi::with_jobs(vec![job(1, "Remote Rust Engineer")]);
    let (board, _surface) = board_with(api.clone(), 0);
    let date = NaiveDate::from_ymd_opt(2024, 4, 1);

    board.dispatch(UiEvent::Suggestion(" Remote ".to_string())).await;
    board.dispatch(UiEvent::PostedAfterChanged(date)).await;
    board.dispatch(UiEvent::ClearFilters).await;

    let calls = api.list_calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].keyword.as_deref(), Some("Remote"));
    assert_eq!(calls[1].keyword.as_deref(), Some("Remote"));
    assert_eq!(calls[1].posted_after, date);
    assert_eq!(calls[2], JobFilter::default());
    assert_eq!(board.filter().await, JobFilter::default());
}
