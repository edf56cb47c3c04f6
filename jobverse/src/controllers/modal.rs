use shared_types::{JobId, JobIdError, JobPayload, JobRecord};

use crate::render::format;

pub const ADD_TITLE: &str = "Add New Job";
pub const EDIT_TITLE: &str = "Edit Job";

/// The modal's fields, as the form controls hold them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobForm {
    /// Hidden identifier field; blank means "create"
    pub id: String,
    pub title: String,
    pub company_url: String,
    pub job_url: String,
    /// datetime-local value, `YYYY-MM-DDTHH:MM`
    pub posting_date: String,
}

impl JobForm {
    pub fn from_record(record: &JobRecord) -> Self {
        Self {
            id: record.id.to_string(),
            title: record.title.clone().unwrap_or_default(),
            company_url: record.company_url.clone().unwrap_or_default(),
            job_url: record.job_url.clone().unwrap_or_default(),
            posting_date: format::input_datetime_value(record.posting_date.as_deref()),
        }
    }

    /// `Ok(None)` for a blank identifier field
    pub fn identifier(&self) -> Result<Option<JobId>, JobIdError> {
        match self.id.parse::<JobId>() {
            Ok(id) => Ok(Some(id)),
            Err(JobIdError::Empty) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn to_payload(&self) -> JobPayload {
        let posted_at = Some(self.posting_date.trim())
            .filter(|raw| !raw.is_empty())
            .and_then(|raw| {
                let parsed = format::parse_posting_date(raw);
                if parsed.is_none() {
                    tracing::warn!("Ignoring unparseable posting date {:?}", raw);
                }
                parsed
            })
            .map(|dt| dt.naive_utc());

        JobPayload {
            title: self.title.trim().to_string(),
            company_url: self.company_url.trim().to_string(),
            job_url: self.job_url.trim().to_string(),
            posting_date: None,
        }
        .with_posting_date(posted_at)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    OpenForCreate,
    OpenForEdit(JobId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTrigger {
    CloseButton,
    Overlay,
    OutsideClick,
    Escape,
}

/// Closed / OpenForCreate / OpenForEdit state machine for the job modal.
///
/// Pure bookkeeping: fetching and displaying are up to the board.
#[derive(Debug)]
pub struct ModalController {
    state: ModalState,
    form: JobForm,
}

impl Default for ModalController {
    fn default() -> Self {
        Self::new()
    }
}

impl ModalController {
    pub fn new() -> Self {
        Self {
            state: ModalState::Closed,
            form: JobForm::default(),
        }
    }

    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn form(&self) -> &JobForm {
        &self.form
    }

    pub fn is_open(&self) -> bool {
        self.state != ModalState::Closed
    }

    pub fn title(&self) -> Option<&'static str> {
        match self.state {
            ModalState::Closed => None,
            ModalState::OpenForCreate => Some(ADD_TITLE),
            ModalState::OpenForEdit(_) => Some(EDIT_TITLE),
        }
    }

    pub fn open_for_create(&mut self) -> &JobForm {
        self.form = JobForm::default();
        self.state = ModalState::OpenForCreate;
        &self.form
    }

    pub fn open_for_edit(&mut self, record: &JobRecord) -> &JobForm {
        self.form = JobForm::from_record(record);
        self.state = ModalState::OpenForEdit(record.id);
        &self.form
    }

    /// Returns whether the modal actually closed. Escape does nothing while closed.
    pub fn close(&mut self, trigger: CloseTrigger) -> bool {
        if trigger == CloseTrigger::Escape && !self.is_open() {
            return false;
        }
        self.reset();
        true
    }

    /// Back to `Closed` with a blank form
    pub fn reset(&mut self) {
        self.form = JobForm::default();
        self.state = ModalState::Closed;
    }
}
