pub mod board;
pub mod filters;
pub mod modal;

pub use board::{BoardOptions, JobBoard, RefreshOutcome, UiEvent};
pub use filters::FilterController;
pub use modal::{CloseTrigger, JobForm, ModalController, ModalState};
