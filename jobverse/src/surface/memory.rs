use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::Surface;
use crate::controllers::modal::JobForm;
use crate::render::Node;

#[derive(Debug, Default)]
struct Recorded {
    listing: Option<Node>,
    listing_renders: usize,
    modal: Option<(String, JobForm)>,
    alerts: Vec<String>,
    confirmations: Vec<String>,
}

/// Headless surface that records everything it is asked to show
#[derive(Debug)]
pub struct MemorySurface {
    recorded: Mutex<Recorded>,
    confirm_answer: AtomicBool,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    /// Confirmations are accepted until told otherwise
    pub fn new() -> Self {
        Self {
            recorded: Mutex::new(Recorded::default()),
            confirm_answer: AtomicBool::new(true),
        }
    }

    pub fn set_confirm_answer(&self, answer: bool) {
        self.confirm_answer.store(answer, Ordering::SeqCst);
    }

    pub fn listing(&self) -> Option<Node> {
        self.recorded().listing.clone()
    }

    pub fn listing_html(&self) -> Option<String> {
        self.recorded().listing.as_ref().map(Node::to_html)
    }

    /// How many times the listing area was replaced
    pub fn listing_renders(&self) -> usize {
        self.recorded().listing_renders
    }

    /// Title and fields of the open modal, `None` when it is hidden
    pub fn modal(&self) -> Option<(String, JobForm)> {
        self.recorded().modal.clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.recorded().alerts.clone()
    }

    pub fn confirmations(&self) -> Vec<String> {
        self.recorded().confirmations.clone()
    }

    fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Surface for MemorySurface {
    fn replace_listing(&self, listing: Node) {
        let mut recorded = self.recorded();
        recorded.listing = Some(listing);
        recorded.listing_renders += 1;
    }

    fn show_modal(&self, title: &str, form: &JobForm) {
        self.recorded().modal = Some((title.to_string(), form.clone()));
    }

    fn hide_modal(&self) {
        self.recorded().modal = None;
    }

    fn alert(&self, message: &str) {
        self.recorded().alerts.push(message.to_string());
    }

    fn confirm(&self, message: &str) -> bool {
        self.recorded().confirmations.push(message.to_string());
        self.confirm_answer.load(Ordering::SeqCst)
    }
}
