pub mod memory;
pub mod terminal;

pub use memory::MemorySurface;
pub use terminal::{ListingOutput, TerminalSurface};

use crate::controllers::modal::JobForm;
use crate::render::Node;

/// The display the board drives: a browser document, a terminal, or nothing at all.
///
/// Implementations only present what they are given. They hold no job data
/// and never call back into the board.
pub trait Surface: Send + Sync {
    /// Replace the whole listing area with `listing`
    fn replace_listing(&self, listing: Node);

    fn show_modal(&self, title: &str, form: &JobForm);

    fn hide_modal(&self);

    /// Blocking, user-visible error message
    fn alert(&self, message: &str);

    fn confirm(&self, message: &str) -> bool;
}
