pub mod debounce;
pub mod request_fence;

pub use debounce::Debouncer;
pub use request_fence::{RequestFence, Ticket};
