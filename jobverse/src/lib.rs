pub mod config;
pub mod controllers;
pub mod helpers;
pub mod integrations;
pub mod render;
pub mod surface;

pub use config::ClientConfig;
pub use controllers::{JobBoard, UiEvent};
pub use integrations::{HttpJobsApi, JobsApi};
