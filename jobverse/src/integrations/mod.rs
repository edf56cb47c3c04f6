pub mod jobs_api;

pub use jobs_api::{ApiError, HttpJobsApi, HttpJobsApiBuilder, JobFilter, JobsApi};
