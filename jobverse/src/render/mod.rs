//! Listing renderer.
//!
//! Stateless: every call builds the whole listing from scratch, and the surface
//! replaces whatever it showed before with the result.

pub mod format;
pub mod markup;

use chrono::{DateTime, Utc};
use shared_types::JobRecord;

pub use markup::{Element, Node};

pub const LISTING_ID: &str = "job-listing";
pub const EMPTY_MESSAGE: &str = "No jobs found. Try adjusting your search criteria or filters.";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load jobs. Please try again later.";
pub const UNTITLED: &str = "Untitled";

/// What the listing area should show
#[derive(Debug, Clone, PartialEq)]
pub enum Listing {
    /// Skeleton placeholders while a fetch is outstanding
    Loading(usize),
    Cards(Vec<JobRecord>),
    Empty,
    Error(String),
}

impl Listing {
    pub fn from_jobs(jobs: Vec<JobRecord>) -> Self {
        if jobs.is_empty() {
            Listing::Empty
        } else {
            Listing::Cards(jobs)
        }
    }
}

pub fn render_listing(listing: &Listing, now: DateTime<Utc>) -> Node {
    let container = Element::new("div")
        .attr("id", LISTING_ID)
        .class("job-listing");

    let container = match listing {
        Listing::Loading(count) => container.children(
            (0..*count).map(|_| Element::new("div").class("job-card-skeleton").into()),
        ),
        Listing::Cards(jobs) if jobs.is_empty() => container.child(render_empty(EMPTY_MESSAGE)),
        Listing::Cards(jobs) => {
            container.children(jobs.iter().map(|job| render_card(job, now).into()))
        }
        Listing::Empty => container.child(render_empty(EMPTY_MESSAGE)),
        Listing::Error(message) => container.child(render_error(message)),
    };

    container.into()
}

pub fn render_card(job: &JobRecord, now: DateTime<Utc>) -> Element {
    let id = job.id.to_string();
    let title = job
        .title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(UNTITLED);

    let company_name = format::company_label(job.company_url.as_deref());
    let company = match format::safe_href(job.company_url.as_deref()) {
        Some(href) => Element::new("a")
            .class("company")
            .attr("href", href)
            .attr("target", "_blank")
            .attr("rel", "noopener noreferrer")
            .text(company_name),
        None => Element::new("span").class("company").text(company_name),
    };

    let mut posted = Element::new("p").class("meta").child(
        Element::new("span")
            .class("pill")
            .text(format!("📅 {}", format::time_ago(job.posting_date.as_deref(), now))),
    );
    if let Some(posted_at) = job
        .posting_date
        .as_deref()
        .and_then(format::parse_posting_date)
    {
        posted = posted.text(" ").child(
            Element::new("time")
                .attr("datetime", posted_at.to_rfc3339())
                .text(format::short_date(&posted_at)),
        );
    }

    let mut card = Element::new("div")
        .class("job-item")
        .attr("data-id", id.clone())
        .child(Element::new("h3").text(title))
        .child(
            Element::new("p")
                .class("meta")
                .child(Element::new("strong").text("Company:"))
                .text(" ")
                .child(company),
        )
        .child(posted);

    if let Some(href) = format::safe_href(job.job_url.as_deref()) {
        card = card.child(
            Element::new("p").class("meta").child(
                Element::new("a")
                    .class("job-link")
                    .attr("href", href)
                    .attr("target", "_blank")
                    .attr("rel", "noopener noreferrer")
                    .text("View posting"),
            ),
        );
    }

    card.child(
        Element::new("div")
            .class("job-actions")
            .child(
                Element::new("button")
                    .class("btn-edit")
                    .attr("data-id", id.clone())
                    .text("Edit"),
            )
            .child(
                Element::new("button")
                    .class("btn-delete")
                    .attr("data-id", id)
                    .text("Delete"),
            ),
    )
}

pub fn render_empty(message: &str) -> Element {
    placeholder("no-jobs-message", "🔍", "No jobs found", message)
}

pub fn render_error(message: &str) -> Element {
    placeholder("error-message", "⚠️", "Something went wrong", message)
}

fn placeholder(kind: &'static str, icon: &str, heading: &str, message: &str) -> Element {
    Element::new("div")
        .class("listing-placeholder")
        .attr("data-kind", kind)
        .child(Element::new("div").class("placeholder-icon").text(icon))
        .child(Element::new("h3").text(heading))
        .child(Element::new("p").text(message))
}
