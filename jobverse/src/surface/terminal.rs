use std::io::{BufRead, Write};
use std::path::PathBuf;
use tokio::runtime::RuntimeFlavor;

use super::Surface;
use crate::controllers::modal::JobForm;
use crate::render::Node;

/// Where rendered listings go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingOutput {
    Stdout,
    /// Rewritten in full on every render
    File(PathBuf),
}

/// Terminal front end: listing HTML on stdout (or a file), alerts on stderr,
/// confirmations read from stdin.
pub struct TerminalSurface {
    output: ListingOutput,
    assume_yes: bool,
}

impl TerminalSurface {
    pub fn new(output: ListingOutput, assume_yes: bool) -> Self {
        Self { output, assume_yes }
    }

    fn write_listing(&self, html: &str) -> std::io::Result<()> {
        match &self.output {
            ListingOutput::Stdout => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{}", html)?;
                stdout.flush()
            }
            ListingOutput::File(path) => std::fs::write(path, format!("{}\n", html)),
        }
    }
}

impl Surface for TerminalSurface {
    fn replace_listing(&self, listing: Node) {
        if let Err(e) = self.write_listing(&listing.to_html()) {
            tracing::error!("Failed to write listing to {:?}: {}", self.output, e);
        }
    }

    fn show_modal(&self, title: &str, form: &JobForm) {
        tracing::info!(
            "{}: id={:?} title={:?} company_url={:?} job_url={:?} posted={:?}",
            title,
            form.id,
            form.title,
            form.company_url,
            form.job_url,
            form.posting_date
        );
    }

    fn hide_modal(&self) {
        tracing::debug!("Modal closed");
    }

    fn alert(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            tracing::debug!("Auto-confirmed: {}", message);
            return true;
        }

        eprint!("{} [y/N] ", message);
        let _ = std::io::stderr().flush();

        off_runtime(|| read_answer(std::io::stdin().lock()))
    }
}

/// Run a blocking read without stalling the other tasks on a multi-thread runtime
fn off_runtime<T>(read: impl FnOnce() -> T) -> T {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(read)
        }
        _ => read(),
    }
}

fn read_answer(mut input: impl BufRead) -> bool {
    let mut answer = String::new();
    if let Err(e) = input.read_line(&mut answer) {
        tracing::warn!("Failed to read confirmation: {}", e);
        return false;
    }

    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
