use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand};
use shared_types::JobId;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tracing_subscriber::prelude::*;

use jobverse::config::ClientConfig;
use jobverse::controllers::{BoardOptions, JobBoard, JobForm, UiEvent};
use jobverse::integrations::{HttpJobsApi, JobFilter, JobsApi};
use jobverse::surface::{ListingOutput, TerminalSurface};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    log_file_path: Option<String>,

    /// Jobs API base URL, overriding the config file
    #[arg(long)]
    base_url: Option<String>,

    /// Answer yes to confirmation prompts
    #[arg(short, long)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the job listing as HTML
    List {
        #[arg(long)]
        keyword: Option<String>,
        /// Only jobs posted after this date (YYYY-MM-DD)
        #[arg(long)]
        posted_after: Option<NaiveDate>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Create a job
    Add(JobFields),
    /// Overlay the given fields on an existing job
    Edit {
        id: JobId,
        #[command(flatten)]
        fields: JobFields,
    },
    Delete { id: JobId },
    /// Treat each stdin line as keyword typing and keep the listing in step
    Watch {
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(ClapArgs, Debug)]
struct JobFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    company_url: Option<String>,
    #[arg(long)]
    job_url: Option<String>,
    /// Posting date, e.g. 2024-03-01T09:30
    #[arg(long)]
    posted: Option<String>,
}

impl JobFields {
    fn overlay(self, form: &mut JobForm) {
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(company_url) = self.company_url {
            form.company_url = company_url;
        }
        if let Some(job_url) = self.job_url {
            form.job_url = job_url;
        }
        if let Some(posted) = self.posted {
            form.posting_date = posted;
        }
    }
}

fn init_tracing(log_file_path: Option<String>) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // stdout carries the rendered listing, so console logs go to stderr
    if let Some(log_path) = log_file_path {
        let log_path = std::path::Path::new(&log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("jobverse.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn listing_output(output: Option<PathBuf>) -> ListingOutput {
    output.map(ListingOutput::File).unwrap_or(ListingOutput::Stdout)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file_path);

    let (config, config_path) = ClientConfig::load().context("Failed to load config")?;
    tracing::debug!("Loaded config from {:?}", config_path);

    let base_url = args.base_url.unwrap_or(config.api.base_url.clone());
    let api: Arc<dyn JobsApi> = Arc::new(
        HttpJobsApi::builder()
            .base_url(base_url.as_str())
            .timeout(config.api.timeout())
            .build()
            .with_context(|| format!("Failed to set up jobs API client for {}", base_url))?,
    );
    tracing::info!("Using jobs API at {}", base_url);

    let mut options = BoardOptions::from(&config);

    match args.command {
        Command::List {
            keyword,
            posted_after,
            output,
        } => {
            // One-shot render: skeletons would only clutter the output
            options.skeleton_count = 0;
            let surface = Arc::new(TerminalSurface::new(listing_output(output), args.yes));
            let board = JobBoard::new(api, surface, options);
            board.set_filter(JobFilter { keyword, posted_after }).await;
            board.dispatch(UiEvent::ApplyFilters).await;
        }
        Command::Add(fields) => {
            options.skeleton_count = 0;
            let surface = Arc::new(TerminalSurface::new(ListingOutput::Stdout, args.yes));
            let board = JobBoard::new(api, surface, options);

            let mut form = JobForm::default();
            fields.overlay(&mut form);
            if !board.submit(form).await {
                bail!("Failed to create job");
            }
        }
        Command::Edit { id, fields } => {
            options.skeleton_count = 0;
            let record = api
                .get_job(id)
                .await
                .with_context(|| format!("Failed to load job {}", id))?;

            let surface = Arc::new(TerminalSurface::new(ListingOutput::Stdout, args.yes));
            let board = JobBoard::new(api, surface, options);

            let mut form = JobForm::from_record(&record);
            fields.overlay(&mut form);
            if !board.submit(form).await {
                bail!("Failed to update job {}", id);
            }
        }
        Command::Delete { id } => {
            options.skeleton_count = 0;
            let surface = Arc::new(TerminalSurface::new(ListingOutput::Stdout, args.yes));
            let board = JobBoard::new(api, surface, options);
            if !board.delete(id).await {
                bail!("Job {} was not deleted", id);
            }
        }
        Command::Watch { output } => {
            let surface = Arc::new(TerminalSurface::new(listing_output(output), args.yes));
            let board = JobBoard::new(api, surface, options);
            board.dispatch(UiEvent::Init).await;

            let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines
                .next_line()
                .await
                .context("Failed to read keyword from stdin")?
            {
                board.dispatch(UiEvent::KeywordInput(line)).await;
            }

            board.settle().await;
        }
    }

    Ok(())
}
