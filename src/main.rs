// src/main.rs
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use notebook_sourcer::config::{BrowserSettings, Pauses, SubmitSettings, DEFAULT_PROFILE_PATH};
use notebook_sourcer::events::LogSink;
use notebook_sourcer::extract::Extractor;
use notebook_sourcer::links::{
    dedup_preserving_order, LinkSources, DEFAULT_BULK_DUMP, DEFAULT_LINKS_FILE,
    DEFAULT_STATIC_FILE,
};
use notebook_sourcer::submit::{self, Mode, Submission};
use notebook_sourcer::{login, version, Error};

/// Extract documentation links, sign in, and add the links to a notebook.
///
/// Stages run in order: extract, login, notebook. Any combination can be given.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Base documentation URL to scrape, with or without a trailing version
    #[arg(long, value_name = "URL")]
    extract_toc: Option<String>,

    /// Output file for extracted links
    #[arg(long, default_value = DEFAULT_LINKS_FILE)]
    toc_output: PathBuf,

    /// Comma-separated versions to process, e.g. 2.21,2.22
    #[arg(long)]
    versions: Option<String>,

    /// Open a browser to sign in and keep the session in the profile
    #[arg(long)]
    login: bool,

    /// Browser profile directory
    #[arg(long, default_value = DEFAULT_PROFILE_PATH)]
    profile_path: String,

    /// Notebook URL to add the links to
    #[arg(long, value_name = "URL")]
    notebook: Option<String>,

    /// Links to add instead of reading them from a file
    #[arg(long, num_args = 1..)]
    links: Vec<String>,

    /// File containing links to add
    #[arg(long, default_value = DEFAULT_LINKS_FILE)]
    links_file: PathBuf,

    /// Extra links appended to the links file unless --skip-cqa is given
    #[arg(long, default_value = DEFAULT_STATIC_FILE)]
    static_file: PathBuf,

    /// Don't include the static links file
    #[arg(long)]
    skip_cqa: bool,

    /// Add links one at a time instead of in bulk
    #[arg(long)]
    individual: bool,

    /// Where bulk mode writes the URLs for manual pasting
    #[arg(long, default_value = DEFAULT_BULK_DUMP)]
    bulk_dump: PathBuf,

    /// Save a screenshot when a submission step fails
    #[arg(long)]
    screenshot_on_failure: bool,
}

const USAGE_HINT: &str = r#"No operation specified. Operations can be combined:
  --extract-toc URL   extract documentation links to urls.txt
  --login             sign in and save the browser profile
  --notebook URL      add links from urls.txt (+ CQA_res.txt) to a notebook

Examples:
  notebook-sourcer --extract-toc URL --login --notebook NOTEBOOK_URL
  notebook-sourcer --notebook NOTEBOOK_URL --links-file custom.txt --skip-cqa
  notebook-sourcer --notebook NOTEBOOK_URL --individual"#;

async fn run_extract(cli: &Cli, base_url: &str) -> Result<bool> {
    info!("Step 1: extracting documentation links...");
    let versions = match &cli.versions {
        Some(list) => version::parse_list(list)?,
        None => Vec::new(),
    };

    let extractor = Extractor::new().context("Could not build HTTP client")?;
    match extractor
        .extract_to_file(base_url, &versions, &cli.toc_output, &LogSink)
        .await
    {
        Ok(_) => Ok(true),
        Err(e @ Error::EmptyExtraction { .. }) => {
            error!("{e}, stopping workflow");
            Ok(false)
        }
        Err(e) => Err(e).context("Extraction failed"),
    }
}

async fn run_notebook(cli: &Cli, browser: &BrowserSettings, notebook: &str) -> Result<bool> {
    info!("Step 3: adding links to notebook...");

    let links = if !cli.links.is_empty() {
        dedup_preserving_order(cli.links.clone())
    } else {
        let sources = LinkSources {
            main: cli.links_file.clone(),
            static_file: cli.static_file.clone(),
            skip_static: cli.skip_cqa,
        };
        match sources.combine(&LogSink) {
            Ok(links) => links,
            Err(Error::MissingLinksFile(path)) => {
                error!("Main links file not found: {}", path.display());
                error!("Run --extract-toc first, pass --links-file, or give --links");
                return Ok(false);
            }
            Err(e) => return Err(e).context("Could not read links"),
        }
    };

    if links.is_empty() {
        error!("No links found to process");
        return Ok(false);
    }

    let settings = SubmitSettings::new(notebook)
        .bulk_dump(&cli.bulk_dump)
        .screenshot_on_failure(cli.screenshot_on_failure);
    let mode = if cli.individual {
        Mode::Individual
    } else {
        Mode::Bulk
    };

    info!("Adding {} sources to notebook...", links.len());
    match submit::submit_links(browser, &settings, &links, mode, &LogSink).await {
        Ok(Submission::Bulk(state)) if !state.is_done() => {
            warn!("Bulk addition did not complete: {state:?}");
        }
        Ok(Submission::Individual(report)) => {
            for (link, reason) in report.failed() {
                warn!("  - {link}: {reason}");
            }
        }
        Ok(Submission::Bulk(_)) => {}
        Err(Error::NoLinks) => error!("No valid URLs found to add"),
        Err(e) => return Err(e).context("Notebook update failed"),
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let browser = BrowserSettings::from_env(&cli.profile_path);
    let mut performed = 0;

    if let Some(base_url) = &cli.extract_toc {
        if !run_extract(&cli, base_url).await? {
            return Ok(ExitCode::FAILURE);
        }
        performed += 1;
        info!("Extraction completed successfully");
    }

    if cli.login {
        info!("Step 2: starting authentication...");
        login::login(&browser, Pauses::default().login_window, &LogSink)
            .await
            .context("Login failed")?;
        performed += 1;
        info!("Login completed");
    }

    if let Some(notebook) = &cli.notebook {
        if !run_notebook(&cli, &browser, notebook).await? {
            return Ok(ExitCode::FAILURE);
        }
        performed += 1;
        info!("Notebook update completed");
    }

    if performed == 0 {
        error!("{USAGE_HINT}");
        return Ok(ExitCode::FAILURE);
    }

    info!("Workflow completed! Performed {performed} operation(s).");
    Ok(ExitCode::SUCCESS)
}
