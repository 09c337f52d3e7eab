// src/events.rs
//! Diagnostic events emitted by the pipelines.
//!
//! Library code reports progress through an [`EventSink`] instead of printing,
//! so the binary can route everything into `log` and tests can look at exactly
//! what was reported.

use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;

use log::Level;

use crate::version::Version;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // extraction
    VersionDetected { version: Version },
    DetectedVersionOverridden { detected: Version, explicit: Vec<Version> },
    DefaultVersion,
    FetchingVersion { url: String },
    VersionExtracted { version: Version, count: usize },
    VersionFailed { url: String, reason: String },
    ExtractionWritten { path: PathBuf, count: usize, samples: Vec<String> },

    // link files
    LinksLoaded { path: PathBuf, count: usize },
    StaticLinksSkipped { path: PathBuf },
    StaticLinksMissing { path: PathBuf },
    LinksMerged { total: usize },
    BulkDumpWritten { path: PathBuf, count: usize },

    // page handling
    PageInspected { title: String, material_ui: bool, dialog_role: bool },
    OverlayFound { selector: String, count: usize },
    OverlayDismissed { selector: String, remaining: usize },
    OverlayClickFailed { selector: String, reason: String },
    EscapeSent,
    CloseButtonClicked { selector: String },

    // element resolution
    StrategyTried { target: String, group: &'static str },
    SelectorSkipped { target: String, selector: String, label: String },
    SelectorFailed { target: String, selector: String, reason: String },
    ElementResolved { target: String, group: &'static str, selector: String },
    InputDescribed { index: usize, kind: String, placeholder: String, aria_label: String },

    // submission
    StageReached { stage: &'static str },
    SubmissionFailed { stage: &'static str, reason: String },
    ManualFallback { path: PathBuf },
    BulkSubmitted { count: usize },
    LinkStarted { index: usize, total: usize, link: String },
    LinkSucceeded { link: String },
    LinkFailed { link: String, reason: String },
    SubmissionSummary { succeeded: usize, failed: usize },

    // diagnostics
    ScreenshotSaved { path: PathBuf },
    ScreenshotFailed { reason: String },
    LoginWaiting,
    LoginFinished { by_keypress: bool },
}

impl Event {
    pub fn level(&self) -> Level {
        use Event::*;
        match self {
            VersionFailed { .. }
            | SubmissionFailed { .. }
            | ManualFallback { .. }
            | LinkFailed { .. }
            | ScreenshotFailed { .. }
            | StaticLinksMissing { .. } => Level::Warn,
            OverlayClickFailed { .. }
            | StrategyTried { .. }
            | SelectorSkipped { .. }
            | SelectorFailed { .. }
            | OverlayFound { .. }
            | OverlayDismissed { .. }
            | EscapeSent => Level::Debug,
            _ => Level::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Event::*;
        match self {
            VersionDetected { version } => write!(f, "Detected version '{version}' in URL"),
            DetectedVersionOverridden { detected, explicit } => write!(
                f,
                "Ignoring detected version '{detected}', using specified versions: {}",
                join(explicit)
            ),
            DefaultVersion => write!(f, "No versions specified, defaulting to 'latest'"),
            FetchingVersion { url } => write!(f, "Extracting content links from: {url}"),
            VersionExtracted { version, count } => {
                write!(f, "Extracted {count} links for version {version}")
            }
            VersionFailed { url, reason } => write!(f, "Failed to extract from {url}: {reason}"),
            ExtractionWritten {
                path,
                count,
                samples,
            } => {
                write!(f, "Extracted {count} total links to {}", path.display())?;
                for sample in samples {
                    write!(f, "\n - {sample}")?;
                }
                Ok(())
            }
            LinksLoaded { path, count } => {
                write!(f, "Loaded {count} links from {}", path.display())
            }
            StaticLinksSkipped { path } => {
                write!(f, "Skipping static links file {}", path.display())
            }
            StaticLinksMissing { path } => {
                write!(f, "Static links file not found: {} (skipping)", path.display())
            }
            LinksMerged { total } => write!(f, "Total unique links to process: {total}"),
            BulkDumpWritten { path, count } => {
                write!(f, "Wrote {count} URLs for bulk addition to {}", path.display())
            }
            PageInspected {
                title,
                material_ui,
                dialog_role,
            } => write!(
                f,
                "Workspace page '{title}' (material ui: {material_ui}, dialog role: {dialog_role})"
            ),
            OverlayFound { selector, count } => {
                write!(f, "Found {count} overlay(s) with selector: {selector}")
            }
            OverlayDismissed {
                selector,
                remaining,
            } => write!(f, "Clicked overlay {selector}, {remaining} still present"),
            OverlayClickFailed { selector, reason } => {
                write!(f, "Could not click overlay {selector}: {reason}")
            }
            EscapeSent => write!(f, "Sent Escape"),
            CloseButtonClicked { selector } => write!(f, "Clicked close button: {selector}"),
            StrategyTried { target, group } => {
                write!(f, "Searching for {target}: trying strategy {group}")
            }
            SelectorSkipped {
                target,
                selector,
                label,
            } => write!(f, "Skipping {selector} for {target}: excluded label '{label}'"),
            SelectorFailed {
                target,
                selector,
                reason,
            } => write!(f, "Selector {selector} failed for {target}: {reason}"),
            ElementResolved {
                target,
                group,
                selector,
            } => write!(f, "Found {target} with {selector} ({group})"),
            InputDescribed {
                index,
                kind,
                placeholder,
                aria_label,
            } => write!(
                f,
                "input {index}: type='{kind}' placeholder='{placeholder}' aria-label='{aria_label}'"
            ),
            StageReached { stage } => write!(f, "Reached {stage}"),
            SubmissionFailed { stage, reason } => write!(f, "Failed after {stage}: {reason}"),
            ManualFallback { path } => write!(
                f,
                "Manual fallback: copy the URLs from '{}' and paste them into the notebook",
                path.display()
            ),
            BulkSubmitted { count } => write!(f, "Submitted {count} URLs for processing"),
            LinkStarted { index, total, link } => {
                write!(f, "Processing {index}/{total}: {link}")
            }
            LinkSucceeded { link } => write!(f, "Added {link}"),
            LinkFailed { link, reason } => write!(f, "Failed to add {link}: {reason}"),
            SubmissionSummary { succeeded, failed } => {
                write!(f, "Successfully added: {succeeded}, failed to add: {failed}")
            }
            ScreenshotSaved { path } => write!(f, "Debug screenshot saved: {}", path.display()),
            ScreenshotFailed { reason } => write!(f, "Could not take screenshot: {reason}"),
            LoginWaiting => write!(
                f,
                "Please log in in the browser window, then press Enter here when done"
            ),
            LoginFinished { by_keypress: true } => write!(f, "Login confirmed"),
            LoginFinished { by_keypress: false } => write!(f, "Login window timed out"),
        }
    }
}

fn join(versions: &[Version]) -> String {
    versions
        .iter()
        .map(Version::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);
}

/// Forwards every event to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: Event) {
        log::log!(event.level(), "{event}");
    }
}

/// Keeps events in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn contains(&self, pred: impl Fn(&Event) -> bool) -> bool {
        self.events().iter().any(pred)
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
