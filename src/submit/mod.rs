// src/submit/mod.rs
//! Registering links as sources in a workspace.
//!
//! Bulk mode pastes every URL into one dialog; individual mode opens the
//! dialog once per link. Both share the steps below.

mod bulk;
mod individual;

pub use bulk::{run_bulk, BulkStage, BulkState};
pub use individual::{run_individual, SubmissionOutcome, SubmissionReport};

use crate::config::{BrowserSettings, Pauses, SubmitSettings};
use crate::debug;
use crate::error::{Error, Result};
use crate::events::{Event, EventSink};
use crate::links::{dedup_preserving_order, write_bulk_dump};
use crate::page::{Element, Page};
use crate::session::with_session;
use crate::strategy::{resolve, SourceKind, Target};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Bulk,
    Individual,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Bulk(BulkState),
    Individual(SubmissionReport),
}

/// The page plus what every step needs alongside it.
pub(crate) struct Ui<'a, P: Page> {
    pub page: &'a P,
    pub pauses: &'a Pauses,
    pub sink: &'a dyn EventSink,
}

impl<P: Page> Ui<'_, P> {
    pub async fn open_add_dialog(&self) -> Result<()> {
        let add = resolve(self.page, Target::AddButton, self.sink).await?;
        add.element.wait_visible(self.pauses.visible_timeout).await?;
        add.element.click().await?;
        self.page.pause(self.pauses.dialog_open).await;
        Ok(())
    }

    pub async fn select_source_type(&self, kind: SourceKind) -> Result<()> {
        let option = resolve(self.page, Target::SourceType(kind), self.sink).await?;
        option.element.click().await?;
        self.page.pause(self.pauses.dialog_open).await;
        Ok(())
    }

    /// Replace the URL field's content with `text`.
    pub async fn enter_urls(&self, text: &str) -> Result<()> {
        let input = match resolve(self.page, Target::UrlInput, self.sink).await {
            Ok(input) => input,
            Err(e) => {
                // Logged for diagnosis only; the lookup error is returned.
                let _ = debug::describe_inputs(self.page, self.sink).await;
                return Err(e);
            }
        };
        input.element.click().await?;
        input.element.fill(text).await?;
        self.page.pause(self.pauses.input_settle).await;
        Ok(())
    }

    pub async fn submit(&self) -> Result<()> {
        let button = resolve(self.page, Target::SubmitButton, self.sink).await?;
        button.element.click().await?;
        Ok(())
    }

    pub async fn screenshot(&self, step: &str) {
        debug::capture_screenshot(self.page, step, self.sink).await;
    }
}

/// Open a browser session on the workspace and register `links` in the given mode.
///
/// Repeated links are submitted once. Bulk mode first writes the manual
/// fallback file and points at it whenever the run fails, including when no
/// browser session can be opened. If no link in the list is an HTTP(S) URL,
/// nothing is opened and [`Error::NoLinks`] is returned.
pub async fn submit_links(
    browser: &BrowserSettings,
    settings: &SubmitSettings,
    links: &[String],
    mode: Mode,
    sink: &dyn EventSink,
) -> Result<Submission> {
    let links = dedup_preserving_order(links.iter().cloned());
    if links.is_empty() {
        return Err(Error::NoLinks);
    }

    match mode {
        Mode::Bulk => {
            let urls = write_bulk_dump(&settings.bulk_dump, &links, sink)?;
            if urls.is_empty() {
                return Err(Error::NoLinks);
            }

            let session = with_session(browser, |page| async move {
                Ok(run_bulk(&page, settings, &urls, sink).await)
            })
            .await;
            match session {
                Ok(state) => Ok(Submission::Bulk(state)),
                Err(e) => {
                    sink.emit(Event::SubmissionFailed {
                        stage: BulkStage::Start.name(),
                        reason: e.to_string(),
                    });
                    sink.emit(Event::ManualFallback {
                        path: settings.bulk_dump.clone(),
                    });
                    Err(e)
                }
            }
        }
        Mode::Individual => {
            let links = &links;
            let report = with_session(browser, |page| async move {
                run_individual(&page, settings, links, sink).await
            })
            .await?;
            Ok(Submission::Individual(report))
        }
    }
}
