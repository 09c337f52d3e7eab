// src/submit/individual.rs
use crate::config::SubmitSettings;
use crate::error::{Error, Result};
use crate::events::{Event, EventSink};
use crate::overlay;
use crate::page::Page;
use crate::strategy::{SourceKind, Target};

use super::Ui;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Success,
    Failed(String),
}

/// Per-link results of an individual-mode run, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionReport {
    pub outcomes: Vec<(String, SubmissionOutcome)>,
}

impl SubmissionReport {
    pub fn succeeded(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == SubmissionOutcome::Success)
            .map(|(link, _)| link.as_str())
            .collect()
    }

    pub fn failed(&self) -> Vec<(&str, &str)> {
        self.outcomes
            .iter()
            .filter_map(|(link, o)| match o {
                SubmissionOutcome::Failed(reason) => Some((link.as_str(), reason.as_str())),
                SubmissionOutcome::Success => None,
            })
            .collect()
    }
}

fn per_link(link: &str, e: Error) -> Error {
    Error::PerLinkSubmission {
        link: link.to_string(),
        reason: e.to_string(),
    }
}

impl<P: Page> Ui<'_, P> {
    async fn submit_one(&self, link: &str) -> Result<()> {
        overlay::dismiss_backdrop(self.page, self.pauses, self.sink).await;

        let steps = async {
            self.open_add_dialog().await?;
            self.select_source_type(SourceKind::for_link(link)).await?;
            self.enter_urls(link).await?;
            self.submit().await
        };

        if let Err(e) = steps.await {
            // No Add control means no dialog to back out of.
            let add_missing = matches!(
                &e,
                Error::ElementNotFound { target } if *target == Target::AddButton.to_string()
            );
            if !add_missing {
                overlay::escape(self.page, self.pauses, self.sink).await;
            }
            return Err(per_link(link, e));
        }

        self.page.pause(self.pauses.link_processing).await;
        Ok(())
    }
}

/// Add `links` one at a time. A failed link is recorded and the run moves on.
pub async fn run_individual<P: Page>(
    page: &P,
    settings: &SubmitSettings,
    links: &[String],
    sink: &dyn EventSink,
) -> Result<SubmissionReport> {
    let ui = Ui {
        page,
        pauses: &settings.pauses,
        sink,
    };

    page.goto(&settings.workspace_url).await?;
    page.pause(settings.pauses.page_load).await;

    let mut report = SubmissionReport::default();

    for (index, link) in links.iter().enumerate() {
        sink.emit(Event::LinkStarted {
            index: index + 1,
            total: links.len(),
            link: link.clone(),
        });

        match ui.submit_one(link).await {
            Ok(()) => {
                sink.emit(Event::LinkSucceeded { link: link.clone() });
                report
                    .outcomes
                    .push((link.clone(), SubmissionOutcome::Success));
            }
            Err(e) => {
                sink.emit(Event::LinkFailed {
                    link: link.clone(),
                    reason: e.to_string(),
                });
                if settings.screenshot_on_failure {
                    ui.screenshot(&format!("link_{}", index + 1)).await;
                }
                report
                    .outcomes
                    .push((link.clone(), SubmissionOutcome::Failed(e.to_string())));
            }
        }
    }

    sink.emit(Event::SubmissionSummary {
        succeeded: report.succeeded().len(),
        failed: report.failed().len(),
    });
    Ok(report)
}
