// src/submit/bulk.rs
use crate::config::SubmitSettings;
use crate::debug;
use crate::error::Result;
use crate::events::{Event, EventSink};
use crate::overlay;
use crate::page::Page;
use crate::strategy::SourceKind;

use super::Ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkStage {
    Start,
    NavigatedToWorkspace,
    OverlaysDismissed,
    AddDialogOpened,
    SourceTypeSelected,
    UrlsEntered,
    Submitted,
    Done,
}

impl BulkStage {
    pub fn name(&self) -> &'static str {
        match self {
            BulkStage::Start => "start",
            BulkStage::NavigatedToWorkspace => "navigated_to_workspace",
            BulkStage::OverlaysDismissed => "overlays_dismissed",
            BulkStage::AddDialogOpened => "add_dialog_opened",
            BulkStage::SourceTypeSelected => "source_type_selected",
            BulkStage::UrlsEntered => "urls_entered",
            BulkStage::Submitted => "submitted",
            BulkStage::Done => "done",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkState {
    At(BulkStage),
    /// Stopped after `after`; the rest has to be done by hand from the dump file.
    Failed { after: BulkStage, reason: String },
}

impl BulkState {
    pub fn is_done(&self) -> bool {
        *self == BulkState::At(BulkStage::Done)
    }
}

struct BulkSubmission<'a, P: Page> {
    ui: Ui<'a, P>,
    workspace_url: &'a str,
    batch: String,
    count: usize,
}

impl<P: Page> BulkSubmission<'_, P> {
    /// Perform the work that leads out of `stage`.
    async fn advance(&self, stage: BulkStage) -> Result<BulkStage> {
        let ui = &self.ui;
        match stage {
            BulkStage::Start => {
                ui.page.goto(self.workspace_url).await?;
                ui.page.pause(ui.pauses.page_load).await;
                let _ = debug::inspect_page(ui.page, ui.sink).await;
                Ok(BulkStage::NavigatedToWorkspace)
            }
            BulkStage::NavigatedToWorkspace => {
                overlay::dismiss_overlays(ui.page, ui.pauses, ui.sink).await;
                Ok(BulkStage::OverlaysDismissed)
            }
            BulkStage::OverlaysDismissed => {
                ui.open_add_dialog().await?;
                Ok(BulkStage::AddDialogOpened)
            }
            BulkStage::AddDialogOpened => {
                ui.select_source_type(SourceKind::Website).await?;
                Ok(BulkStage::SourceTypeSelected)
            }
            BulkStage::SourceTypeSelected => {
                ui.enter_urls(&self.batch).await?;
                Ok(BulkStage::UrlsEntered)
            }
            BulkStage::UrlsEntered => {
                ui.submit().await?;
                ui.page.pause(ui.pauses.bulk_processing).await;
                ui.sink.emit(Event::BulkSubmitted { count: self.count });
                Ok(BulkStage::Submitted)
            }
            BulkStage::Submitted | BulkStage::Done => Ok(BulkStage::Done),
        }
    }

    async fn run(&self) -> BulkState {
        let mut stage = BulkStage::Start;
        loop {
            match self.advance(stage).await {
                Ok(BulkStage::Done) => {
                    self.ui.sink.emit(Event::StageReached {
                        stage: BulkStage::Done.name(),
                    });
                    return BulkState::At(BulkStage::Done);
                }
                Ok(next) => {
                    self.ui.sink.emit(Event::StageReached { stage: next.name() });
                    stage = next;
                }
                Err(e) => {
                    return BulkState::Failed {
                        after: stage,
                        reason: e.to_string(),
                    }
                }
            }
        }
    }
}

/// Paste all of `urls` into the workspace's add-source dialog in one go.
///
/// A failure at any stage ends the run; the manual fallback file named in
/// `settings` is then the way to finish the job.
pub async fn run_bulk<P: Page>(
    page: &P,
    settings: &SubmitSettings,
    urls: &[String],
    sink: &dyn EventSink,
) -> BulkState {
    let submission = BulkSubmission {
        ui: Ui {
            page,
            pauses: &settings.pauses,
            sink,
        },
        workspace_url: &settings.workspace_url,
        batch: urls.join("\n"),
        count: urls.len(),
    };

    let state = submission.run().await;

    if let BulkState::Failed { after, reason } = &state {
        sink.emit(Event::SubmissionFailed {
            stage: after.name(),
            reason: reason.clone(),
        });
        if settings.screenshot_on_failure {
            submission.ui.screenshot(after.name()).await;
        }
        sink.emit(Event::ManualFallback {
            path: settings.bulk_dump.clone(),
        });
    }

    state
}
