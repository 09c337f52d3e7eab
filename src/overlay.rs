// src/overlay.rs
//! Best-effort removal of backdrops and dialogs covering the workspace.
//!
//! Nothing in here fails: every problem is reported and the caller moves on.

use crate::config::Pauses;
use crate::events::{Event, EventSink};
use crate::locator::Locator::{self, ButtonText, Css};
use crate::page::{Element, Page};

const OVERLAYS: &[Locator] = &[
    Css(".cdk-overlay-backdrop.upload-dialog-backdrop"),
    Css(".cdk-overlay-backdrop"),
    Css(".mdc-dialog__scrim"),
    Css(".mat-overlay-backdrop"),
    Css("[data-testid*='overlay']"),
    Css("[role='dialog']"),
    Css(".modal-backdrop"),
];

const CLOSE_BUTTONS: &[Locator] = &[
    Css("button[aria-label*='close' i]"),
    Css("button[aria-label*='dismiss' i]"),
    Css("[data-testid*='close']"),
    Css(".close-button"),
    ButtonText("×"),
    ButtonText("Close"),
];

const BACKDROP: Locator = Css(".cdk-overlay-backdrop");

/// Click every known overlay, press Escape twice, then click the first close button found.
pub async fn dismiss_overlays<P: Page>(page: &P, pauses: &Pauses, sink: &dyn EventSink) {
    page.pause(pauses.overlay_settle).await;

    for overlay in OVERLAYS {
        let found = match page.find_all(overlay).await {
            Ok(found) => found,
            Err(e) => {
                sink.emit(Event::OverlayClickFailed {
                    selector: overlay.to_string(),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let Some(first) = found.first() else {
            continue;
        };

        sink.emit(Event::OverlayFound {
            selector: overlay.to_string(),
            count: found.len(),
        });

        if let Err(e) = first.click().await {
            sink.emit(Event::OverlayClickFailed {
                selector: overlay.to_string(),
                reason: e.to_string(),
            });
            continue;
        }
        page.pause(pauses.overlay_click).await;

        let remaining = page.find_all(overlay).await.map(|r| r.len()).unwrap_or(0);
        sink.emit(Event::OverlayDismissed {
            selector: overlay.to_string(),
            remaining,
        });
    }

    for _ in 0..2 {
        if page.press_escape().await.is_ok() {
            sink.emit(Event::EscapeSent);
        }
        page.pause(pauses.escape).await;
    }

    for close in CLOSE_BUTTONS {
        if let Ok(Some(button)) = page.first(close).await {
            if button.click().await.is_ok() {
                page.pause(pauses.escape).await;
                sink.emit(Event::CloseButtonClicked {
                    selector: close.to_string(),
                });
                break;
            }
        }
    }
}

/// Click the common backdrop if there is one. Used between links in individual mode.
pub async fn dismiss_backdrop<P: Page>(page: &P, pauses: &Pauses, sink: &dyn EventSink) {
    if let Ok(Some(backdrop)) = page.first(&BACKDROP).await {
        match backdrop.click().await {
            Ok(()) => page.pause(pauses.escape).await,
            Err(e) => sink.emit(Event::OverlayClickFailed {
                selector: BACKDROP.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

/// Press Escape to back out of a half-open dialog.
pub async fn escape<P: Page>(page: &P, pauses: &Pauses, sink: &dyn EventSink) {
    if page.press_escape().await.is_ok() {
        sink.emit(Event::EscapeSent);
        page.pause(pauses.escape).await;
    }
}
