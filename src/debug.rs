// src/debug.rs
//! Diagnostics for when the workspace UI does not look the way we expect.

use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::error::Result;
use crate::events::{Event, EventSink};
use crate::locator::Locator;
use crate::page::{Element, Page};

const INPUTS: Locator = Locator::Css("input");

/// How many inputs are described when the URL field cannot be found.
pub const DESCRIBED_INPUTS: usize = 10;

pub fn screenshot_path(step: &str, at: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!(
        "debug_screenshot_{step}_{}.png",
        at.format("%Y%m%d_%H%M%S")
    ))
}

/// Save a screenshot named after `step`. Failure is reported, never returned.
pub async fn capture_screenshot<P: Page>(
    page: &P,
    step: &str,
    sink: &dyn EventSink,
) -> Option<PathBuf> {
    let path = screenshot_path(step, Local::now());
    match page.screenshot(&path).await {
        Ok(()) => {
            sink.emit(Event::ScreenshotSaved { path: path.clone() });
            Some(path)
        }
        Err(e) => {
            sink.emit(Event::ScreenshotFailed {
                reason: e.to_string(),
            });
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    pub title: String,
    pub material_ui: bool,
    pub dialog_role: bool,
    pub inspected_at: DateTime<Local>,
}

/// Note which UI toolkit markers the workspace page carries.
pub async fn inspect_page<P: Page>(page: &P, sink: &dyn EventSink) -> Result<PageInfo> {
    let title = page.title().await?;
    let source = page.source().await?;

    let info = PageInfo {
        title,
        material_ui: ["mat-mdc-", ".mat-", ".mdc-"]
            .iter()
            .any(|marker| source.contains(marker)),
        dialog_role: source.contains(r#"role="dialog""#),
        inspected_at: Local::now(),
    };

    sink.emit(Event::PageInspected {
        title: info.title.clone(),
        material_ui: info.material_ui,
        dialog_role: info.dialog_role,
    });
    Ok(info)
}

/// Report type, placeholder and aria-label of the first few inputs on the page.
pub async fn describe_inputs<P: Page>(page: &P, sink: &dyn EventSink) -> Result<usize> {
    let inputs = page.find_all(&INPUTS).await?;

    for (index, input) in inputs.iter().take(DESCRIBED_INPUTS).enumerate() {
        sink.emit(Event::InputDescribed {
            index: index + 1,
            kind: input
                .attr("type")
                .await?
                .unwrap_or_else(|| "text".to_string()),
            placeholder: input.attr("placeholder").await?.unwrap_or_default(),
            aria_label: input.attr("aria-label").await?.unwrap_or_default(),
        });
    }

    Ok(inputs.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingSink;
    use crate::page::fake::{Action, FakePage};
    use chrono::TimeZone;

    #[test]
    fn screenshot_names_carry_step_and_time() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            screenshot_path("add_button", at),
            PathBuf::from("debug_screenshot_add_button_20240309_140507.png")
        );
    }

    #[tokio::test]
    async fn capture_goes_through_page() {
        let page = FakePage::new();
        let sink = RecordingSink::new();

        let path = capture_screenshot(&page, "submit", &sink).await.unwrap();

        assert!(page
            .actions()
            .contains(&Action::Screenshot(path.display().to_string())));
        assert!(sink.contains(|e| matches!(e, Event::ScreenshotSaved { .. })));
    }

    #[tokio::test]
    async fn inspection_spots_toolkit_markers() {
        let page = FakePage::new().with_page(
            "Notebook",
            r#"<div class="mat-mdc-dialog-container" role="dialog"></div>"#,
        );

        let info = inspect_page(&page, &RecordingSink::new()).await.unwrap();

        assert_eq!(info.title, "Notebook");
        assert!(info.material_ui);
        assert!(info.dialog_role);
    }

    #[tokio::test]
    async fn describes_at_most_ten_inputs() {
        let mut page = FakePage::new();
        for i in 0..12 {
            let input = page
                .element(&format!("input-{i}"))
                .with_attr("placeholder", "Search");
            page = page.with_element(INPUTS, input);
        }
        let sink = RecordingSink::new();

        let total = describe_inputs(&page, &sink).await.unwrap();

        assert_eq!(total, 12);
        let described: Vec<_> = sink
            .events()
            .into_iter()
            .filter_map(|e| match e {
                Event::InputDescribed {
                    kind, placeholder, ..
                } => Some((kind, placeholder)),
                _ => None,
            })
            .collect();
        assert_eq!(described.len(), DESCRIBED_INPUTS);
        assert_eq!(described[0], ("text".to_string(), "Search".to_string()));
    }
}
