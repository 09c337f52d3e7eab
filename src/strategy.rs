// src/strategy.rs
//! Finding workspace UI elements whose markup changes between releases.
//!
//! Every [`Target`] has an ordered table of strategy groups. Groups are tried
//! in order, selectors within a group in order, and the first match that
//! passes the target's label check wins. Nothing is scored; a later selector
//! is never consulted once an earlier one produced a usable element.

use std::fmt;

use crate::error::{Error, Result};
use crate::events::{Event, EventSink};
use crate::locator::Locator::{self, ButtonText, Css, Text};
use crate::page::{Element, Page};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Website,
    Video,
}

impl SourceKind {
    const VIDEO_DOMAINS: [&'static str; 2] = ["youtube.com", "youtu.be"];

    pub fn for_link(link: &str) -> Self {
        if Self::VIDEO_DOMAINS.iter().any(|d| link.contains(d)) {
            SourceKind::Video
        } else {
            SourceKind::Website
        }
    }
}

/// The logical things the submitter has to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    AddButton,
    SourceType(SourceKind),
    UrlInput,
    SubmitButton,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::AddButton => f.write_str("Add button"),
            Target::SourceType(SourceKind::Website) => f.write_str("Website option"),
            Target::SourceType(SourceKind::Video) => f.write_str("YouTube option"),
            Target::UrlInput => f.write_str("URL input field"),
            Target::SubmitButton => f.write_str("submit button"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StrategyGroup {
    pub name: &'static str,
    pub locators: &'static [Locator],
}

/// Rejects a match whose label contains one of `terms` (case-insensitive).
#[derive(Debug, Clone, Copy)]
pub struct Exclusion {
    pub attrs: &'static [&'static str],
    pub terms: &'static [&'static str],
}

impl Exclusion {
    pub fn rejects(&self, label: &str) -> bool {
        let label = label.to_lowercase();
        self.terms.iter().any(|t| label.contains(t))
    }
}

const ADD_BUTTON: &[StrategyGroup] = &[
    StrategyGroup {
        name: "Visible text",
        locators: &[Text("Add"), ButtonText("Add")],
    },
    StrategyGroup {
        name: "Semantic attributes",
        locators: &[Css("[data-testid*='add']"), Css("button[aria-label*='Add']")],
    },
    StrategyGroup {
        name: "Class names",
        locators: &[Css(".add-button"), ButtonText("+ Add")],
    },
];

const WEBSITE_OPTION: &[StrategyGroup] = &[StrategyGroup {
    name: "Option label",
    locators: &[
        Text("Website"),
        Text("Web page"),
        Text("Webpage"),
        Text("Web"),
        Text("URL"),
        Text("Link"),
    ],
}];

const VIDEO_OPTION: &[StrategyGroup] = &[StrategyGroup {
    name: "Option label",
    locators: &[
        Text("YouTube"),
        Text("Youtube"),
        Text("YouTube video"),
        Text("Video"),
    ],
}];

const URL_INPUT: &[StrategyGroup] = &[
    StrategyGroup {
        name: "Semantic search",
        locators: &[
            Css("input[placeholder*='Enter URL']"),
            Css("input[placeholder*='Paste URL']"),
            Css("input[placeholder*='Add URL']"),
            Css("input[placeholder*='https://']"),
            Css("input[placeholder*='http://']"),
            Css("input[placeholder*='URL' i]"),
            Css("textarea[placeholder*='URL' i]"),
            Css("input[aria-label*='URL' i]"),
            Css("input[title*='URL' i]"),
            Css("input[placeholder*='website' i]"),
            Css("input[placeholder*='link' i]"),
            Css("input[placeholder*='YouTube' i]"),
            Css("input[type='url']"),
        ],
    },
    StrategyGroup {
        name: "Dialog structure",
        locators: &[
            Css("[role='dialog'] input[type='text']"),
            Css(".mdc-dialog input[type='text']"),
            Css(".mat-dialog-container input[type='text']"),
            Css("[role='dialog'] textarea"),
            Css(".mdc-dialog textarea"),
        ],
    },
    StrategyGroup {
        name: "Form context",
        locators: &[
            Css("form input[type='text']"),
            Css("form input[type='url']"),
            Css("form textarea"),
        ],
    },
    StrategyGroup {
        name: "Material UI",
        locators: &[
            Css("[role='dialog'] .mat-mdc-input-element"),
            Css(".mdc-dialog .mat-mdc-input-element"),
            Css(".mat-dialog-container .mat-mdc-input-element"),
            Css(".mat-mdc-input-element"),
            Css(".mdc-text-field__input"),
        ],
    },
    StrategyGroup {
        name: "Last resort",
        locators: &[Css("input[type='text']"), Css("textarea")],
    },
];

const SUBMIT_BUTTON: &[StrategyGroup] = &[
    StrategyGroup {
        name: "Button text",
        locators: &[
            ButtonText("Insert"),
            ButtonText("Add"),
            ButtonText("Submit"),
            ButtonText("Save"),
        ],
    },
    StrategyGroup {
        name: "Form semantics",
        locators: &[Css("button[type='submit']")],
    },
    StrategyGroup {
        name: "Material UI",
        locators: &[Css(".mat-primary"), Css("button.mdc-button--raised")],
    },
];

const INPUT_EXCLUSION: Exclusion = Exclusion {
    attrs: &["placeholder", "aria-label"],
    terms: &["search", "emoji"],
};

impl Target {
    pub fn groups(&self) -> &'static [StrategyGroup] {
        match self {
            Target::AddButton => ADD_BUTTON,
            Target::SourceType(SourceKind::Website) => WEBSITE_OPTION,
            Target::SourceType(SourceKind::Video) => VIDEO_OPTION,
            Target::UrlInput => URL_INPUT,
            Target::SubmitButton => SUBMIT_BUTTON,
        }
    }

    pub fn exclusion(&self) -> Option<Exclusion> {
        match self {
            Target::UrlInput => Some(INPUT_EXCLUSION),
            _ => None,
        }
    }
}

/// An element found for a target, with the selector that found it.
#[derive(Debug, Clone)]
pub struct Resolved<E> {
    pub element: E,
    pub group: &'static str,
    pub locator: Locator,
}

async fn label_of<E: Element>(element: &E, attrs: &[&str]) -> Result<String> {
    let mut label = String::new();
    for attr in attrs {
        if let Some(value) = element.attr(attr).await? {
            label.push_str(&value);
            label.push(' ');
        }
    }
    Ok(label.trim_end().to_string())
}

/// Find `target` on `page`.
///
/// Selector errors are reported and treated as a miss. Returns
/// [`Error::ElementNotFound`] when every selector of every group misses.
pub async fn resolve<P: Page>(
    page: &P,
    target: Target,
    sink: &dyn EventSink,
) -> Result<Resolved<P::Element>> {
    let exclusion = target.exclusion();

    for group in target.groups() {
        sink.emit(Event::StrategyTried {
            target: target.to_string(),
            group: group.name,
        });

        for locator in group.locators {
            let element = match page.first(locator).await {
                Ok(Some(element)) => element,
                Ok(None) => continue,
                Err(e) => {
                    sink.emit(Event::SelectorFailed {
                        target: target.to_string(),
                        selector: locator.to_string(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if let Some(exclusion) = exclusion {
                let label = match label_of(&element, exclusion.attrs).await {
                    Ok(label) => label,
                    Err(e) => {
                        sink.emit(Event::SelectorFailed {
                            target: target.to_string(),
                            selector: locator.to_string(),
                            reason: e.to_string(),
                        });
                        continue;
                    }
                };
                if exclusion.rejects(&label) {
                    sink.emit(Event::SelectorSkipped {
                        target: target.to_string(),
                        selector: locator.to_string(),
                        label,
                    });
                    continue;
                }
            }

            sink.emit(Event::ElementResolved {
                target: target.to_string(),
                group: group.name,
                selector: locator.to_string(),
            });
            return Ok(Resolved {
                element,
                group: group.name,
                locator: *locator,
            });
        }
    }

    Err(Error::not_found(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingSink;
    use crate::page::fake::FakePage;

    #[test]
    fn video_links_pick_video_option() {
        assert_eq!(
            SourceKind::for_link("https://www.youtube.com/watch?v=abc"),
            SourceKind::Video
        );
        assert_eq!(SourceKind::for_link("https://youtu.be/abc"), SourceKind::Video);
        assert_eq!(
            SourceKind::for_link("https://docs.example.com/guide"),
            SourceKind::Website
        );
    }

    #[test]
    fn exclusion_is_case_insensitive() {
        assert!(INPUT_EXCLUSION.rejects("Search sources"));
        assert!(INPUT_EXCLUSION.rejects("Pick an EMOJI"));
        assert!(!INPUT_EXCLUSION.rejects("Paste URL"));
    }

    #[tokio::test]
    async fn earlier_group_wins_over_later_group() {
        let page = FakePage::new()
            .with(Css("form textarea"), "form-area")
            .with(Css("input[type='url']"), "url-input");
        let sink = RecordingSink::new();

        let found = resolve(&page, Target::UrlInput, &sink).await.unwrap();

        assert_eq!(found.element.id, "url-input");
        assert_eq!(found.group, "Semantic search");
        assert_eq!(found.locator, Css("input[type='url']"));
    }

    #[tokio::test]
    async fn earlier_selector_wins_within_group() {
        let page = FakePage::new()
            .with(ButtonText("Save"), "save")
            .with(ButtonText("Insert"), "insert");

        let found = resolve(&page, Target::SubmitButton, &RecordingSink::new())
            .await
            .unwrap();

        assert_eq!(found.element.id, "insert");
    }

    #[tokio::test]
    async fn excluded_label_falls_through_to_next_match() {
        let page = FakePage::new();
        let search = page
            .element("search-box")
            .with_attr("placeholder", "Search sources");
        let page = page
            .with_element(Css("[role='dialog'] input[type='text']"), search)
            .with(Css("form textarea"), "dialog-area");
        let sink = RecordingSink::new();

        let found = resolve(&page, Target::UrlInput, &sink).await.unwrap();

        assert_eq!(found.element.id, "dialog-area");
        assert_eq!(found.group, "Form context");
        assert!(sink.contains(|e| matches!(
            e,
            Event::SelectorSkipped { label, .. } if label == "Search sources"
        )));
    }

    #[tokio::test]
    async fn aria_label_is_checked_too() {
        let page = FakePage::new();
        let emoji = page.element("emoji").with_attr("aria-label", "Emoji picker");
        let page = page
            .with_element(Css("input[type='text']"), emoji)
            .with(Css("textarea"), "fallback");

        let found = resolve(&page, Target::UrlInput, &RecordingSink::new())
            .await
            .unwrap();

        assert_eq!(found.element.id, "fallback");
    }

    #[tokio::test]
    async fn buttons_are_not_label_checked() {
        let page = FakePage::new();
        let add = page.element("add").with_attr("aria-label", "Search and add");
        let page = page.with_element(Text("Add"), add);

        let found = resolve(&page, Target::AddButton, &RecordingSink::new())
            .await
            .unwrap();

        assert_eq!(found.element.id, "add");
    }

    #[tokio::test]
    async fn nothing_matching_is_not_found() {
        let page = FakePage::new();
        let sink = RecordingSink::new();

        let result = resolve(&page, Target::SubmitButton, &sink).await;

        assert!(matches!(
            result,
            Err(Error::ElementNotFound { target }) if target == "submit button"
        ));
        let tried = sink
            .events()
            .into_iter()
            .filter(|e| matches!(e, Event::StrategyTried { .. }))
            .count();
        assert_eq!(tried, SUBMIT_BUTTON.len());
    }
}
