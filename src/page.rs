// src/page.rs
//! What the submitter needs from a browser tab.
//!
//! [`crate::session::DriverPage`] implements this on top of a WebDriver
//! session. The resolution strategy and the submission state machines only
//! talk to these traits.
#![allow(async_fn_in_trait)]

use std::path::Path;
use std::time::Duration;

use crate::error::Result;
use crate::locator::Locator;

pub trait Element {
    async fn attr(&self, name: &str) -> Result<Option<String>>;

    async fn click(&self) -> Result<()>;

    async fn wait_visible(&self, timeout: Duration) -> Result<()>;

    /// Replace the element's value with `text`, newlines included.
    async fn fill(&self, text: &str) -> Result<()>;
}

pub trait Page {
    type Element: Element;

    async fn goto(&self, url: &str) -> Result<()>;

    /// All current matches for `locator`. No waiting.
    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self::Element>>;

    async fn first(&self, locator: &Locator) -> Result<Option<Self::Element>> {
        Ok(self.find_all(locator).await?.into_iter().next())
    }

    async fn press_escape(&self) -> Result<()>;

    /// Fixed wait for the page to catch up.
    async fn pause(&self, duration: Duration);

    async fn title(&self) -> Result<String>;

    async fn source(&self) -> Result<String>;

    async fn screenshot(&self, path: &Path) -> Result<()>;
}
