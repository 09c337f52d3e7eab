// src/config.rs
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::links::DEFAULT_BULK_DUMP;

pub const DEFAULT_PROFILE_PATH: &str = "~/.browser_automation";
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";
pub const SIGN_IN_URL: &str = "https://accounts.google.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrowserKind {
    #[default]
    Firefox,
    Chrome,
}

impl BrowserKind {
    fn from_env_value(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "chrome" | "chromium" => BrowserKind::Chrome,
            _ => BrowserKind::Firefox,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BrowserSettings {
    pub kind: BrowserKind,
    pub headless: bool,
    pub webdriver_url: String,
    /// Persistent profile holding the signed-in session.
    pub profile_path: PathBuf,
}

impl BrowserSettings {
    /// Settings for `profile_path`, with `HEADLESS`, `WEBDRIVER_URL` and `BROWSER` read from the environment.
    pub fn from_env(profile_path: &str) -> Self {
        let headless = env::var("HEADLESS")
            .unwrap_or_else(|_| "false".to_string())
            .to_lowercase()
            == "true";

        Self {
            kind: env::var("BROWSER")
                .map(|v| BrowserKind::from_env_value(&v))
                .unwrap_or_default(),
            headless,
            webdriver_url: env::var("WEBDRIVER_URL")
                .unwrap_or_else(|_| DEFAULT_WEBDRIVER_URL.to_string()),
            profile_path: expand_home(profile_path),
        }
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix('~') {
        Some(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest.trim_start_matches('/')),
            None => PathBuf::from(path),
        },
        None => PathBuf::from(path),
    }
}

/// Fixed waits between UI actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pauses {
    pub page_load: Duration,
    pub overlay_settle: Duration,
    pub overlay_click: Duration,
    pub escape: Duration,
    pub dialog_open: Duration,
    pub input_settle: Duration,
    pub bulk_processing: Duration,
    pub link_processing: Duration,
    pub visible_timeout: Duration,
    pub login_window: Duration,
}

impl Default for Pauses {
    fn default() -> Self {
        Self {
            page_load: Duration::from_secs(3),
            overlay_settle: Duration::from_secs(5),
            overlay_click: Duration::from_millis(1500),
            escape: Duration::from_secs(1),
            dialog_open: Duration::from_secs(2),
            input_settle: Duration::from_secs(1),
            bulk_processing: Duration::from_secs(5),
            link_processing: Duration::from_secs(3),
            visible_timeout: Duration::from_secs(10),
            login_window: Duration::from_secs(600),
        }
    }
}

impl Pauses {
    pub fn none() -> Self {
        Self {
            page_load: Duration::ZERO,
            overlay_settle: Duration::ZERO,
            overlay_click: Duration::ZERO,
            escape: Duration::ZERO,
            dialog_open: Duration::ZERO,
            input_settle: Duration::ZERO,
            bulk_processing: Duration::ZERO,
            link_processing: Duration::ZERO,
            visible_timeout: Duration::ZERO,
            login_window: Duration::ZERO,
        }
    }
}

/// Everything the submitter needs besides the links.
#[derive(Debug, Clone)]
pub struct SubmitSettings {
    pub workspace_url: String,
    pub bulk_dump: PathBuf,
    pub screenshot_on_failure: bool,
    pub pauses: Pauses,
}

impl SubmitSettings {
    pub fn new(workspace_url: &str) -> Self {
        Self {
            workspace_url: workspace_url.to_string(),
            bulk_dump: PathBuf::from(DEFAULT_BULK_DUMP),
            screenshot_on_failure: false,
            pauses: Pauses::default(),
        }
    }

    pub fn bulk_dump(mut self, path: &Path) -> Self {
        self.bulk_dump = path.to_path_buf();
        self
    }

    pub fn screenshot_on_failure(mut self, enabled: bool) -> Self {
        self.screenshot_on_failure = enabled;
        self
    }

    pub fn pauses(mut self, pauses: Pauses) -> Self {
        self.pauses = pauses;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_home_prefix() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(
            expand_home("~/.browser_automation"),
            home.join(".browser_automation")
        );
        assert_eq!(expand_home("/tmp/profile"), PathBuf::from("/tmp/profile"));
    }

    #[test]
    fn browser_kind_defaults_to_firefox() {
        assert_eq!(BrowserKind::from_env_value("Chrome"), BrowserKind::Chrome);
        assert_eq!(BrowserKind::from_env_value("firefox"), BrowserKind::Firefox);
        assert_eq!(BrowserKind::from_env_value("lynx"), BrowserKind::Firefox);
    }
}
