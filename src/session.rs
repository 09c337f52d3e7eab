// src/session.rs
//! WebDriver session lifecycle and the [`Page`] implementation on top of it.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use serde_json::Value;
use thirtyfour::prelude::*;
use thirtyfour::{support, Capabilities, ChromiumLikeCapabilities, Key};

use crate::config::{BrowserKind, BrowserSettings};
use crate::error::Result;
use crate::locator::Locator;
use crate::page::{Element, Page};

const FILL_SCRIPT: &str = r#"
    const el = arguments[0];
    el.value = arguments[1];
    el.dispatchEvent(new Event('input', { bubbles: true }));
    el.dispatchEvent(new Event('change', { bubbles: true }));
"#;

fn capabilities(settings: &BrowserSettings) -> WebDriverResult<Capabilities> {
    let profile = settings.profile_path.display().to_string();

    match settings.kind {
        BrowserKind::Firefox => {
            let mut caps = DesiredCapabilities::firefox();
            if settings.headless {
                caps.set_headless()?;
            }
            caps.add_arg("-profile")?;
            caps.add_arg(&profile)?;
            Ok(caps.into())
        }
        BrowserKind::Chrome => {
            let mut caps = DesiredCapabilities::chrome();
            if settings.headless {
                caps.set_headless()?;
            }
            caps.add_arg(&format!("--user-data-dir={profile}"))?;
            Ok(caps.into())
        }
    }
}

/// Quits the session when dropped without [`SessionGuard::close`].
struct SessionGuard {
    driver: Option<WebDriver>,
}

impl SessionGuard {
    async fn close(mut self) {
        if let Some(driver) = self.driver.take() {
            if let Err(e) = driver.quit().await {
                log::warn!("Failed to close browser session: {e}");
            }
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.take() {
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                handle.spawn(async move {
                    let _ = driver.quit().await;
                });
            }
        }
    }
}

/// Open a browser on the configured profile, run `work`, and quit the browser
/// whatever `work` returned.
pub async fn with_session<T, F, Fut>(settings: &BrowserSettings, work: F) -> Result<T>
where
    F: FnOnce(DriverPage) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let caps = capabilities(settings)?;
    if settings.headless {
        log::info!("Running in headless mode");
    }
    log::debug!(
        "Connecting to {} with profile {}",
        settings.webdriver_url,
        settings.profile_path.display()
    );

    let driver = WebDriver::new(&settings.webdriver_url, caps).await?;
    let guard = SessionGuard {
        driver: Some(driver.clone()),
    };

    let result = work(DriverPage { driver }).await;
    guard.close().await;
    result
}

#[derive(Debug, Clone)]
pub struct DriverPage {
    driver: WebDriver,
}

#[derive(Debug, Clone)]
pub struct DriverElement {
    element: WebElement,
    driver: WebDriver,
}

impl Element for DriverElement {
    async fn attr(&self, name: &str) -> Result<Option<String>> {
        Ok(self.element.attr(name).await?)
    }

    async fn click(&self) -> Result<()> {
        self.element.click().await?;
        Ok(())
    }

    async fn wait_visible(&self, timeout: Duration) -> Result<()> {
        self.element
            .wait_until()
            .wait(timeout, Duration::from_millis(250))
            .displayed()
            .await?;
        Ok(())
    }

    async fn fill(&self, text: &str) -> Result<()> {
        self.element.clear().await?;
        self.driver
            .execute(
                FILL_SCRIPT,
                vec![self.element.to_json()?, Value::String(text.to_string())],
            )
            .await?;
        Ok(())
    }
}

impl Page for DriverPage {
    type Element = DriverElement;

    async fn goto(&self, url: &str) -> Result<()> {
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<DriverElement>> {
        let found = self.driver.find_all(locator.to_by()).await?;
        Ok(found
            .into_iter()
            .map(|element| DriverElement {
                element,
                driver: self.driver.clone(),
            })
            .collect())
    }

    async fn press_escape(&self) -> Result<()> {
        self.driver
            .action_chain()
            .send_keys(Key::Escape)
            .perform()
            .await?;
        Ok(())
    }

    async fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            support::sleep(duration).await;
        }
    }

    async fn title(&self) -> Result<String> {
        Ok(self.driver.title().await?)
    }

    async fn source(&self) -> Result<String> {
        Ok(self.driver.source().await?)
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        self.driver.screenshot(path).await?;
        Ok(())
    }
}
