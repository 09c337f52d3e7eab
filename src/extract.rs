// src/extract.rs
//! Collects content links from versioned documentation tables of contents.

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use crate::error::{Error, Result};
use crate::events::{Event, EventSink};
use crate::links::write_links;
use crate::version::{self, Version, VersionSource};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const SKIPPED_PREFIXES: [&str; 3] = ["#", "javascript:", "mailto:"];

const SKIPPED_EXTENSIONS: [&str; 6] = [".png", ".jpg", ".jpeg", ".gif", ".pdf", ".zip"];

/// How many links are echoed after a successful extraction.
const SAMPLE_SIZE: usize = 5;

/// Turn an `href` found on `page_url` into a link worth keeping, if it is one.
///
/// Relative links are resolved against the page, `/html/` becomes
/// `/html-single/`, and the result must contain `scope` and must not point at
/// an image or archive.
pub fn normalize_link(href: &str, page_url: &Url, scope: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || SKIPPED_PREFIXES.iter().any(|p| href.starts_with(p)) {
        return None;
    }

    let absolute = page_url.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }

    let link = absolute.as_str().replace("/html/", "/html-single/");

    if !link.contains(scope) {
        return None;
    }

    let path = absolute.path().to_lowercase();
    if SKIPPED_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return None;
    }

    Some(link)
}

/// `base_url` in the form joined links serialize to: lowercase host, no
/// default port, no trailing slash.
pub fn link_scope(base_url: &str) -> Result<String> {
    let url = Url::parse(base_url).map_err(|source| Error::InvalidUrl {
        url: base_url.to_string(),
        source,
    })?;
    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Every kept link on an HTML page.
pub fn extract_links(html: &str, page_url: &Url, scope: &str) -> BTreeSet<String> {
    let doc = Html::parse_document(html);
    let anchors = Selector::parse("a[href]").unwrap();

    doc.select(&anchors)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| normalize_link(href, page_url, scope))
        .collect()
}

pub struct Extractor {
    client: Client,
}

impl Extractor {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { client })
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let fetch_error = |reason: String| Error::Fetch {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {status}")));
        }

        response.text().await.map_err(|e| fetch_error(e.to_string()))
    }

    async fn extract_version(&self, url: &str, scope: &str) -> Result<BTreeSet<String>> {
        let page_url = Url::parse(url).map_err(|source| Error::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        let body = self.fetch(url).await?;
        Ok(extract_links(&body, &page_url, scope))
    }

    /// Links from every version of the documentation at `base_url`, sorted.
    ///
    /// Versions that fail to load are reported and skipped. If nothing at all
    /// survives, the result is [`Error::EmptyExtraction`].
    pub async fn extract(
        &self,
        base_url: &str,
        versions: &[Version],
        sink: &dyn EventSink,
    ) -> Result<BTreeSet<String>> {
        let plan = version::resolve(base_url, versions);

        match &plan.source {
            VersionSource::Explicit {
                overridden: Some(detected),
            } => {
                sink.emit(Event::VersionDetected {
                    version: detected.clone(),
                });
                sink.emit(Event::DetectedVersionOverridden {
                    detected: detected.clone(),
                    explicit: plan.versions.clone(),
                });
            }
            VersionSource::Detected => {
                if let Some(version) = plan.versions.first() {
                    sink.emit(Event::VersionDetected {
                        version: version.clone(),
                    });
                }
            }
            VersionSource::Default => sink.emit(Event::DefaultVersion),
            VersionSource::Explicit { overridden: None } => {}
        }

        let scope = link_scope(&plan.base_url)?;
        let mut all_links = BTreeSet::new();

        for (version, url) in plan.version_urls() {
            sink.emit(Event::FetchingVersion { url: url.clone() });

            match self.extract_version(&url, &scope).await {
                Ok(links) => {
                    sink.emit(Event::VersionExtracted {
                        version,
                        count: links.len(),
                    });
                    all_links.extend(links);
                }
                Err(e) => sink.emit(Event::VersionFailed {
                    url,
                    reason: e.to_string(),
                }),
            }
        }

        if all_links.is_empty() {
            return Err(Error::EmptyExtraction {
                base_url: plan.base_url,
            });
        }

        Ok(all_links)
    }

    /// [`Extractor::extract`], then write the sorted links to `output`.
    pub async fn extract_to_file(
        &self,
        base_url: &str,
        versions: &[Version],
        output: &Path,
        sink: &dyn EventSink,
    ) -> Result<usize> {
        let links = self.extract(base_url, versions, sink).await?;
        write_links(output, &links)?;

        sink.emit(Event::ExtractionWritten {
            path: output.to_path_buf(),
            count: links.len(),
            samples: links.iter().take(SAMPLE_SIZE).cloned().collect(),
        });
        Ok(links.len())
    }
}
