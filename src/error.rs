// src/error.rs
use std::path::PathBuf;

use thirtyfour::error::WebDriverError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A version page could not be fetched. Extraction skips that version.
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// No version produced a single usable link.
    #[error("no valid links extracted from {base_url}")]
    EmptyExtraction { base_url: String },

    /// None of the strategies for a UI target produced a usable element.
    #[error("could not find {target}")]
    ElementNotFound { target: String },

    /// One link could not be registered in individual mode.
    #[error("failed to add {link}: {reason}")]
    PerLinkSubmission { link: String, reason: String },

    #[error("links file not found: {}", .0.display())]
    MissingLinksFile(PathBuf),

    #[error("no links to submit")]
    NoLinks,

    #[error("invalid version token '{0}'")]
    InvalidVersion(String),

    #[error("invalid url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    WebDriver(#[from] WebDriverError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn not_found(target: impl ToString) -> Self {
        Error::ElementNotFound {
            target: target.to_string(),
        }
    }
}
