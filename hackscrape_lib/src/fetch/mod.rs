//! Page loading.
//!
//! A [`PageFetcher`] owns the browsing session for one run and hands out
//! [`FetchedPage`]s: the gallery page, then one fresh page per detail URL.
//! Two engines exist: headless Chromium and plain HTTP.

use std::time::Duration;

use async_trait::async_trait;
use devpost_scrape::SelectorChain;

pub mod chrome;
pub mod http;

pub use chrome::{ChromeFetcher, ChromeOptions};
pub use http::HttpFetcher;

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("failed to launch browser: {0}")]
    Launch(String),
    #[error("failed to load {url}: {reason}")]
    Navigation {
        url: String,
        status: Option<u16>,
        reason: String,
    },
    #[error("timed out after {secs}s waiting for {what}")]
    Timeout { what: String, secs: u64 },
    #[error("browser error: {0}")]
    Browser(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl FetchError {
    pub(crate) fn status(url: &str, status: u16) -> Self {
        Self::Navigation {
            url: url.to_string(),
            status: Some(status),
            reason: format!("HTTP status {}", status),
        }
    }
}

/// True for 2xx statuses.
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// One browsing session.
#[async_trait]
pub trait PageFetcher: Send + Sync + Sized {
    type Page: FetchedPage;

    /// Navigates to the gallery. A non-2xx response is not an error here;
    /// the caller inspects [`FetchedPage::status`] so it can capture the
    /// error page first.
    async fn open_gallery(&self, url: &str) -> Result<Self::Page, FetchError>;

    /// Opens `url` in a fresh page and waits for it to settle.
    async fn open_detail(&self, url: &str) -> Result<Self::Page, FetchError>;

    /// Releases the session.
    async fn shutdown(self) -> Result<(), FetchError>;
}

/// A loaded page.
#[async_trait]
pub trait FetchedPage: Send + Sync + Sized {
    /// URL relative links resolve against.
    fn url(&self) -> &str;

    /// HTTP status of the main document, when known.
    fn status(&self) -> Option<u16>;

    /// Waits until any selector of `selectors` matches.
    async fn wait_for_any(
        &self,
        selectors: &SelectorChain,
        timeout: Duration,
    ) -> Result<(), FetchError>;

    /// Current serialized document.
    async fn html(&self) -> Result<String, FetchError>;

    /// Full-page PNG, when the engine renders.
    async fn screenshot(&self) -> Result<Option<Vec<u8>>, FetchError>;

    async fn close(self) -> Result<(), FetchError>;
}
