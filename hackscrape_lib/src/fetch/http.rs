//! Plain HTTP engine.
//!
//! Devpost renders galleries and detail pages on the server, so fetching
//! the markup is enough for extraction. Nothing is rendered: screenshots
//! are unavailable and waiting for content is a single presence check.

use std::time::Duration;

use async_trait::async_trait;
use devpost_scrape::SelectorChain;
use scraper::Html;

use super::{is_success, FetchError, FetchedPage, PageFetcher};

pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { http })
    }

    async fn get(&self, url: &str) -> Result<StaticPage, FetchError> {
        let resp = self
            .http
            .get(url)
            .header("accept", "text/html,application/xhtml+xml")
            .header("accept-language", "en-US,en;q=0.9")
            .send()
            .await?;
        let status = resp.status().as_u16();
        let final_url = resp.url().to_string();
        let html = resp.text().await?;
        tracing::debug!("GET {} -> {} ({} bytes)", url, status, html.len());
        Ok(StaticPage {
            url: final_url,
            status,
            html,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    type Page = StaticPage;

    async fn open_gallery(&self, url: &str) -> Result<StaticPage, FetchError> {
        self.get(url).await
    }

    async fn open_detail(&self, url: &str) -> Result<StaticPage, FetchError> {
        let page = self.get(url).await?;
        if !is_success(page.status) {
            return Err(FetchError::status(url, page.status));
        }
        Ok(page)
    }

    async fn shutdown(self) -> Result<(), FetchError> {
        Ok(())
    }
}

/// A fetched document held in memory.
pub struct StaticPage {
    url: String,
    status: u16,
    html: String,
}

impl StaticPage {
    fn contains_any(&self, selectors: &SelectorChain) -> bool {
        let document = Html::parse_document(&self.html);
        selectors.any_in(document.root_element())
    }
}

#[async_trait]
impl FetchedPage for StaticPage {
    fn url(&self) -> &str {
        &self.url
    }

    fn status(&self) -> Option<u16> {
        Some(self.status)
    }

    async fn wait_for_any(
        &self,
        selectors: &SelectorChain,
        timeout: Duration,
    ) -> Result<(), FetchError> {
        if self.contains_any(selectors) {
            Ok(())
        } else {
            Err(FetchError::Timeout {
                what: selectors.css_group(),
                secs: timeout.as_secs(),
            })
        }
    }

    async fn html(&self) -> Result<String, FetchError> {
        Ok(self.html.clone())
    }

    async fn screenshot(&self) -> Result<Option<Vec<u8>>, FetchError> {
        Ok(None)
    }

    async fn close(self) -> Result<(), FetchError> {
        Ok(())
    }
}
