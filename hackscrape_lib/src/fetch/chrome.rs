//! Headless Chromium engine.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::EventResponseReceived;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use devpost_scrape::SelectorChain;
use futures::StreamExt;
use tokio::task::JoinHandle;

use super::{is_success, FetchError, FetchedPage, PageFetcher};
use crate::config::ScraperConfig;

const POLL_INTERVAL: Duration = Duration::from_millis(250);
const STATUS_WAIT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct ChromeOptions {
    pub headless: bool,
    pub window: (u32, u32),
    pub executable: Option<PathBuf>,
    pub user_agent: String,
    pub page_timeout: Duration,
    /// Quiet period after a detail page navigates, before it is read.
    pub settle: Duration,
}

impl ChromeOptions {
    pub fn from_config(config: &ScraperConfig) -> Self {
        Self {
            headless: config.headless,
            window: (config.viewport.width, config.viewport.height),
            executable: config.chrome_executable.clone(),
            user_agent: config.resolved_user_agent(),
            page_timeout: config.page_timeout(),
            settle: config.network_idle(),
        }
    }
}

pub struct ChromeFetcher {
    browser: Browser,
    handler: JoinHandle<()>,
    options: ChromeOptions,
}

impl ChromeFetcher {
    pub async fn launch(options: ChromeOptions) -> Result<Self, FetchError> {
        let (width, height) = options.window;
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg(format!("--user-agent={}", options.user_agent))
            .window_size(width, height)
            .viewport(Viewport {
                width,
                height,
                ..Viewport::default()
            })
            .request_timeout(options.page_timeout);
        if !options.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &options.executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(FetchError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| FetchError::Launch(e.to_string()))?;
        let handler = tokio::spawn(async move { while handler.next().await.is_some() {} });

        tracing::debug!("Browser launched ({}x{})", width, height);
        Ok(Self {
            browser,
            handler,
            options,
        })
    }

    async fn blank_page(&self, url: &str) -> Result<ChromePage, FetchError> {
        let page = tokio::time::timeout(self.options.page_timeout, self.browser.new_page("about:blank"))
            .await
            .map_err(|_| self.timeout(url))?
            .map_err(|e| FetchError::Browser(e.to_string()))?;
        Ok(ChromePage::new(page, url))
    }

    fn timeout(&self, url: &str) -> FetchError {
        FetchError::Timeout {
            what: url.to_string(),
            secs: self.options.page_timeout.as_secs(),
        }
    }

    fn navigation_error(url: &str, e: impl std::fmt::Display) -> FetchError {
        FetchError::Navigation {
            url: url.to_string(),
            status: None,
            reason: e.to_string(),
        }
    }
}

#[async_trait]
impl PageFetcher for ChromeFetcher {
    type Page = ChromePage;

    async fn open_gallery(&self, url: &str) -> Result<ChromePage, FetchError> {
        let mut guard = self.blank_page(url).await?;
        let page = guard.page()?.clone();

        // Subscribe before navigating so the document response is not missed.
        let mut responses = page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(|e| FetchError::Browser(e.to_string()))?;

        tokio::time::timeout(self.options.page_timeout, page.goto(url))
            .await
            .map_err(|_| self.timeout(url))?
            .map_err(|e| Self::navigation_error(url, e))?;
        guard.follow_redirects().await;

        let status = tokio::time::timeout(STATUS_WAIT, async {
            while let Some(event) = responses.next().await {
                let mime = event.response.mime_type.to_lowercase();
                if mime.starts_with("text/html") || mime.starts_with("application/xhtml+xml") {
                    return u16::try_from(event.response.status).ok();
                }
            }
            None
        })
        .await
        .ok()
        .flatten();

        match status {
            Some(code) if !is_success(code) => {
                tracing::warn!("Gallery responded with HTTP {}", code)
            }
            Some(code) => tracing::debug!("Gallery responded with HTTP {}", code),
            None => tracing::warn!("No document response captured for {}", url),
        }
        guard.status = status;
        Ok(guard)
    }

    async fn open_detail(&self, url: &str) -> Result<ChromePage, FetchError> {
        let mut guard = self.blank_page(url).await?;
        let page = guard.page()?.clone();

        tokio::time::timeout(self.options.page_timeout, page.goto(url))
            .await
            .map_err(|_| self.timeout(url))?
            .map_err(|e| Self::navigation_error(url, e))?;
        guard.follow_redirects().await;

        // No network-idle signal over CDP; give late XHRs a fixed quiet period.
        if !self.options.settle.is_zero() {
            tokio::time::sleep(self.options.settle).await;
        }
        Ok(guard)
    }

    async fn shutdown(mut self) -> Result<(), FetchError> {
        let closed = self
            .browser
            .close()
            .await
            .map_err(|e| FetchError::Browser(e.to_string()));
        if closed.is_ok() {
            if let Err(e) = self.browser.wait().await {
                tracing::warn!("Browser process did not exit cleanly: {}", e);
            }
        }
        self.handler.abort();
        tracing::debug!("Browser closed");
        closed.map(|_| ())
    }
}

/// A browser tab, closed explicitly or, failing that, when dropped.
pub struct ChromePage {
    page: Option<Page>,
    url: String,
    status: Option<u16>,
}

impl ChromePage {
    fn new(page: Page, url: &str) -> Self {
        Self {
            page: Some(page),
            url: url.to_string(),
            status: None,
        }
    }

    /// Points `url` at where navigation actually ended up, so relative
    /// links resolve against the post-redirect location.
    async fn follow_redirects(&mut self) {
        let reported = match self.page() {
            Ok(page) => page.url().await.ok().flatten(),
            Err(_) => None,
        };
        self.url = landed_url(&self.url, reported);
    }

    fn page(&self) -> Result<&Page, FetchError> {
        self.page
            .as_ref()
            .ok_or_else(|| FetchError::Browser(format!("page for {} already closed", self.url)))
    }
}

fn landed_url(requested: &str, reported: Option<String>) -> String {
    match reported {
        Some(current) if current.starts_with("http://") || current.starts_with("https://") => {
            if current != requested {
                tracing::debug!("{} redirected to {}", requested, current);
            }
            current
        }
        _ => requested.to_string(),
    }
}

#[async_trait]
impl FetchedPage for ChromePage {
    fn url(&self) -> &str {
        &self.url
    }

    fn status(&self) -> Option<u16> {
        self.status
    }

    async fn wait_for_any(
        &self,
        selectors: &SelectorChain,
        timeout: Duration,
    ) -> Result<(), FetchError> {
        let page = self.page()?;
        let group = selectors.css_group();
        tokio::time::timeout(timeout, async {
            while page.find_element(group.as_str()).await.is_err() {
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        })
        .await
        .map_err(|_| FetchError::Timeout {
            what: group.clone(),
            secs: timeout.as_secs(),
        })
    }

    async fn html(&self) -> Result<String, FetchError> {
        self.page()?
            .content()
            .await
            .map_err(|e| FetchError::Browser(e.to_string()))
    }

    async fn screenshot(&self) -> Result<Option<Vec<u8>>, FetchError> {
        let params = ScreenshotParams::builder().full_page(true).build();
        self.page()?
            .screenshot(params)
            .await
            .map(Some)
            .map_err(|e| FetchError::Browser(e.to_string()))
    }

    async fn close(mut self) -> Result<(), FetchError> {
        match self.page.take() {
            Some(page) => page
                .close()
                .await
                .map_err(|e| FetchError::Browser(e.to_string())),
            None => Ok(()),
        }
    }
}

impl Drop for ChromePage {
    fn drop(&mut self) {
        let Some(page) = self.page.take() else {
            return;
        };
        let url = std::mem::take(&mut self.url);
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                if let Err(e) = page.close().await {
                    tracing::warn!("Failed to close page for {}: {}", url, e);
                }
            });
        }
    }
}
