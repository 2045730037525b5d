//! The scrape orchestrator.
//!
//! One run loads a hackathon's project gallery, keeps the winners and visits
//! each winner's detail page in gallery order, one at a time. Every winner
//! ends up stored: with full details when its page could be read, as a
//! degraded record otherwise. Only gallery failures abort a run.

use std::time::Duration;

use chrono::Utc;
use devpost_scrape::types::{ProjectDetails, ProjectSummary};
use devpost_scrape::{
    class_inventory, dedupe_by_detail_url, extract_detail, extract_gallery, select_winners,
    Selectors,
};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::config::{Engine, ScraperConfig};
use crate::db::Db;
use crate::diagnostics::{slugify, DebugDir, DiagnosticsSink};
use crate::error::HackscrapeError;
use crate::fetch::{
    is_success, ChromeFetcher, ChromeOptions, FetchError, FetchedPage, HttpFetcher, PageFetcher,
};
use crate::record::ProjectRecord;
use crate::validation::{validate_hackathon_name, validate_hackathon_url, validate_limit};

const GALLERY_PATH: &str = "/project-gallery";

/// A validated scrape invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    /// Base URL without trailing slash.
    pub hackathon_url: String,
    pub hackathon_name: String,
    /// Maximum number of winners to visit.
    pub limit: Option<usize>,
}

impl ScrapeRequest {
    pub fn new(url: &str, name: &str, limit: Option<i64>) -> Result<Self, HackscrapeError> {
        Ok(Self {
            hackathon_url: validate_hackathon_url(url)?,
            hackathon_name: validate_hackathon_name(name)?,
            limit: validate_limit(limit)?,
        })
    }

    pub fn gallery_url(&self) -> String {
        format!("{}{}", self.hackathon_url, GALLERY_PATH)
    }
}

/// Where a run is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    GalleryLoading,
    GalleryLoaded,
    DetailLoading { index: usize },
    DetailExtracted { index: usize },
    DetailFailed { index: usize },
    Completed,
}

/// What happened to one winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum CandidateOutcome {
    /// Full record stored.
    Stored { title: String, detail_url: String },
    /// Detail page unusable; the gallery fields were stored instead.
    Degraded {
        title: String,
        detail_url: String,
        reason: String,
    },
    /// Nothing could be stored.
    Failed {
        title: String,
        detail_url: String,
        reason: String,
    },
}

impl CandidateOutcome {
    /// True when a row was written for the candidate.
    pub fn is_stored(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    pub fn detail_url(&self) -> &str {
        match self {
            Self::Stored { detail_url, .. }
            | Self::Degraded { detail_url, .. }
            | Self::Failed { detail_url, .. } => detail_url,
        }
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeSummary {
    pub success_count: usize,
    pub error_count: usize,
    pub debug_dir: String,
    #[serde(skip)]
    pub outcomes: Vec<CandidateOutcome>,
}

impl ScrapeSummary {
    /// Tallies outcomes: a stored row, degraded or not, is a success.
    pub fn from_outcomes(outcomes: Vec<CandidateOutcome>, debug_dir: String) -> Self {
        let (success_count, error_count) =
            outcomes.iter().fold((0, 0), |(ok, failed), outcome| {
                if outcome.is_stored() {
                    (ok + 1, failed)
                } else {
                    (ok, failed + 1)
                }
            });
        Self {
            success_count,
            error_count,
            debug_dir,
            outcomes,
        }
    }

    pub fn degraded_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, CandidateOutcome::Degraded { .. }))
            .count()
    }
}

/// Runs scrapes against one database with one selector table.
pub struct Scraper<'a> {
    db: &'a Db,
    selectors: &'a Selectors,
    gallery_timeout: Duration,
}

impl<'a> Scraper<'a> {
    pub fn new(db: &'a Db, config: &'a ScraperConfig) -> Self {
        Self {
            db,
            selectors: &config.selectors,
            gallery_timeout: config.gallery_timeout(),
        }
    }

    /// Runs one scrape and shuts the fetcher down afterwards, whatever the
    /// outcome.
    pub async fn run<F, D>(
        &self,
        fetcher: F,
        diagnostics: &D,
        request: &ScrapeRequest,
    ) -> Result<ScrapeSummary, HackscrapeError>
    where
        F: PageFetcher,
        D: DiagnosticsSink,
    {
        let result = self.run_with(&fetcher, diagnostics, request).await;
        if let Err(e) = fetcher.shutdown().await {
            warn!("Failed to close browser: {}", e);
        }
        result
    }

    async fn run_with<F, D>(
        &self,
        fetcher: &F,
        diagnostics: &D,
        request: &ScrapeRequest,
    ) -> Result<ScrapeSummary, HackscrapeError>
    where
        F: PageFetcher,
        D: DiagnosticsSink,
    {
        let mut state = RunState::NotStarted;
        advance(&mut state, RunState::GalleryLoading);
        let all = self.load_gallery(fetcher, diagnostics, request).await?;
        advance(&mut state, RunState::GalleryLoaded);

        let unique = dedupe_by_detail_url(all.clone());
        let winners = select_winners(&unique, request.limit);
        info!(
            "Found {} winning projects to process out of {} total",
            winners.len(),
            unique.len()
        );
        diagnostics.save_json(
            "extracted-data.json",
            &json!({ "all": all, "winners": winners }),
        );
        let winner_refs: Vec<_> = winners
            .iter()
            .map(|w| json!({ "title": w.title, "detailUrl": w.detail_url }))
            .collect();
        diagnostics.save_json("winning-projects.json", &winner_refs);

        let mut outcomes = Vec::with_capacity(winners.len());
        for (index, candidate) in winners.iter().enumerate() {
            advance(&mut state, RunState::DetailLoading { index });
            let (outcome, next) = self
                .process_candidate(fetcher, diagnostics, request, index, candidate)
                .await;
            advance(&mut state, next);
            outcomes.push(outcome);
        }
        advance(&mut state, RunState::Completed);

        let debug_dir = diagnostics
            .location()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let summary = ScrapeSummary::from_outcomes(outcomes, debug_dir);
        info!(
            "Scrape of {} finished: {} stored ({} degraded), {} errors",
            request.hackathon_name,
            summary.success_count,
            summary.degraded_count(),
            summary.error_count
        );
        Ok(summary)
    }

    async fn load_gallery<F, D>(
        &self,
        fetcher: &F,
        diagnostics: &D,
        request: &ScrapeRequest,
    ) -> Result<Vec<ProjectSummary>, HackscrapeError>
    where
        F: PageFetcher,
        D: DiagnosticsSink,
    {
        let gallery_url = request.gallery_url();
        info!("Navigating to project gallery: {}", gallery_url);
        let page = fetcher.open_gallery(&gallery_url).await?;

        let result: Result<Vec<ProjectSummary>, HackscrapeError> = async {
            if let Some(status) = page.status().filter(|s| !is_success(*s)) {
                capture(&page, diagnostics, "error-page.png").await;
                return Err(FetchError::status(&gallery_url, status).into());
            }
            capture(&page, diagnostics, "initial-load.png").await;
            diagnostics.save_text("page-content.html", &page.html().await?);

            info!("Waiting for projects to load...");
            page.wait_for_any(&self.selectors.gallery.entry, self.gallery_timeout)
                .await?;
            capture(&page, diagnostics, "projects-loaded.png").await;

            let html = page.html().await?;
            let inventory = class_inventory(&html);
            debug!("Page exposes {} class/id selectors", inventory.len());
            diagnostics.save_json("selectors.json", &inventory);

            let summaries = extract_gallery(&html, page.url(), &self.selectors.gallery)?;
            info!("Extracted {} gallery entries", summaries.len());
            Ok(summaries)
        }
        .await;

        if let Err(e) = page.close().await {
            warn!("Failed to close gallery page: {}", e);
        }
        result
    }

    async fn process_candidate<F, D>(
        &self,
        fetcher: &F,
        diagnostics: &D,
        request: &ScrapeRequest,
        index: usize,
        candidate: &ProjectSummary,
    ) -> (CandidateOutcome, RunState)
    where
        F: PageFetcher,
        D: DiagnosticsSink,
    {
        info!("Visiting project: {} ({})", candidate.title, candidate.detail_url);
        let now = Utc::now();

        let (record, failure, state) = match self.fetch_details(fetcher, &candidate.detail_url).await
        {
            Ok(details) => {
                diagnostics.save_json(&candidate_file_name(index, &candidate.title), &details);
                let record = ProjectRecord::from_details(
                    candidate,
                    details,
                    &request.hackathon_url,
                    &request.hackathon_name,
                    now,
                );
                (record, None, RunState::DetailExtracted { index })
            }
            Err(e) => {
                warn!("Error fetching details for {}: {}", candidate.title, e);
                let record = ProjectRecord::degraded(
                    candidate,
                    &request.hackathon_url,
                    &request.hackathon_name,
                    now,
                );
                (record, Some(e.to_string()), RunState::DetailFailed { index })
            }
        };

        let title = candidate.title.clone();
        let detail_url = candidate.detail_url.clone();
        let outcome = match (self.db.upsert_project(&record), failure) {
            (Ok(()), None) => {
                info!("Stored project: {}", title);
                CandidateOutcome::Stored { title, detail_url }
            }
            (Ok(()), Some(reason)) => {
                info!("Stored basic project info: {}", title);
                CandidateOutcome::Degraded {
                    title,
                    detail_url,
                    reason,
                }
            }
            (Err(e), _) => {
                error!("Failed to store project {}: {}", title, e);
                CandidateOutcome::Failed {
                    title,
                    detail_url,
                    reason: e.to_string(),
                }
            }
        };
        (outcome, state)
    }

    async fn fetch_details<F: PageFetcher>(
        &self,
        fetcher: &F,
        url: &str,
    ) -> Result<ProjectDetails, HackscrapeError> {
        let page = fetcher.open_detail(url).await?;
        let result: Result<ProjectDetails, HackscrapeError> = async {
            let html = page.html().await?;
            Ok(extract_detail(&html, page.url(), &self.selectors.detail)?)
        }
        .await;
        if let Err(e) = page.close().await {
            warn!("Failed to close page for {}: {}", url, e);
        }
        result
    }
}

fn advance(state: &mut RunState, next: RunState) {
    debug!("Run state: {:?} -> {:?}", state, next);
    *state = next;
}

async fn capture<P: FetchedPage, D: DiagnosticsSink>(page: &P, diagnostics: &D, name: &str) {
    match page.screenshot().await {
        Ok(Some(png)) => diagnostics.save_bytes(name, &png),
        Ok(None) => {}
        Err(e) => warn!("Failed to capture {}: {}", name, e),
    }
}

/// `project-03-ecotrack.json`: one-based, gallery order.
pub fn candidate_file_name(index: usize, title: &str) -> String {
    format!("project-{:02}-{}.json", index + 1, slugify(title, "project"))
}

/// Scrapes one hackathon with the configured engine, writing diagnostics
/// under the configured debug root.
pub async fn scrape_hackathon(
    request: &ScrapeRequest,
    config: &ScraperConfig,
    db: &Db,
) -> Result<ScrapeSummary, HackscrapeError> {
    info!("Starting scrape for hackathon: {}", request.hackathon_name);
    let diagnostics = DebugDir::create(&config.debug_root, &request.hackathon_name, Utc::now());
    let scraper = Scraper::new(db, config);

    match config.engine {
        Engine::Chrome => {
            info!("Launching browser...");
            let fetcher = ChromeFetcher::launch(ChromeOptions::from_config(config)).await?;
            scraper.run(fetcher, &diagnostics, request).await
        }
        Engine::Http => {
            let fetcher = HttpFetcher::new(&config.resolved_user_agent(), config.page_timeout())?;
            scraper.run(fetcher, &diagnostics, request).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(url: &str) -> CandidateOutcome {
        CandidateOutcome::Stored {
            title: url.to_string(),
            detail_url: url.to_string(),
        }
    }

    #[test]
    fn summary_folds_outcomes() {
        let summary = ScrapeSummary::from_outcomes(
            vec![
                stored("a"),
                CandidateOutcome::Degraded {
                    title: "b".into(),
                    detail_url: "b".into(),
                    reason: "timeout".into(),
                },
                CandidateOutcome::Failed {
                    title: "c".into(),
                    detail_url: "c".into(),
                    reason: "disk full".into(),
                },
                stored("d"),
            ],
            "debug/hack/ts".into(),
        );
        assert_eq!(summary.success_count, 3);
        assert_eq!(summary.error_count, 1);
        assert_eq!(summary.degraded_count(), 1);
        assert_eq!(summary.outcomes[2].detail_url(), "c");
    }

    #[test]
    fn summary_serializes_counts_only() {
        let summary = ScrapeSummary::from_outcomes(vec![stored("a")], "debug/x".into());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            json!({ "successCount": 1, "errorCount": 0, "debugDir": "debug/x" })
        );
    }

    #[test]
    fn request_validation() {
        let request =
            ScrapeRequest::new("https://hackmit.devpost.com/", " HackMIT ", Some(3)).unwrap();
        assert_eq!(request.gallery_url(), "https://hackmit.devpost.com/project-gallery");
        assert_eq!(request.hackathon_name, "HackMIT");
        assert_eq!(request.limit, Some(3));

        let shared = ScrapeRequest::new(
            "https://hackmit.devpost.com/?ref_content=x#prizes",
            "HackMIT",
            None,
        )
        .unwrap();
        assert_eq!(shared.gallery_url(), "https://hackmit.devpost.com/project-gallery");

        assert!(ScrapeRequest::new("hackmit", "HackMIT", None).is_err());
        assert!(ScrapeRequest::new("https://hackmit.devpost.com", "", None).is_err());
        assert!(ScrapeRequest::new("https://hackmit.devpost.com", "HackMIT", Some(0)).is_err());
    }

    #[test]
    fn candidate_file_names() {
        assert_eq!(candidate_file_name(0, "EcoTrack"), "project-01-ecotrack.json");
        assert_eq!(candidate_file_name(11, "Study Buddy!"), "project-12-study-buddy.json");
        assert_eq!(candidate_file_name(0, "天気アプリ"), "project-01-天気アプリ.json");
        assert_eq!(candidate_file_name(2, "!!!"), "project-03-project.json");
    }
}
