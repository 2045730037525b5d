//! Project gallery extraction.

use std::collections::HashSet;

use scraper::{ElementRef, Html};
use url::Url;

use crate::dom::{attr_url, text_of};
use crate::selectors::GallerySelectors;
use crate::types::ProjectSummary;
use crate::Error;

/// Extracts every project entry of a loaded gallery page, in DOM order.
///
/// The result is not deduplicated; see [`dedupe_by_detail_url`].
pub fn extract_gallery(
    html: &str,
    page_url: &str,
    selectors: &GallerySelectors,
) -> Result<Vec<ProjectSummary>, Error> {
    let base = Url::parse(page_url).map_err(|_| Error::InvalidPageUrl(page_url.to_string()))?;
    let document = Html::parse_document(html);
    let entries = selectors.entry.all(document.root_element());
    tracing::debug!("Found {} project entries", entries.len());

    Ok(entries
        .into_iter()
        .map(|entry| summarize_entry(entry, &base, selectors))
        .collect())
}

fn summarize_entry(entry: ElementRef<'_>, base: &Url, selectors: &GallerySelectors) -> ProjectSummary {
    // Titles can share a node with the description; keep the first line.
    let title = selectors
        .title
        .first(entry)
        .map(|el| {
            text_of(el)
                .lines()
                .next()
                .unwrap_or_default()
                .trim()
                .to_string()
        })
        .unwrap_or_default();

    let tagline = selectors.tagline.first(entry).map(text_of).unwrap_or_default();

    let detail_url = selectors
        .link
        .first(entry)
        .or_else(|| selectors.link.closest(entry))
        .and_then(|a| attr_url(Some(base), a, "href"))
        .unwrap_or_default();

    let thumbnail_url = selectors.thumbnail.first(entry).and_then(|img| {
        attr_url(Some(base), img, "src").or_else(|| attr_url(Some(base), img, "data-src"))
    });

    ProjectSummary {
        title,
        tagline,
        detail_url,
        thumbnail_url,
        is_winner: selectors.winner_badge.any_in(entry),
    }
}

/// Collapses entries sharing a detail URL, keeping the first occurrence.
///
/// Entries without a detail URL are dropped.
pub fn dedupe_by_detail_url(summaries: Vec<ProjectSummary>) -> Vec<ProjectSummary> {
    let mut seen = HashSet::new();
    summaries
        .into_iter()
        .filter(|s| !s.detail_url.is_empty() && seen.insert(s.detail_url.clone()))
        .collect()
}

/// Keeps winners that have a detail page, in order, up to `limit`.
pub fn select_winners(summaries: &[ProjectSummary], limit: Option<usize>) -> Vec<ProjectSummary> {
    summaries
        .iter()
        .filter(|s| s.is_candidate())
        .take(limit.unwrap_or(usize::MAX))
        .cloned()
        .collect()
}
