//! Gallery-level project summaries.

use serde::{Deserialize, Serialize};

/// One entry of a hackathon's project gallery.
///
/// Summaries only live for the duration of a scrape run; they decide which
/// detail pages get visited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    /// Project name, first line of the entry heading only.
    pub title: String,

    /// Short pitch shown under the title. Empty when the entry has none.
    pub tagline: String,

    /// Absolute URL of the project's detail page. Empty when the entry
    /// carries no link.
    pub detail_url: String,

    /// Absolute URL of the gallery thumbnail.
    pub thumbnail_url: Option<String>,

    /// Whether the entry carries any winner badge.
    pub is_winner: bool,
}

impl ProjectSummary {
    /// True when this entry should be visited: a winner with a detail page.
    pub fn is_candidate(&self) -> bool {
        self.is_winner && !self.detail_url.is_empty()
    }
}
