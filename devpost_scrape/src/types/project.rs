//! Structured data extracted from a project detail page.

use serde::{Deserialize, Serialize};

/// A technology listed in the project's "built with" section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technology {
    pub name: String,

    /// Devpost's software page for the tag, when linked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Devpost marks tags it knows about with a dedicated class.
    pub is_recognized: bool,
}

/// A member of the submitting team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub name: String,

    /// Profile link; empty when the member has no public profile.
    pub profile_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    /// Free-text contribution note ("built the backend").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// An image from the project's media gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// Hosting service of an embedded demo video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoKind {
    Youtube,
    Vimeo,
    Other,
}

impl VideoKind {
    /// Classifies an embed URL by substring.
    pub fn from_src(src: &str) -> Self {
        if src.contains("youtube") || src.contains("youtu.be") {
            Self::Youtube
        } else if src.contains("vimeo") {
            Self::Vimeo
        } else {
            Self::Other
        }
    }
}

/// The embedded demo video of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoVideo {
    pub url: String,

    #[serde(rename = "type")]
    pub kind: VideoKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
}

/// Like and comment counters. Both default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    pub likes: u32,
    pub comments: u32,
}

/// A prize the project won.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Award {
    /// Heading of the prize section, "Overall" when there is none.
    pub category: String,

    /// Label of the winner marker, e.g. "Winner".
    pub place: String,

    pub description: Option<String>,

    /// Text following the winner marker, usually the prize name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prize: Option<String>,
}

impl Award {
    /// Category used for candidates whose detail page could not be read.
    pub const FETCH_ERROR_CATEGORY: &'static str = "Unknown - Error Fetching Details";

    /// Placeholder award recorded when details are unavailable, so the
    /// project still shows up as a winner.
    pub fn fetch_error_placeholder() -> Self {
        Self {
            category: Self::FETCH_ERROR_CATEGORY.to_string(),
            place: "Winner".to_string(),
            description: None,
            prize: None,
        }
    }
}

/// Everything extracted from one project detail page.
///
/// Collections are always present, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetails {
    /// Sanitized HTML of the project write-up.
    pub description: Option<String>,
    pub technologies: Vec<Technology>,
    pub team_members: Vec<TeamMember>,
    pub gallery_images: Vec<GalleryImage>,
    pub demo_video: Option<DemoVideo>,
    pub engagement: Engagement,
    pub awards: Vec<Award>,
    pub github_url: Option<String>,
    pub website_url: Option<String>,
}

impl ProjectDetails {
    /// Number of team member entries found on the page.
    pub fn team_size(&self) -> u32 {
        self.team_members.len() as u32
    }
}
