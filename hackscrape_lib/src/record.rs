//! The persisted project record.

use chrono::{DateTime, SubsecRound, Utc};
use devpost_scrape::types::{
    Award, DemoVideo, Engagement, GalleryImage, ProjectDetails, ProjectSummary, TeamMember,
    Technology,
};
use serde::{Deserialize, Serialize};

/// One stored winning project, keyed by `detail_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub detail_url: String,
    pub title: String,
    pub tagline: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub hackathon_url: String,
    pub hackathon_name: String,
    pub technologies: Vec<Technology>,
    pub team_members: Vec<TeamMember>,
    pub gallery_images: Vec<GalleryImage>,
    pub awards: Vec<Award>,
    pub demo_video: Option<DemoVideo>,
    pub github_url: Option<String>,
    pub website_url: Option<String>,
    pub engagement: Engagement,
    /// Unknown when the detail page could not be read.
    pub team_size: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectRecord {
    /// Full record from a successfully extracted detail page.
    pub fn from_details(
        summary: &ProjectSummary,
        details: ProjectDetails,
        hackathon_url: &str,
        hackathon_name: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let team_size = Some(details.team_size());
        let mut record = Self::base(summary, hackathon_url, hackathon_name, now);
        record.description = details.description;
        record.technologies = details.technologies;
        record.team_members = details.team_members;
        record.gallery_images = details.gallery_images;
        record.awards = details.awards;
        record.demo_video = details.demo_video;
        record.github_url = details.github_url;
        record.website_url = details.website_url;
        record.engagement = details.engagement;
        record.team_size = team_size;
        record
    }

    /// Minimal record for a winner whose detail page failed, tagged with the
    /// fetch-error placeholder award.
    pub fn degraded(
        summary: &ProjectSummary,
        hackathon_url: &str,
        hackathon_name: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let mut record = Self::base(summary, hackathon_url, hackathon_name, now);
        record.awards = vec![Award::fetch_error_placeholder()];
        record
    }

    fn base(
        summary: &ProjectSummary,
        hackathon_url: &str,
        hackathon_name: &str,
        now: DateTime<Utc>,
    ) -> Self {
        // Stored timestamps carry millisecond precision.
        let now = now.trunc_subsecs(3);
        Self {
            detail_url: summary.detail_url.clone(),
            title: summary.title.clone(),
            tagline: summary.tagline.clone(),
            description: None,
            thumbnail: summary.thumbnail_url.clone(),
            hackathon_url: hackathon_url.to_string(),
            hackathon_name: hackathon_name.to_string(),
            technologies: Vec::new(),
            team_members: Vec::new(),
            gallery_images: Vec::new(),
            awards: Vec::new(),
            demo_video: None,
            github_url: None,
            website_url: None,
            engagement: Engagement::default(),
            team_size: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// True when this record only holds the gallery fields.
    pub fn is_degraded(&self) -> bool {
        self.awards
            .iter()
            .any(|a| a.category == Award::FETCH_ERROR_CATEGORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn summary() -> ProjectSummary {
        ProjectSummary {
            title: "EcoTrack".into(),
            tagline: "Carbon footprint in your pocket".into(),
            detail_url: "https://devpost.com/software/ecotrack".into(),
            thumbnail_url: Some("https://cdn.devpost.com/eco.png".into()),
            is_winner: true,
        }
    }

    #[test]
    fn degraded_record_has_placeholder_award() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let record =
            ProjectRecord::degraded(&summary(), "https://hack.devpost.com", "Hack", now);
        assert_eq!(record.title, "EcoTrack");
        assert_eq!(record.tagline, "Carbon footprint in your pocket");
        assert_eq!(record.awards, vec![Award::fetch_error_placeholder()]);
        assert_eq!(record.engagement, Engagement::default());
        assert!(record.technologies.is_empty());
        assert_eq!(record.team_size, None);
        assert!(record.is_degraded());
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn full_record_counts_team() {
        let details = ProjectDetails {
            team_members: vec![
                TeamMember {
                    name: "Alice".into(),
                    profile_url: "https://devpost.com/alice".into(),
                    avatar_url: None,
                    role: None,
                },
                TeamMember {
                    name: "Bob".into(),
                    profile_url: String::new(),
                    avatar_url: None,
                    role: None,
                },
            ],
            engagement: Engagement {
                likes: 4,
                comments: 1,
            },
            ..ProjectDetails::default()
        };
        let record = ProjectRecord::from_details(
            &summary(),
            details,
            "https://hack.devpost.com",
            "Hack",
            Utc::now(),
        );
        assert_eq!(record.team_size, Some(2));
        assert_eq!(record.engagement.likes, 4);
        assert_eq!(record.thumbnail.as_deref(), Some("https://cdn.devpost.com/eco.png"));
        assert!(!record.is_degraded());
    }

    #[test]
    fn timestamps_truncated_to_millis() {
        let now = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let record = ProjectRecord::degraded(&summary(), "https://h.devpost.com", "H", now);
        assert_eq!(record.created_at.timestamp_subsec_nanos(), 123_000_000);
    }

    #[test]
    fn serializes_camel_case() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let record = ProjectRecord::degraded(&summary(), "https://h.devpost.com", "H", now);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["detailUrl"], "https://devpost.com/software/ecotrack");
        assert_eq!(json["hackathonName"], "H");
        assert_eq!(json["engagement"]["likes"], 0);
        assert!(json["teamSize"].is_null());
    }
}
