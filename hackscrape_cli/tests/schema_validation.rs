use chrono::{TimeZone, Utc};
use hackscrape_lib::types::{
    Award, DemoVideo, Engagement, GalleryImage, ProjectDetails, ProjectSummary, TeamMember,
    Technology, VideoKind,
};
use hackscrape_lib::ProjectRecord;
use serde_json::Value;
use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("CLI crate should be inside workspace")
        .to_path_buf()
}

fn load_schema(name: &str) -> Value {
    let path = workspace_root().join("schema").join(name);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("read schema {}: {}", path.display(), e));
    serde_json::from_str(&text).expect("schema is valid JSON")
}

fn validator() -> jsonschema::Validator {
    let schema = load_schema("project.schema.json");
    jsonschema::draft202012::new(&schema).expect("project schema compiles")
}

fn summary(slug: &str) -> ProjectSummary {
    ProjectSummary {
        title: format!("Project {}", slug),
        tagline: "A tagline".into(),
        detail_url: format!("https://devpost.com/software/{}", slug),
        thumbnail_url: Some(format!("https://cdn.devpost.com/{}.png", slug)),
        is_winner: true,
    }
}

fn full_record() -> ProjectRecord {
    let details = ProjectDetails {
        description: Some("<p>Hello</p>".into()),
        technologies: vec![
            Technology {
                name: "rust".into(),
                url: Some("https://devpost.com/software/built-with/rust".into()),
                is_recognized: true,
            },
            Technology {
                name: "duckdb".into(),
                url: None,
                is_recognized: false,
            },
        ],
        team_members: vec![TeamMember {
            name: "Ada".into(),
            profile_url: "https://devpost.com/ada".into(),
            avatar_url: Some("https://cdn.devpost.com/ada.png".into()),
            role: Some("Firmware".into()),
        }],
        gallery_images: vec![GalleryImage {
            url: "https://cdn.devpost.com/shot.png".into(),
            caption: None,
        }],
        demo_video: Some(DemoVideo {
            url: "https://player.vimeo.com/video/42".into(),
            kind: VideoKind::Vimeo,
            video_id: Some("42".into()),
        }),
        engagement: Engagement {
            likes: 10,
            comments: 1,
        },
        awards: vec![Award {
            category: "Overall".into(),
            place: "2nd Place".into(),
            description: None,
            prize: Some("Headphones".into()),
        }],
        github_url: Some("https://github.com/team/project".into()),
        website_url: None,
    };
    ProjectRecord::from_details(
        &summary("full"),
        details,
        "https://hack.devpost.com",
        "Hack 2024",
        Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap(),
    )
}

fn degraded_record() -> ProjectRecord {
    ProjectRecord::degraded(
        &summary("degraded"),
        "https://hack.devpost.com",
        "Hack 2024",
        Utc::now(),
    )
}

fn as_json(records: &[ProjectRecord]) -> Value {
    serde_json::to_value(records).expect("records serialize")
}

// ---------------------------------------------------------------------------
// Positive validation
// ---------------------------------------------------------------------------

#[test]
fn test_stored_records_conform_to_schema() {
    let data = as_json(&[full_record(), degraded_record()]);
    let result = validator().validate(&data);
    if let Err(e) = &result {
        panic!("records failed validation: {e}");
    }
}

#[test]
fn test_empty_list_conforms() {
    assert!(validator().is_valid(&as_json(&[])));
}

// ---------------------------------------------------------------------------
// Negative validation
// ---------------------------------------------------------------------------

#[test]
fn test_schema_rejects_missing_detail_url() {
    let mut data = as_json(&[full_record()]);
    data[0].as_object_mut().unwrap().remove("detailUrl");
    assert!(!validator().is_valid(&data));
}

#[test]
fn test_schema_rejects_negative_engagement() {
    let mut data = as_json(&[full_record()]);
    data[0]["engagement"]["likes"] = serde_json::json!(-1);
    assert!(!validator().is_valid(&data));
}

#[test]
fn test_schema_rejects_unknown_video_type() {
    let mut data = as_json(&[full_record()]);
    data[0]["demoVideo"]["type"] = serde_json::json!("twitch");
    assert!(!validator().is_valid(&data));
}

#[test]
fn test_schema_rejects_absent_collections() {
    let mut data = as_json(&[degraded_record()]);
    data[0].as_object_mut().unwrap().remove("technologies");
    assert!(!validator().is_valid(&data));
}
