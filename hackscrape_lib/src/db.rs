//! SQLite storage for scraped hackathon projects.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use devpost_scrape::types::Engagement;

use crate::record::ProjectRecord;

const SCHEMA_VERSION: i32 = 1;

const PROJECT_COLUMNS: &str = "detail_url, title, tagline, description, thumbnail, \
     hackathon_url, hackathon_name, technologies, team_members, gallery_images, awards, \
     demo_video, github_url, website_url, likes, comments, team_size, created_at, updated_at";

#[derive(thiserror::Error, Debug)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("timestamp parse error: {0}")]
    Timestamp(#[from] chrono::ParseError),
}

pub struct Db {
    conn: Connection,
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Get a reference to the underlying connection (for tests).
    #[doc(hidden)]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn init(&self) -> Result<(), DbError> {
        let schema = include_str!("../../schema/sqlite.sql");
        self.conn.execute_batch(schema)?;

        let version: i32 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;
        if version < SCHEMA_VERSION {
            self.conn
                .pragma_update(None, "user_version", SCHEMA_VERSION)?;
        }
        Ok(())
    }

    /// Inserts the record, or refreshes every column except `detail_url`
    /// and `created_at` when a row with the same detail URL exists.
    pub fn upsert_project(&self, record: &ProjectRecord) -> Result<(), DbError> {
        let technologies = serde_json::to_string(&record.technologies)?;
        let team_members = serde_json::to_string(&record.team_members)?;
        let gallery_images = serde_json::to_string(&record.gallery_images)?;
        let awards = serde_json::to_string(&record.awards)?;
        let demo_video = record
            .demo_video
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        self.conn.execute(
            "INSERT INTO hackathon_projects (
                detail_url, title, tagline, description, thumbnail,
                hackathon_url, hackathon_name, technologies, team_members,
                gallery_images, awards, demo_video, github_url, website_url,
                likes, comments, team_size, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)
             ON CONFLICT(detail_url) DO UPDATE SET
                title = excluded.title,
                tagline = excluded.tagline,
                description = excluded.description,
                thumbnail = excluded.thumbnail,
                hackathon_url = excluded.hackathon_url,
                hackathon_name = excluded.hackathon_name,
                technologies = excluded.technologies,
                team_members = excluded.team_members,
                gallery_images = excluded.gallery_images,
                awards = excluded.awards,
                demo_video = excluded.demo_video,
                github_url = excluded.github_url,
                website_url = excluded.website_url,
                likes = excluded.likes,
                comments = excluded.comments,
                team_size = excluded.team_size,
                updated_at = excluded.updated_at",
            params![
                record.detail_url,
                record.title,
                record.tagline,
                record.description,
                record.thumbnail,
                record.hackathon_url,
                record.hackathon_name,
                technologies,
                team_members,
                gallery_images,
                awards,
                demo_video,
                record.github_url,
                record.website_url,
                record.engagement.likes,
                record.engagement.comments,
                record.team_size,
                format_timestamp(&record.created_at),
                format_timestamp(&record.updated_at),
            ],
        )?;
        Ok(())
    }

    pub fn get_project(&self, detail_url: &str) -> Result<Option<ProjectRecord>, DbError> {
        let sql = format!(
            "SELECT {} FROM hackathon_projects WHERE detail_url = ?1",
            PROJECT_COLUMNS
        );
        let raw = self
            .conn
            .query_row(&sql, params![detail_url], RawProject::from_row)
            .optional()?;
        raw.map(RawProject::into_record).transpose()
    }

    /// Every stored project, newest first.
    pub fn list_projects(&self) -> Result<Vec<ProjectRecord>, DbError> {
        let sql = format!(
            "SELECT {} FROM hackathon_projects ORDER BY created_at DESC, rowid DESC",
            PROJECT_COLUMNS
        );
        self.query_projects(&sql, params![])
    }

    /// Up to `count` projects in random order.
    pub fn random_projects(&self, count: usize) -> Result<Vec<ProjectRecord>, DbError> {
        let sql = format!(
            "SELECT {} FROM hackathon_projects ORDER BY RANDOM() LIMIT ?1",
            PROJECT_COLUMNS
        );
        self.query_projects(&sql, params![count as i64])
    }

    pub fn project_count(&self) -> Result<i64, DbError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM hackathon_projects", [], |row| {
                row.get(0)
            })?;
        Ok(count)
    }

    fn query_projects<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Vec<ProjectRecord>, DbError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, RawProject::from_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?.into_record()?);
        }
        Ok(records)
    }
}

/// Column values as stored, before JSON and timestamp decoding.
struct RawProject {
    detail_url: String,
    title: String,
    tagline: String,
    description: Option<String>,
    thumbnail: Option<String>,
    hackathon_url: String,
    hackathon_name: String,
    technologies: String,
    team_members: String,
    gallery_images: String,
    awards: String,
    demo_video: Option<String>,
    github_url: Option<String>,
    website_url: Option<String>,
    likes: u32,
    comments: u32,
    team_size: Option<u32>,
    created_at: String,
    updated_at: String,
}

impl RawProject {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            detail_url: row.get(0)?,
            title: row.get(1)?,
            tagline: row.get(2)?,
            description: row.get(3)?,
            thumbnail: row.get(4)?,
            hackathon_url: row.get(5)?,
            hackathon_name: row.get(6)?,
            technologies: row.get(7)?,
            team_members: row.get(8)?,
            gallery_images: row.get(9)?,
            awards: row.get(10)?,
            demo_video: row.get(11)?,
            github_url: row.get(12)?,
            website_url: row.get(13)?,
            likes: row.get(14)?,
            comments: row.get(15)?,
            team_size: row.get(16)?,
            created_at: row.get(17)?,
            updated_at: row.get(18)?,
        })
    }

    fn into_record(self) -> Result<ProjectRecord, DbError> {
        Ok(ProjectRecord {
            detail_url: self.detail_url,
            title: self.title,
            tagline: self.tagline,
            description: self.description,
            thumbnail: self.thumbnail,
            hackathon_url: self.hackathon_url,
            hackathon_name: self.hackathon_name,
            technologies: serde_json::from_str(&self.technologies)?,
            team_members: serde_json::from_str(&self.team_members)?,
            gallery_images: serde_json::from_str(&self.gallery_images)?,
            awards: serde_json::from_str(&self.awards)?,
            demo_video: self
                .demo_video
                .as_deref()
                .map(serde_json::from_str)
                .transpose()?,
            github_url: self.github_url,
            website_url: self.website_url,
            engagement: Engagement {
                likes: self.likes,
                comments: self.comments,
            },
            team_size: self.team_size,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DbError> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}
