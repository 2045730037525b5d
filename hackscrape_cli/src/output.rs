use anyhow::Result;
use hackscrape_lib::{ProjectRecord, ScrapeRequest, ScrapeSummary};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

const MAX_TECH_SHOWN: usize = 4;

#[derive(Tabled, Serialize)]
struct ProjectRow {
    #[tabled(rename = "Title")]
    #[serde(rename = "Title")]
    title: String,
    #[tabled(rename = "Hackathon")]
    #[serde(rename = "Hackathon")]
    hackathon: String,
    #[tabled(rename = "Awards")]
    #[serde(rename = "Awards")]
    awards: String,
    #[tabled(rename = "Team")]
    #[serde(rename = "Team")]
    team: String,
    #[tabled(rename = "Built With")]
    #[serde(rename = "Built With")]
    built_with: String,
    #[tabled(rename = "Likes")]
    #[serde(rename = "Likes")]
    likes: u32,
    #[tabled(rename = "Comments")]
    #[serde(rename = "Comments")]
    comments: u32,
    #[tabled(rename = "Details")]
    #[serde(rename = "Details")]
    details: &'static str,
    #[tabled(rename = "URL")]
    #[serde(rename = "URL")]
    url: String,
}

/// One line of a scrape report.
#[derive(Tabled, Serialize)]
pub struct SummaryRow {
    #[tabled(rename = "Hackathon")]
    #[serde(rename = "hackathon")]
    pub hackathon: String,
    #[tabled(rename = "URL")]
    #[serde(rename = "url")]
    pub url: String,
    #[tabled(rename = "Status")]
    #[serde(rename = "status")]
    pub status: String,
    #[tabled(rename = "Stored")]
    #[serde(rename = "successCount")]
    pub stored: usize,
    #[tabled(rename = "Degraded")]
    #[serde(rename = "degradedCount")]
    pub degraded: usize,
    #[tabled(rename = "Errors")]
    #[serde(rename = "errorCount")]
    pub errors: usize,
    #[tabled(rename = "Details")]
    #[serde(rename = "details")]
    pub details: String,
}

impl SummaryRow {
    pub fn completed(request: &ScrapeRequest, summary: &ScrapeSummary) -> Self {
        Self {
            hackathon: request.hackathon_name.clone(),
            url: request.hackathon_url.clone(),
            status: "ok".to_string(),
            stored: summary.success_count,
            degraded: summary.degraded_count(),
            errors: summary.error_count,
            details: summary.debug_dir.clone(),
        }
    }

    pub fn failed(name: &str, url: &str, error: &str) -> Self {
        Self {
            hackathon: name.to_string(),
            url: url.to_string(),
            status: "failed".to_string(),
            stored: 0,
            degraded: 0,
            errors: 0,
            details: error.to_string(),
        }
    }
}

// -- Row builders --

fn build_project_rows(projects: &[ProjectRecord]) -> Vec<ProjectRow> {
    projects
        .iter()
        .map(|p| ProjectRow {
            title: p.title.clone(),
            hackathon: p.hackathon_name.clone(),
            awards: p
                .awards
                .iter()
                .map(|a| match &a.prize {
                    Some(prize) => format!("{}: {} ({})", a.category, a.place, prize),
                    None => format!("{}: {}", a.category, a.place),
                })
                .collect::<Vec<_>>()
                .join("; "),
            team: format_team(p),
            built_with: format_technologies(p),
            likes: p.engagement.likes,
            comments: p.engagement.comments,
            details: if p.is_degraded() { "missing" } else { "full" },
            url: p.detail_url.clone(),
        })
        .collect()
}

fn format_team(project: &ProjectRecord) -> String {
    match project.team_size {
        Some(size) => size.to_string(),
        None => "?".to_string(),
    }
}

fn format_technologies(project: &ProjectRecord) -> String {
    let names: Vec<&str> = project
        .technologies
        .iter()
        .take(MAX_TECH_SHOWN)
        .map(|t| t.name.as_str())
        .collect();
    let hidden = project.technologies.len().saturating_sub(MAX_TECH_SHOWN);
    if hidden > 0 {
        format!("{} +{}", names.join(", "), hidden)
    } else {
        names.join(", ")
    }
}

// -- Project output --

pub fn print_projects_table(projects: &[ProjectRecord]) {
    println!("{}", Table::new(build_project_rows(projects)));
}

pub fn print_projects_markdown(projects: &[ProjectRecord]) {
    let mut table = Table::new(build_project_rows(projects));
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_projects_csv(projects: &[ProjectRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_project_rows(projects) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- Scrape report output --

pub fn print_summaries(rows: &[SummaryRow], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        OutputFormat::Markdown => {
            let mut table = Table::new(rows);
            table.with(Style::markdown());
            println!("{}", table);
        }
        OutputFormat::Table => println!("{}", Table::new(rows)),
    }
    Ok(())
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hackscrape_lib::types::{Award, Engagement, ProjectSummary, Technology};

    fn record(slug: &str) -> ProjectRecord {
        let summary = ProjectSummary {
            title: format!("Project {}", slug),
            tagline: String::new(),
            detail_url: format!("https://devpost.com/software/{}", slug),
            thumbnail_url: None,
            is_winner: true,
        };
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        ProjectRecord::degraded(&summary, "https://hack.devpost.com", "Hack 2024", now)
    }

    fn tech(name: &str) -> Technology {
        Technology {
            name: name.to_string(),
            url: None,
            is_recognized: false,
        }
    }

    #[test]
    fn test_build_project_rows_mapping() {
        let mut project = record("ecotrack");
        project.awards = vec![
            Award {
                category: "Sustainability".into(),
                place: "1st Place".into(),
                description: None,
                prize: Some("$500".into()),
            },
            Award {
                category: "Overall".into(),
                place: "Winner".into(),
                description: None,
                prize: None,
            },
        ];
        project.team_size = Some(3);
        project.engagement = Engagement {
            likes: 12,
            comments: 2,
        };
        project.technologies = vec![tech("rust"), tech("react")];

        let rows = build_project_rows(&[project]);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.title, "Project ecotrack");
        assert_eq!(row.hackathon, "Hack 2024");
        assert_eq!(row.awards, "Sustainability: 1st Place ($500); Overall: Winner");
        assert_eq!(row.team, "3");
        assert_eq!(row.built_with, "rust, react");
        assert_eq!(row.likes, 12);
        assert_eq!(row.comments, 2);
        assert_eq!(row.details, "full");
        assert_eq!(row.url, "https://devpost.com/software/ecotrack");
    }

    #[test]
    fn test_degraded_project_row() {
        let rows = build_project_rows(&[record("gamma")]);
        assert_eq!(rows[0].awards, "Unknown - Error Fetching Details: Winner");
        assert_eq!(rows[0].team, "?");
        assert_eq!(rows[0].built_with, "");
        assert_eq!(rows[0].details, "missing");
    }

    #[test]
    fn test_technologies_truncated() {
        let mut project = record("big");
        project.technologies = ["a", "b", "c", "d", "e", "f"].into_iter().map(tech).collect();
        assert_eq!(format_technologies(&project), "a, b, c, d +2");
    }

    #[test]
    fn test_build_project_rows_empty() {
        assert!(build_project_rows(&[]).is_empty());
    }

    #[test]
    fn test_summary_rows() {
        let request = ScrapeRequest::new("https://hack.devpost.com", "Hack 2024", None).unwrap();
        let summary = ScrapeSummary::from_outcomes(Vec::new(), "debug/hack-2024/ts".into());
        let ok = SummaryRow::completed(&request, &summary);
        assert_eq!(ok.status, "ok");
        assert_eq!(ok.details, "debug/hack-2024/ts");

        let failed = SummaryRow::failed("Hack 2024", "https://hack.devpost.com", "boom");
        assert_eq!(failed.status, "failed");
        assert_eq!(failed.details, "boom");
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["errorCount"], 0);
        assert_eq!(json["hackathon"], "Hack 2024");
    }

    #[test]
    fn test_project_csv_headers() {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for row in build_project_rows(&[record("a")]) {
            wtr.serialize(row).unwrap();
        }
        let out = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        let header = out.lines().next().unwrap();
        assert_eq!(
            header,
            "Title,Hackathon,Awards,Team,Built With,Likes,Comments,Details,URL"
        );
    }
}
