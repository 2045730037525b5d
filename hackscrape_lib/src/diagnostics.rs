//! Per-run diagnostic artifacts.
//!
//! Screenshots, page dumps and JSON snapshots are written next to each other
//! so selector breakage can be investigated after the fact. Writing them is
//! best effort: failures are logged and never affect a run.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::Serialize;

/// Destination for diagnostic artifacts.
pub trait DiagnosticsSink {
    /// Directory the artifacts land in, when there is one.
    fn location(&self) -> Option<&Path>;

    fn save_bytes(&self, name: &str, bytes: &[u8]);

    fn save_text(&self, name: &str, text: &str) {
        self.save_bytes(name, text.as_bytes());
    }

    fn save_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) {
        match serde_json::to_vec_pretty(value) {
            Ok(bytes) => self.save_bytes(name, &bytes),
            Err(e) => tracing::warn!("Failed to serialize {}: {}", name, e),
        }
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDiagnostics;

impl DiagnosticsSink for NoDiagnostics {
    fn location(&self) -> Option<&Path> {
        None
    }

    fn save_bytes(&self, _name: &str, _bytes: &[u8]) {}
}

/// A timestamped directory under the debug root, one per run:
/// `<root>/<hackathon-slug>/<timestamp>/`.
#[derive(Debug, Clone)]
pub struct DebugDir {
    path: PathBuf,
    ready: bool,
}

impl DebugDir {
    /// Creates the run directory. A failure is logged and leaves the sink
    /// inert.
    pub fn create(root: &Path, hackathon_name: &str, started_at: DateTime<Utc>) -> Self {
        let path = root
            .join(slugify(hackathon_name, "hackathon"))
            .join(timestamp_component(started_at));
        let ready = match std::fs::create_dir_all(&path) {
            Ok(()) => {
                tracing::info!("Writing diagnostics to {}", path.display());
                true
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to create debug directory {}: {}",
                    path.display(),
                    e
                );
                false
            }
        };
        Self { path, ready }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DiagnosticsSink for DebugDir {
    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn save_bytes(&self, name: &str, bytes: &[u8]) {
        if !self.ready {
            return;
        }
        let target = self.path.join(name);
        match std::fs::write(&target, bytes) {
            Ok(()) => tracing::debug!("Saved {}", target.display()),
            Err(e) => tracing::warn!("Failed to write {}: {}", target.display(), e),
        }
    }
}

/// Lowercased name with whitespace runs turned into `-`, keeping letters,
/// digits, `_` and `-` in any script. Falls back to `fallback` when nothing
/// is left.
pub fn slugify(name: &str, fallback: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let whitespace = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"));

    let lowered = name.trim().to_lowercase();
    let slug: String = whitespace
        .replace_all(&lowered, "-")
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-'))
        .collect();
    if slug.chars().all(|c| c == '-') {
        fallback.to_string()
    } else {
        slug
    }
}

/// RFC 3339 timestamp with `:` and `.` replaced so it is a valid path
/// component on every platform.
pub fn timestamp_component(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn slugify_names() {
        assert_eq!(slugify("HackMIT 2024", "x"), "hackmit-2024");
        assert_eq!(slugify("  TreeHacks:  Spring/Edition! ", "x"), "treehacks-springedition");
        assert_eq!(slugify("cal_hacks-11", "x"), "cal_hacks-11");
    }

    #[test]
    fn slugify_keeps_non_ascii_letters() {
        assert_eq!(slugify("ハッカソン東京", "x"), "ハッカソン東京");
        assert_eq!(slugify("Hackathon München 2024", "x"), "hackathon-münchen-2024");
    }

    #[test]
    fn slugify_falls_back_when_empty() {
        assert_eq!(slugify("", "hackathon"), "hackathon");
        assert_eq!(slugify("!!! ???", "hackathon"), "hackathon");
    }

    #[test]
    fn debug_dir_uses_fallback_segment() {
        let root = tempfile::tempdir().unwrap();
        let at = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        let dir = DebugDir::create(root.path(), "???", at);
        assert_eq!(
            dir.path(),
            root.path().join("hackathon").join("2024-05-06T07-08-09-000Z")
        );
        assert!(dir.path().is_dir());
    }

    #[test]
    fn timestamp_has_no_colons_or_dots() {
        let at = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(timestamp_component(at), "2024-05-06T07-08-09-000Z");
    }

    #[test]
    fn debug_dir_writes_files() {
        let root = tempfile::tempdir().unwrap();
        let at = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        let dir = DebugDir::create(root.path(), "Hack The North", at);
        assert_eq!(
            dir.path(),
            root.path()
                .join("hack-the-north")
                .join("2024-05-06T07-08-09-000Z")
        );

        dir.save_text("page-content.html", "<html></html>");
        dir.save_json("winning-projects.json", &vec!["a", "b"]);

        let html = std::fs::read_to_string(dir.path().join("page-content.html")).unwrap();
        assert_eq!(html, "<html></html>");
        let json: Vec<String> = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("winning-projects.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(json, vec!["a", "b"]);
    }

    #[test]
    fn uncreatable_dir_is_inert() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("blocker");
        std::fs::write(&blocker, b"file, not a directory").unwrap();

        let dir = DebugDir::create(&blocker, "Hack", Utc::now());
        dir.save_text("page-content.html", "ignored");
        assert!(!dir.path().exists());
    }

    #[test]
    fn no_diagnostics_has_no_location() {
        assert!(NoDiagnostics.location().is_none());
        NoDiagnostics.save_text("anything.txt", "dropped");
    }
}
