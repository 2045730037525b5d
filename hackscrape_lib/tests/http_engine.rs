//! The static-HTML engine against a local HTTP server.

use hackscrape_lib::{
    scrape_hackathon, Db, Engine, FetchError, HackscrapeError, ScrapeRequest, ScraperConfig,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(body)
}

fn http_config(debug_root: &std::path::Path) -> ScraperConfig {
    ScraperConfig {
        engine: Engine::Http,
        debug_root: debug_root.to_path_buf(),
        user_agent: Some("hackscrape-tests".into()),
        ..ScraperConfig::default()
    }
}

fn test_db() -> Db {
    let db = Db::open_in_memory().unwrap();
    db.init().unwrap();
    db
}

#[tokio::test]
async fn scrapes_a_served_hackathon() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/project-gallery"))
        .respond_with(html(fixture("gallery.html")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/software/alpha"))
        .respond_with(html(fixture("alpha.html")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/software/beta"))
        .respond_with(html(fixture("beta.html")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/software/gamma"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    // Non-winners are never visited.
    Mock::given(method("GET"))
        .and(path("/software/delta"))
        .respond_with(html(String::new()))
        .expect(0)
        .mount(&server)
        .await;

    let root = tempfile::tempdir().unwrap();
    let config = http_config(root.path());
    let db = test_db();
    let request = ScrapeRequest::new(&server.uri(), "Local Hack", None).unwrap();

    let summary = scrape_hackathon(&request, &config, &db).await.unwrap();

    assert_eq!(summary.success_count, 3);
    assert_eq!(summary.error_count, 0);
    assert_eq!(summary.degraded_count(), 1);
    assert!(summary.debug_dir.contains("local-hack"));

    let alpha_url = format!("{}/software/alpha", server.uri());
    let alpha = db.get_project(&alpha_url).unwrap().unwrap();
    assert_eq!(alpha.engagement.likes, 27);
    assert_eq!(alpha.team_members[0].profile_url, format!("{}/ada", server.uri()));

    let gamma = db
        .get_project(&format!("{}/software/gamma", server.uri()))
        .unwrap()
        .unwrap();
    assert!(gamma.is_degraded());

    // No renderer, so only the text artifacts exist.
    let dir = std::path::PathBuf::from(&summary.debug_dir);
    assert!(dir.join("page-content.html").exists());
    assert!(!dir.join("initial-load.png").exists());
}

#[tokio::test]
async fn missing_gallery_aborts_the_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/project-gallery"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let root = tempfile::tempdir().unwrap();
    let config = http_config(root.path());
    let db = test_db();
    let request = ScrapeRequest::new(&server.uri(), "Gone Hack", Some(5)).unwrap();

    let err = scrape_hackathon(&request, &config, &db).await.unwrap_err();
    assert!(matches!(
        err,
        HackscrapeError::Fetch(FetchError::Navigation {
            status: Some(404),
            ..
        })
    ));
    assert_eq!(db.project_count().unwrap(), 0);
}

#[tokio::test]
async fn gallery_without_entries_is_a_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/project-gallery"))
        .respond_with(html("<html><body><div id=\"app\"></div></body></html>".into()))
        .mount(&server)
        .await;

    let root = tempfile::tempdir().unwrap();
    let config = http_config(root.path());
    let db = test_db();
    let request = ScrapeRequest::new(&server.uri(), "Empty Hack", None).unwrap();

    let err = scrape_hackathon(&request, &config, &db).await.unwrap_err();
    assert!(matches!(err, HackscrapeError::Fetch(FetchError::Timeout { .. })));
}
