//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, including saving and re-analyzing.

use site_survey::config::CrawlerConfig;
use site_survey::crawler::{
    Coordinator, CrawlEvent, CrawlOutcome, ProgressReporter, REQUEST_DELAY,
};
use site_survey::output::ReportSection;
use site_survey::storage::{DirectoryStore, PageStore};
use site_survey::{run_crawl, summarize, CrawlState, SurveyError};
use tempfile::TempDir;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a crawler configuration with a short timeout
fn test_config(max_pages: usize, max_depth: u32) -> CrawlerConfig {
    CrawlerConfig {
        max_pages,
        max_depth,
        timeout_seconds: 5,
    }
}

/// Serves an HTML page at the given path, expecting `times` requests
async fn mount_html(server: &MockServer, route: &str, body: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
        .expect(times)
        .mount(server)
        .await;
}

/// Runs a crawl to completion and collects every progress event
async fn crawl_with_events(seed: &str, config: CrawlerConfig) -> (CrawlOutcome, Vec<CrawlEvent>) {
    let (progress, mut events) = ProgressReporter::channel(1024);
    let coordinator = Coordinator::new(seed, config, progress).expect("valid seed");
    let outcome = coordinator.run().await.expect("crawl runs");

    let mut received = Vec::new();
    while let Ok(event) = events.try_recv() {
        received.push(event);
    }
    (outcome, received)
}

/// URLs in the order they were requested
fn fetch_order(events: &[CrawlEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            CrawlEvent::Fetching { url, .. } => Some(url.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/",
        r#"<html><head><title>Home</title></head><body>
            <a href="/page1">Page 1</a>
            <a href="/page2">Page 2</a>
        </body></html>"#,
        1,
    )
    .await;
    mount_html(
        &server,
        "/page1",
        r#"<html><body><a href="/">Home</a><p>first page</p></body></html>"#,
        1,
    )
    .await;
    mount_html(
        &server,
        "/page2",
        r#"<html><body><a href="/page1">Page 1</a><p>second page</p></body></html>"#,
        1,
    )
    .await;

    let (outcome, events) = crawl_with_events(&format!("{}/", base), test_config(50, 2)).await;

    assert_eq!(outcome.state, CrawlState::Completed);
    let urls: Vec<&str> = outcome.pages.iter().map(|p| p.url()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/", base),
            format!("{}/page1", base),
            format!("{}/page2", base)
        ]
    );
    assert_eq!(outcome.pages.get(&format!("{}/", base)).unwrap().depth(), 0);
    assert_eq!(outcome.pages.get(&format!("{}/page2", base)).unwrap().depth(), 1);

    assert!(matches!(events.first(), Some(CrawlEvent::Started { .. })));
    assert_eq!(events.last(), Some(&CrawlEvent::Completed { pages: 3 }));
}

#[tokio::test]
async fn test_breadth_first_order() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(&server, "/", r#"<a href="/b">B</a><a href="/c">C</a>"#, 1).await;
    mount_html(&server, "/b", r#"<a href="/d">D</a>"#, 1).await;
    mount_html(&server, "/c", "<p>leaf</p>", 1).await;
    mount_html(&server, "/d", "<p>deep</p>", 1).await;

    let (outcome, events) = crawl_with_events(&format!("{}/", base), test_config(50, 2)).await;

    assert_eq!(
        fetch_order(&events),
        vec![
            format!("{}/", base),
            format!("{}/b", base),
            format!("{}/c", base),
            format!("{}/d", base)
        ]
    );
    assert_eq!(outcome.pages.get(&format!("{}/d", base)).unwrap().depth(), 2);
}

#[tokio::test]
async fn test_max_pages_cap() {
    let server = MockServer::start().await;
    let base = server.uri();

    let links: String = (1..=5)
        .map(|i| format!(r#"<a href="/p{}">p</a>"#, i))
        .collect();
    mount_html(&server, "/", &links, 1).await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/p[0-9]$"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>child</p>", "text/html"))
        .mount(&server)
        .await;

    let (outcome, events) = crawl_with_events(&format!("{}/", base), test_config(2, 2)).await;

    assert_eq!(outcome.pages.len(), 2);
    assert_eq!(fetch_order(&events).len(), 2);
    assert_eq!(outcome.state, CrawlState::Completed);
}

#[tokio::test]
async fn test_max_depth_zero_fetches_only_seed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(&server, "/", r#"<a href="/next">Next</a>"#, 1).await;
    mount_html(&server, "/next", "<p>never</p>", 0).await;

    let pages = run_crawl(
        &format!("{}/", base),
        test_config(50, 0),
        ProgressReporter::silent(),
    )
    .await
    .unwrap();

    assert_eq!(pages.len(), 1);
}

#[tokio::test]
async fn test_base_path_restriction() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/docs/",
        r#"
            <a href="intro">Intro</a>
            <a href="/blog/post">Blog</a>
            <a href="/docsextra">Lookalike</a>
            <a href="https://elsewhere.invalid/docs/x">Other site</a>
        "#,
        1,
    )
    .await;
    mount_html(&server, "/docs/intro", "<p>intro</p>", 1).await;
    mount_html(&server, "/blog/post", "<p>blog</p>", 0).await;
    mount_html(&server, "/docsextra", "<p>extra</p>", 0).await;

    let (outcome, events) =
        crawl_with_events(&format!("{}/docs/", base), test_config(50, 2)).await;

    assert_eq!(outcome.pages.len(), 2);
    assert!(outcome.pages.contains(&format!("{}/docs/intro", base)));
    assert!(fetch_order(&events)
        .iter()
        .all(|url| url.starts_with(&format!("{}/docs", base))));
}

#[tokio::test]
async fn test_failed_page_does_not_stop_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/",
        r#"<a href="/missing">Missing</a><a href="/ok">OK</a>"#,
        1,
    )
    .await;
    mount_html(&server, "/ok", "<p>fine</p>", 1).await;
    // Unmatched paths get wiremock's default 404

    let (outcome, events) = crawl_with_events(&format!("{}/", base), test_config(50, 2)).await;

    assert_eq!(outcome.pages.len(), 2);
    assert!(!outcome.pages.contains(&format!("{}/missing", base)));
    assert!(events.iter().any(|event| matches!(
        event,
        CrawlEvent::Failed { url, reason } if url.ends_with("/missing") && reason.contains("404")
    )));
    assert_eq!(events.last(), Some(&CrawlEvent::Completed { pages: 2 }));
}

#[tokio::test]
async fn test_seed_server_error_yields_empty_set() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (outcome, events) =
        crawl_with_events(&format!("{}/", server.uri()), test_config(50, 2)).await;

    assert!(outcome.pages.is_empty());
    assert_eq!(outcome.state, CrawlState::Completed);
    assert!(events
        .iter()
        .any(|event| matches!(event, CrawlEvent::Failed { .. })));
    assert_eq!(events.last(), Some(&CrawlEvent::Completed { pages: 0 }));

    let report = summarize(&outcome.pages).unwrap();
    assert_eq!(report.len(), 1);
}

#[tokio::test]
async fn test_invalid_seed_url() {
    let result = run_crawl(
        "example.com/page",
        test_config(50, 2),
        ProgressReporter::silent(),
    )
    .await;
    assert!(matches!(result, Err(SurveyError::InvalidSeedUrl { .. })));
}

#[tokio::test]
async fn test_duplicate_links_fetched_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/",
        r##"
            <a href="/a">A</a>
            <a href="/a#section">A again</a>
            <a href="./a">A relative</a>
            <a href="#top">Top</a>
            <a href="javascript:void(0)">Script</a>
            <a href="mailto:a@b.com">Mail</a>
        "##,
        1,
    )
    .await;
    mount_html(&server, "/a", r#"<a href="/">Home</a>"#, 1).await;

    let (outcome, _) = crawl_with_events(&format!("{}/", base), test_config(50, 3)).await;
    assert_eq!(outcome.pages.len(), 2);
}

#[tokio::test]
async fn test_non_html_page_stored_but_not_followed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(&server, "/", r#"<a href="/file.pdf">PDF</a>"#, 1).await;
    Mock::given(method("GET"))
        .and(path("/file.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"<a href="/secret">hidden</a>"#, "application/pdf"),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_html(&server, "/secret", "<p>secret</p>", 0).await;

    let (outcome, _) = crawl_with_events(&format!("{}/", base), test_config(50, 2)).await;

    assert_eq!(outcome.pages.len(), 2);
    let pdf = outcome.pages.get(&format!("{}/file.pdf", base)).unwrap();
    assert!(!pdf.is_html());
}

#[tokio::test]
async fn test_redirected_page_resolves_links_from_final_url() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(&server, "/", r#"<a href="/old">Old</a>"#, 1).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", format!("{}/new/", base).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_html(&server, "/new/", r#"<a href="child">Child</a>"#, 1).await;
    mount_html(&server, "/new/child", "<p>child</p>", 1).await;

    let (outcome, _) = crawl_with_events(&format!("{}/", base), test_config(50, 2)).await;

    assert_eq!(outcome.pages.len(), 3);
    assert!(outcome.pages.contains(&format!("{}/old", base)));
    assert!(outcome.pages.contains(&format!("{}/new/child", base)));
}

#[tokio::test]
async fn test_redirect_target_not_fetched_twice() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(&server, "/", r#"<a href="/old">Old</a><a href="/new">New</a>"#, 1).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/new"))
        .expect(1)
        .mount(&server)
        .await;
    mount_html(&server, "/new", "<p>moved here</p>", 1).await;

    let (outcome, events) = crawl_with_events(&format!("{}/", base), test_config(50, 2)).await;

    let urls: Vec<&str> = outcome.pages.iter().map(|p| p.url()).collect();
    assert_eq!(urls, vec![format!("{}/", base), format!("{}/old", base)]);
    assert_eq!(
        fetch_order(&events),
        vec![format!("{}/", base), format!("{}/old", base)]
    );
}

#[tokio::test]
async fn test_delay_between_successful_fetches() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(&server, "/", r#"<a href="/a">A</a><a href="/b">B</a>"#, 1).await;
    mount_html(&server, "/a", "<p>a</p>", 1).await;
    mount_html(&server, "/b", "<p>b</p>", 1).await;

    let (outcome, _) = crawl_with_events(&format!("{}/", base), test_config(50, 2)).await;

    assert_eq!(outcome.pages.len(), 3);
    // No pause after the last page
    assert!(outcome.elapsed >= REQUEST_DELAY * 2);
    assert!(outcome.elapsed < REQUEST_DELAY * 3);
}

#[tokio::test]
async fn test_failed_fetch_adds_no_delay() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(&server, "/", r#"<a href="/missing">X</a><a href="/a">A</a>"#, 1).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    mount_html(&server, "/a", "<p>a</p>", 1).await;

    let (outcome, _) = crawl_with_events(&format!("{}/", base), test_config(50, 2)).await;

    assert_eq!(outcome.pages.len(), 2);
    assert!(outcome.elapsed >= REQUEST_DELAY);
    assert!(outcome.elapsed < REQUEST_DELAY * 2);
}

#[tokio::test]
async fn test_cancel_during_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(&server, "/", r#"<a href="/b">B</a><a href="/c">C</a>"#, 1).await;
    mount_html(&server, "/b", "<p>b</p>", 0).await;
    mount_html(&server, "/c", "<p>c</p>", 0).await;

    let (progress, mut events) = ProgressReporter::channel(64);
    let coordinator =
        Coordinator::new(&format!("{}/", base), test_config(50, 2), progress).unwrap();
    let cancel = coordinator.cancel_handle();
    let worker = tokio::spawn(coordinator.run());

    // The coordinator pauses after each page, which leaves time to cancel
    let mut received = Vec::new();
    while let Some(event) = events.recv().await {
        if matches!(event, CrawlEvent::Fetched { .. }) {
            cancel.cancel();
        }
        received.push(event);
    }

    let outcome = worker.await.unwrap().unwrap();
    assert_eq!(outcome.state, CrawlState::Aborted);
    assert_eq!(outcome.pages.len(), 1);
    assert_eq!(received.last(), Some(&CrawlEvent::Aborted { pages: 1 }));
}

#[tokio::test]
async fn test_saved_crawl_reproduces_report() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/",
        r#"<html><body>
            <h1>Garden notes</h1>
            <p>Tomatoes need sun. Tomatoes need water.</p>
            <img src="/img/tomato.JPG">
            <a href="/beans">Beans</a><a href="/herbs">Herbs</a>
            <a href="https://seeds.example.org/">Seeds</a>
        </body></html>"#,
        1,
    )
    .await;
    mount_html(
        &server,
        "/beans",
        r#"<p>Beans climb. Beans need water.</p><img src="/img/bean.png">"#,
        1,
    )
    .await;
    mount_html(
        &server,
        "/herbs",
        r#"<p>Herbs like sun.</p><a href="/guide.pdf">Guide</a>"#,
        1,
    )
    .await;

    let pages = run_crawl(
        &format!("{}/", base),
        test_config(50, 1),
        ProgressReporter::silent(),
    )
    .await
    .unwrap();
    assert_eq!(pages.len(), 3);
    let live_report = summarize(&pages).unwrap();

    let dir = TempDir::new().unwrap();
    let store = DirectoryStore::new(dir.path());
    store.save(&pages).unwrap();
    let reloaded = store.load().unwrap();
    let reloaded_report = summarize(&reloaded).unwrap();

    assert_eq!(
        live_report.get(ReportSection::Statistics),
        reloaded_report.get(ReportSection::Statistics)
    );
    assert_eq!(live_report, reloaded_report);

    let stats = live_report.get(ReportSection::Statistics).unwrap();
    assert!(stats.contains("- Pages downloaded: 3\n"));
    assert!(stats.contains(" 1. need: 3\n"));
    assert!(live_report.contains(ReportSection::Documents));
}
