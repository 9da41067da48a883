//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run full crawls
//! through `HttpBrowser` end-to-end.

use std::time::Duration;
use tempfile::TempDir;
use visreg::config::{load_config, save_config, Config};
use visreg::crawler::{crawl, CrawlOptions, HttpBrowser};
use visreg::state::PageState;
use visreg::CrawlError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds an HTML response linking to `links`
fn html_page(links: &[&str], extra: &str) -> ResponseTemplate {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();

    ResponseTemplate::new(200).set_body_raw(
        format!(
            "<html><head><title>Test</title></head><body>{}{}</body></html>",
            extra, anchors
        ),
        "text/html; charset=utf-8",
    )
}

/// Mounts a page that must be requested exactly `times` times
async fn mount_page(server: &MockServer, route: &str, links: &[&str], times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(links, ""))
        .expect(times)
        .mount(server)
        .await;
}

fn options(max_depth: u32, max_pages: usize, concurrency: usize) -> CrawlOptions {
    CrawlOptions {
        max_depth,
        max_pages,
        concurrency,
        navigation_timeout: Duration::from_secs(5),
        ..Default::default()
    }
}

fn names(targets: &[visreg::Target]) -> Vec<String> {
    targets.iter().map(|t| t.name.clone()).collect()
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let server = MockServer::start().await;

    mount_page(&server, "/", &["/page1", "page2"], 1).await;
    mount_page(&server, "/page1", &["/page1/detail", "/"], 1).await;
    mount_page(&server, "/page2", &["/page1"], 1).await;
    mount_page(&server, "/page1/detail", &[], 1).await;

    let report = crawl(&HttpBrowser::default(), &server.uri(), options(2, 20, 5))
        .await
        .expect("crawl should succeed");

    let names = names(&report.targets);
    assert_eq!(names.len(), 4);
    assert_eq!(names[0], "homepage");
    assert!(names[1..3].contains(&"page1".to_string()));
    assert!(names[1..3].contains(&"page2".to_string()));
    assert_eq!(names[3], "page1-detail");

    assert_eq!(report.targets[3].url, "/page1/detail");
    assert_eq!(report.stats.targets_found, 4);
    assert_eq!(report.stats.pages_skipped(), 0);
}

#[tokio::test]
async fn test_crawl_with_depth_limit() {
    let server = MockServer::start().await;

    mount_page(&server, "/", &["/level1"], 1).await;
    mount_page(&server, "/level1", &["/level1/level2"], 1).await;
    mount_page(&server, "/level1/level2", &[], 0).await;

    let report = crawl(&HttpBrowser::default(), &server.uri(), options(1, 20, 5))
        .await
        .unwrap();

    assert_eq!(names(&report.targets), vec!["homepage", "level1"]);
    assert_eq!(report.stats.count(PageState::MaxDepthReached), 1);
}

#[tokio::test]
async fn test_depth_zero_visits_only_seed() {
    let server = MockServer::start().await;

    mount_page(&server, "/", &["/about"], 1).await;
    mount_page(&server, "/about", &[], 0).await;

    let report = crawl(&HttpBrowser::default(), &server.uri(), options(0, 20, 5))
        .await
        .unwrap();

    assert_eq!(names(&report.targets), vec!["homepage"]);
    assert_eq!(report.targets[0].url, "/");
}

#[tokio::test]
async fn test_page_cap() {
    let server = MockServer::start().await;

    mount_page(&server, "/", &["/a", "/b", "/c", "/d", "/e"], 1).await;
    mount_page(&server, "/a", &[], 1).await;
    for route in ["/b", "/c", "/d", "/e"] {
        mount_page(&server, route, &[], 0).await;
    }

    let report = crawl(&HttpBrowser::default(), &server.uri(), options(2, 2, 1))
        .await
        .unwrap();

    assert_eq!(names(&report.targets), vec!["homepage", "a"]);
    assert_eq!(report.stats.pages_dispatched, 2);
}

#[tokio::test]
async fn test_fragment_and_slash_variants_fetched_once() {
    let server = MockServer::start().await;

    mount_page(&server, "/", &["/about", "/about#team", "/about/", "#top"], 1).await;
    mount_page(&server, "/about", &["/about#history", "/"], 1).await;

    let report = crawl(&HttpBrowser::default(), &server.uri(), options(2, 20, 5))
        .await
        .unwrap();

    assert_eq!(names(&report.targets), vec!["homepage", "about"]);
}

#[tokio::test]
async fn test_missing_selector_yields_no_targets() {
    let server = MockServer::start().await;

    mount_page(&server, "/", &["/child"], 1).await;
    mount_page(&server, "/child", &[], 0).await;

    let options = CrawlOptions {
        selector: "#app".to_string(),
        ..options(2, 20, 5)
    };
    let report = crawl(&HttpBrowser::default(), &server.uri(), options)
        .await
        .expect("a missing selector is not a crawl failure");

    assert!(report.targets.is_empty());
    assert_eq!(report.stats.count(PageState::SelectorNotFound), 1);
}

#[tokio::test]
async fn test_selector_filters_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&["/with", "/without"], r#"<div id="app"></div>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/with"))
        .respond_with(html_page(&[], r#"<div id="app">content</div>"#))
        .mount(&server)
        .await;
    mount_page(&server, "/without", &[], 1).await;

    let options = CrawlOptions {
        selector: "#app".to_string(),
        ..options(2, 20, 1)
    };
    let report = crawl(&HttpBrowser::default(), &server.uri(), options)
        .await
        .unwrap();

    assert_eq!(names(&report.targets), vec!["homepage", "with"]);
    assert!(report.targets.iter().all(|t| t.selector == "#app"));
}

#[tokio::test]
async fn test_cross_origin_links_not_followed() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;

    let external = format!("{}/external", other.uri());
    mount_page(&server, "/", &["/local", &external], 1).await;
    mount_page(&server, "/local", &[], 1).await;
    mount_page(&other, "/external", &[], 0).await;

    let report = crawl(&HttpBrowser::default(), &server.uri(), options(2, 20, 5))
        .await
        .unwrap();

    assert_eq!(names(&report.targets), vec!["homepage", "local"]);
    assert_eq!(report.stats.cross_origin_links, 1);
}

#[tokio::test]
async fn test_content_type_and_status_handling() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        &["/doc.pdf", "/missing", "/broken", "/untyped", "/ok"],
        1,
    )
    .await;
    mount_page(&server, "/ok", &[], 1).await;

    Mock::given(method("GET"))
        .and(path("/doc.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_raw(
            "<html><body><h1>Not found</h1></body></html>",
            "text/html",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_raw(
            "<html><body><h1>Server error</h1></body></html>",
            "text/html",
        ))
        .mount(&server)
        .await;
    // No Content-Type header; the body is sniffed instead
    Mock::given(method("GET"))
        .and(path("/untyped"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"<!DOCTYPE html><html><body><a href=\"/ok\">ok</a></body></html>".to_vec()),
        )
        .mount(&server)
        .await;

    let report = crawl(&HttpBrowser::default(), &server.uri(), options(2, 20, 5))
        .await
        .unwrap();

    assert_eq!(
        names(&report.targets),
        vec!["homepage", "missing", "broken", "untyped", "ok"]
    );
    assert_eq!(report.stats.count(PageState::ContentMismatch), 1);
    assert_eq!(report.stats.error_status_pages, 2);
    assert_eq!(report.stats.pages_skipped(), 1);
}

#[tokio::test]
async fn test_slow_page_times_out() {
    let server = MockServer::start().await;

    mount_page(&server, "/", &["/slow", "/fast"], 1).await;
    mount_page(&server, "/fast", &[], 1).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html_page(&[], "").set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let options = CrawlOptions {
        navigation_timeout: Duration::from_millis(300),
        ..options(2, 20, 5)
    };
    let report = crawl(&HttpBrowser::default(), &server.uri(), options)
        .await
        .unwrap();

    assert_eq!(names(&report.targets), vec!["homepage", "fast"]);
    assert_eq!(report.stats.count(PageState::TimedOut), 1);
}

#[tokio::test]
async fn test_query_strings_are_distinct_targets() {
    let server = MockServer::start().await;

    mount_page(&server, "/", &["/blog?page=1", "/blog?page=2"], 1).await;
    mount_page(&server, "/blog", &[], 2).await;

    let report = crawl(&HttpBrowser::default(), &server.uri(), options(1, 20, 1))
        .await
        .unwrap();

    assert_eq!(
        names(&report.targets),
        vec!["homepage", "blog-page-1", "blog-page-2"]
    );
    assert_eq!(report.targets[1].url, "/blog?page=1");
}

#[tokio::test]
async fn test_seed_without_document_returns_empty_list() {
    let server = MockServer::start().await;
    // No mocks mounted: every request gets an empty 404 with no content type

    let report = crawl(&HttpBrowser::default(), &server.uri(), options(2, 20, 5))
        .await
        .unwrap();

    assert!(report.targets.is_empty());
    assert_eq!(report.stats.count(PageState::ContentMismatch), 1);
}

#[tokio::test]
async fn test_unreachable_seed_returns_empty_list() {
    let report = crawl(&HttpBrowser::default(), "http://127.0.0.1:1/", options(2, 20, 5))
        .await
        .unwrap();

    assert!(report.targets.is_empty());
    assert_eq!(report.stats.count(PageState::Unreachable), 1);
}

#[tokio::test]
async fn test_invalid_seed_is_rejected() {
    let result = crawl(&HttpBrowser::default(), "not a url", CrawlOptions::default()).await;
    assert!(matches!(result, Err(CrawlError::InvalidSeed(_))));
}

#[tokio::test]
async fn test_discovered_targets_saved_to_config() {
    let server = MockServer::start().await;

    mount_page(&server, "/", &["/pricing"], 1).await;
    mount_page(&server, "/pricing", &[], 1).await;

    let report = crawl(&HttpBrowser::default(), &server.uri(), options(1, 20, 5))
        .await
        .unwrap();

    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config").join("visreg.toml");

    let mut config = Config::default();
    config.options.threshold = 0.25;
    config.base_url = server.uri();
    config.targets = report.targets.clone();
    save_config(&config_path, &config).unwrap();

    let loaded = load_config(&config_path).unwrap();
    assert_eq!(loaded.base_url, server.uri());
    assert_eq!(loaded.targets, report.targets);
    assert_eq!(loaded.options.threshold, 0.25);
}
