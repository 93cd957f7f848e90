//! Integration tests for `PageFetcher` against a local `wiremock` server.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scraper::Selector;
use teadb_scraper::{PageFetcher, ScraperError};

fn test_fetcher(max_retries: u32) -> PageFetcher {
    PageFetcher::new(5, "teadb-test/0.1", max_retries, 0).expect("failed to build test PageFetcher")
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_owned(), "text/html; charset=utf-8")
}

#[tokio::test]
async fn fetch_parses_html_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tea"))
        .respond_with(html("<html><head><title>Dragon Well | TeaSource</title></head></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let document = test_fetcher(3)
        .fetch(&format!("{}/tea", server.uri()))
        .await
        .expect("expected a document");

    let title = Selector::parse("title").unwrap();
    let text: String = document.select(&title).next().unwrap().text().collect();
    assert_eq!(text, "Dragon Well | TeaSource");
}

#[tokio::test]
async fn fetch_gives_up_after_retry_cap_and_returns_none() {
    let server = MockServer::start().await;
    // 1 initial attempt + 3 retries
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .expect(4)
        .mount(&server)
        .await;

    let fetcher = test_fetcher(3);
    let url = format!("{}/flaky", server.uri());
    assert!(fetcher.fetch(&url).await.is_none());
    server.verify().await;
}

#[tokio::test]
async fn fetch_document_returns_last_status_after_exhaustion() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let result = test_fetcher(2)
        .fetch_document(&format!("{}/down", server.uri()))
        .await;
    assert!(
        matches!(result, Err(ScraperError::UnexpectedStatus { status: 500, .. })),
        "expected UnexpectedStatus 500"
    );
}

#[tokio::test]
async fn fetch_recovers_when_retry_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/recovering"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/recovering"))
        .respond_with(html("<html><body><p>ok</p></body></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let document = test_fetcher(3)
        .fetch(&format!("{}/recovering", server.uri()))
        .await;
    assert!(document.is_some());
}

#[tokio::test]
async fn not_found_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_fetcher(3)
        .fetch_document(&format!("{}/missing", server.uri()))
        .await;
    assert!(matches!(result, Err(ScraperError::NotFound { .. })));
}

#[tokio::test]
async fn non_html_content_is_a_parse_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = test_fetcher(3);
    let url = format!("{}/feed.json", server.uri());
    let result = fetcher.fetch_document(&url).await;
    assert!(matches!(result, Err(ScraperError::Parse { .. })));
}

#[tokio::test]
async fn empty_body_yields_no_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blank"))
        .respond_with(html("   "))
        .expect(1)
        .mount(&server)
        .await;

    assert!(test_fetcher(3)
        .fetch(&format!("{}/blank", server.uri()))
        .await
        .is_none());
}

#[tokio::test]
async fn redirect_loop_is_attempted_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/loop"))
        .mount(&server)
        .await;

    let result = test_fetcher(3)
        .fetch_document(&format!("{}/loop", server.uri()))
        .await;
    assert!(matches!(result, Err(ScraperError::Http(_))));

    // reqwest follows 10 redirects before giving up; one attempt is 11 requests.
    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 11);
}

#[tokio::test]
async fn malformed_url_is_not_retried() {
    let result = test_fetcher(3).fetch_document("not a url").await;
    match result {
        Err(ScraperError::Http(e)) => assert!(e.is_builder()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected an error for a malformed url"),
    }
}
