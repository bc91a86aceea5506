mod common;

use adstxt_validator::fetch::{Fetcher, FetchOutcome};
use common::mock_servers::{
    mock_declaration_server, mock_html_server, mock_status_server, server_authority,
    test_http_config, unreachable_authority,
};

#[tokio::test]
async fn test_fetch_falls_back_to_http_and_returns_body() {
    let body = "google.com, pub-1234, DIRECT\nonetag.com, 5d0d72448d8bfb0, RESELLER\n";
    let server = mock_declaration_server("ads.txt", body).await;
    let fetcher = Fetcher::new(test_http_config());

    // HTTPS against the plain-HTTP mock port fails; the HTTP fallback succeeds
    let outcome = fetcher.fetch(&server_authority(&server), "ads.txt").await;

    match outcome {
        FetchOutcome::Success { body: fetched, ssl_warning } => {
            assert_eq!(fetched, body);
            assert!(!ssl_warning, "plain HTTP success must not carry an SSL warning");
        }
        FetchOutcome::Failed { reason } => panic!("expected success, got: {}", reason),
    }
}

#[tokio::test]
async fn test_fetch_accepts_scheme_and_path_in_target() {
    let server = mock_declaration_server("ads.txt", "a.com, 1, DIRECT").await;
    let fetcher = Fetcher::new(test_http_config());

    // URL-ish target input: scheme prefix and path suffix are stripped
    let target = format!("https://{}/some/landing/page", server_authority(&server));
    let outcome = fetcher.fetch(&target, "ads.txt").await;

    assert!(!outcome.is_error(), "got: {}", outcome.status_label());
}

#[tokio::test]
async fn test_fetch_rejects_html_body_despite_200() {
    let server = mock_html_server("ads.txt").await;
    let fetcher = Fetcher::new(test_http_config());

    let outcome = fetcher.fetch(&server_authority(&server), "ads.txt").await;

    assert_eq!(
        outcome,
        FetchOutcome::Failed { reason: "Error: HTML Page instead of txt".to_string() }
    );
}

#[tokio::test]
async fn test_fetch_reports_http_status_failures() {
    let server = mock_status_server(404).await;
    let fetcher = Fetcher::new(test_http_config());

    let outcome = fetcher.fetch(&server_authority(&server), "ads.txt").await;

    assert_eq!(
        outcome,
        FetchOutcome::Failed { reason: "Not accessible: HTTP 404".to_string() }
    );
}

#[tokio::test]
async fn test_fetch_reports_connection_failure() {
    let fetcher = Fetcher::new(test_http_config());

    let outcome = fetcher.fetch(&unreachable_authority(), "ads.txt").await;

    match outcome {
        FetchOutcome::Failed { reason } => {
            assert!(reason.starts_with("Not accessible:"), "got: {}", reason);
        }
        FetchOutcome::Success { .. } => panic!("expected failure for unreachable host"),
    }
}

#[tokio::test]
async fn test_fetch_uses_requested_file_name() {
    // Server only knows app-ads.txt; asking for ads.txt must fail
    let server = mock_declaration_server("app-ads.txt", "a.com, 1, DIRECT").await;
    let fetcher = Fetcher::new(test_http_config());
    let authority = server_authority(&server);

    let outcome = fetcher.fetch(&authority, "app-ads.txt").await;
    assert!(!outcome.is_error());

    let outcome = fetcher.fetch(&authority, "ads.txt").await;
    assert!(outcome.is_error());
}
