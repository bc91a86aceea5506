use adstxt_validator::config::HttpConfig;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// HTTP config for tests: no jitter, no SSL retry delay, short timeout.
pub fn test_http_config() -> HttpConfig {
    HttpConfig {
        user_agent: "adstxt-validator-tests".to_string(),
        request_timeout_secs: 5,
        jitter_min_ms: 0,
        jitter_max_ms: 0,
        ssl_retry_delay_ms: 0,
    }
}

/// The authority (`host:port`) of a mock server, usable as a target domain.
///
/// The fetcher's HTTPS attempt against this plain-HTTP port fails and falls
/// back to HTTP, which is the path under test.
pub fn server_authority(server: &MockServer) -> String {
    let uri = server.uri();
    uri.strip_prefix("http://").unwrap_or(&uri).to_string()
}

/// Serves declaration-file content at `/{file_name}` with a text/plain body.
pub async fn mock_declaration_server(file_name: &str, body: &str) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/{}", file_name)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body.to_string())
                .insert_header("content-type", "text/plain; charset=utf-8"),
        )
        .mount(&server)
        .await;

    server
}

/// Serves an HTML landing page at `/{file_name}` with status 200, simulating
/// hosts that return a styled 404 page instead of the real file.
pub async fn mock_html_server(file_name: &str) -> MockServer {
    let server = MockServer::start().await;

    let html = "<!DOCTYPE html>\n<html><head><title>Page not found</title></head>\
                <body><h1>404</h1></body></html>";

    Mock::given(method("GET"))
        .and(path(format!("/{}", file_name)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html.to_string())
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    server
}

/// Returns the specified HTTP error status for every request.
pub async fn mock_status_server(status_code: u16) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status_code))
        .mount(&server)
        .await;

    server
}

/// An authority on which nothing is listening, to simulate connection failure.
pub fn unreachable_authority() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("127.0.0.1:{}", port)
}
