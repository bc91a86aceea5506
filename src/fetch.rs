//! Declaration-file retrieval over HTTP
//!
//! Tries HTTPS first, then plain HTTP. A TLS certificate validation failure
//! on the HTTPS attempt gets exactly one retry with certificate validation
//! disabled. A 200 response whose body looks like an HTML document counts as
//! a failure: many hosts serve a styled 404 or landing page instead of the
//! real file.

use crate::config::HttpConfig;
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CACHE_CONTROL};
use reqwest::redirect;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

const ACCEPT_VALUE: &str =
    "text/plain,text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Outcome of fetching one `(domain, filename)` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success {
        body: String,
        /// True when the content was only reachable with certificate validation disabled
        ssl_warning: bool,
    },
    Failed {
        /// Final status text, e.g. `Not accessible: HTTP 404`
        reason: String,
    },
}

impl FetchOutcome {
    /// Presentation status label: `OK`, `OK (SSL Warning)`, or the failure reason
    pub fn status_label(&self) -> String {
        match self {
            FetchOutcome::Success { ssl_warning: false, .. } => "OK".to_string(),
            FetchOutcome::Success { ssl_warning: true, .. } => "OK (SSL Warning)".to_string(),
            FetchOutcome::Failed { reason } => reason.clone(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FetchOutcome::Failed { .. })
    }
}

/// Why a single URL attempt failed. The last one decides the final status text.
#[derive(Debug, Clone)]
enum AttemptError {
    Transport(String),
    HttpStatus(u16),
    HtmlBody,
}

impl AttemptError {
    fn into_status(self) -> String {
        match self {
            AttemptError::Transport(msg) => format!("Not accessible: {}", msg),
            AttemptError::HttpStatus(code) => format!("Not accessible: HTTP {}", code),
            AttemptError::HtmlBody => "Error: HTML Page instead of txt".to_string(),
        }
    }
}

/// Stateless fetcher for publisher declaration files
#[derive(Debug, Clone)]
pub struct Fetcher {
    config: HttpConfig,
}

impl Fetcher {
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Fetch `{scheme}://{domain}/{filename}`, trying https then http.
    ///
    /// Exactly two URL attempts are made, plus at most one certificate-bypass
    /// retry of the HTTPS attempt. Each attempt is preceded by a randomized
    /// jittered delay.
    pub async fn fetch(&self, domain: &str, filename: &str) -> FetchOutcome {
        let authority = normalize_domain(domain);
        let urls = [
            format!("https://{}/{}", authority, filename),
            format!("http://{}/{}", authority, filename),
        ];

        let client = match self.build_client(false) {
            Ok(client) => client,
            Err(e) => {
                return FetchOutcome::Failed {
                    reason: format!("Not accessible: {}", e),
                }
            }
        };

        let mut last_error = AttemptError::Transport("Unknown error".to_string());

        for url in &urls {
            self.jitter_delay().await;

            match self.attempt(&client, url).await {
                Ok(body) => {
                    debug!(url = %url, "fetched declaration file");
                    return FetchOutcome::Success { body, ssl_warning: false };
                }
                Err(AttemptError::Transport(msg)) if is_tls_failure(&msg) => {
                    warn!(url = %url, error = %msg, "TLS validation failed, retrying without certificate verification");
                    match self.insecure_retry(url).await {
                        Ok(body) => {
                            return FetchOutcome::Success { body, ssl_warning: true };
                        }
                        Err(e) => last_error = e,
                    }
                }
                Err(e) => {
                    debug!(url = %url, error = ?e, "attempt failed");
                    last_error = e;
                }
            }
        }

        FetchOutcome::Failed {
            reason: last_error.into_status(),
        }
    }

    /// One GET against one URL. Success requires HTTP 200 and a non-HTML body.
    async fn attempt(&self, client: &reqwest::Client, url: &str) -> Result<String, AttemptError> {
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| AttemptError::Transport(error_chain_text(&e)))?;

        let status = response.status();
        if status.as_u16() != 200 {
            return Err(AttemptError::HttpStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AttemptError::Transport(error_chain_text(&e)))?;

        if looks_like_html(&body) {
            return Err(AttemptError::HtmlBody);
        }

        Ok(body)
    }

    /// Single retry with certificate validation disabled, after a fixed delay
    async fn insecure_retry(&self, url: &str) -> Result<String, AttemptError> {
        sleep(Duration::from_millis(self.config.ssl_retry_delay_ms)).await;

        let client = self
            .build_client(true)
            .map_err(|e| AttemptError::Transport(e.to_string()))?;

        self.attempt(&client, url).await
    }

    fn build_client(&self, accept_invalid_certs: bool) -> reqwest::Result<reqwest::Client> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        reqwest::Client::builder()
            .user_agent(self.config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(self.config.request_timeout_secs))
            .redirect(redirect::Policy::limited(5))
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
    }

    /// Randomized pre-attempt delay to avoid triggering abuse detection
    async fn jitter_delay(&self) {
        if self.config.jitter_max_ms == 0 {
            return;
        }
        let millis =
            rand::thread_rng().gen_range(self.config.jitter_min_ms..=self.config.jitter_max_ms);
        sleep(Duration::from_millis(millis)).await;
    }
}

/// Strip any scheme prefix and path suffix, keeping only the authority
pub fn normalize_domain(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    without_scheme
        .split('/')
        .next()
        .unwrap_or(without_scheme)
        .to_string()
}

/// Case-insensitive check for an HTML document shell anywhere in the body
pub fn looks_like_html(body: &str) -> bool {
    let lower = body.to_lowercase();
    lower.contains("<!doctype html") || lower.contains("<html")
}

/// Collect the full source chain of a reqwest error into one message
fn error_chain_text(err: &reqwest::Error) -> String {
    let mut text = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        text.push_str(": ");
        text.push_str(&inner.to_string());
        source = inner.source();
    }
    text
}

/// Whether a transport error message indicates a TLS certificate problem
fn is_tls_failure(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("certificate")
        || lower.contains("tls")
        || lower.contains("ssl")
        || lower.contains("handshake")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_domain_strips_scheme_and_path() {
        assert_eq!(normalize_domain("https://example.com/ads.txt"), "example.com");
        assert_eq!(normalize_domain("http://example.com/some/path"), "example.com");
        assert_eq!(normalize_domain("example.com"), "example.com");
        assert_eq!(normalize_domain("  example.com/  "), "example.com");
        assert_eq!(normalize_domain("https://example.com:8443/x"), "example.com:8443");
    }

    #[test]
    fn test_looks_like_html() {
        assert!(looks_like_html("<!DOCTYPE HTML><head></head>"));
        assert!(looks_like_html("\n\n<html lang=\"en\">"));
        assert!(looks_like_html("prefix junk <HTML>"));
        assert!(!looks_like_html("google.com, pub-1234, DIRECT"));
        assert!(!looks_like_html(""));
    }

    #[test]
    fn test_is_tls_failure() {
        assert!(is_tls_failure("invalid peer certificate: UnknownIssuer"));
        assert!(is_tls_failure("error trying to connect: SSL routines"));
        assert!(!is_tls_failure("connection refused"));
        assert!(!is_tls_failure("operation timed out"));
    }

    #[test]
    fn test_status_labels() {
        let ok = FetchOutcome::Success { body: "x".into(), ssl_warning: false };
        assert_eq!(ok.status_label(), "OK");
        assert!(!ok.is_error());

        let warned = FetchOutcome::Success { body: "x".into(), ssl_warning: true };
        assert_eq!(warned.status_label(), "OK (SSL Warning)");

        let failed = FetchOutcome::Failed { reason: "Not accessible: HTTP 404".into() };
        assert_eq!(failed.status_label(), "Not accessible: HTTP 404");
        assert!(failed.is_error());
    }

    #[test]
    fn test_attempt_error_status_text() {
        assert_eq!(
            AttemptError::HttpStatus(404).into_status(),
            "Not accessible: HTTP 404"
        );
        assert_eq!(
            AttemptError::HtmlBody.into_status(),
            "Error: HTML Page instead of txt"
        );
        assert_eq!(
            AttemptError::Transport("connection refused".into()).into_status(),
            "Not accessible: connection refused"
        );
    }
}
