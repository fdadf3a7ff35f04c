// src/fetch/mod.rs
// =============================================================================
// This module contains the HTTP fetching logic.
//
// Submodules:
// - http: the real fetcher built on reqwest's blocking client
//
// This file (mod.rs) is the module root - it defines the PageFetcher trait
// that the worker pipeline talks to, the FetchedPage it gets back, and the
// FetchError taxonomy for everything that can go wrong on the wire.
//
// Why a trait?
// - The crawl engine doesn't care HOW a page is fetched, only that it gets
//   a status, a content type and a body (or a categorized failure)
// - Tests swap in a mock fetcher and exercise the whole engine without
//   touching the network
// =============================================================================

mod http;

pub use http::HttpFetcher;

use std::fmt;

// What a successful GET gives us back: enough to classify the response and
// (if it's HTML) parse it. "Successful" here means the transport worked -
// a 404 is still a FetchedPage, not a FetchError.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// HTTP status code, e.g. 200
    pub status: u16,
    /// Value of the Content-Type header, if the server sent one
    pub content_type: Option<String>,
    /// Response body (only meaningful for 2xx HTML responses)
    pub body: String,
}

impl FetchedPage {
    /// True for any 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True if the server declared the body to be HTML
    ///
    /// Content-Type values look like "text/html; charset=utf-8", so we
    /// check for the substring rather than an exact match.
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.contains("text/html"))
            .unwrap_or(false)
    }
}

// Transport-level failures, categorized the same way we'd want to report
// them. None of these ever escape the worker processing the URL - they are
// logged, counted, and the pipeline moves on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connect or total-transfer timeout elapsed
    Timeout,
    /// Could not resolve the hostname
    Dns,
    /// TCP connection failed (refused, unreachable, ...)
    Connect,
    /// TLS handshake or certificate verification failed
    Tls,
    /// Redirect limit exceeded (redirect loop)
    RedirectLoop,
    /// Anything else, with the underlying error text
    Other(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Timeout => write!(f, "request timed out"),
            FetchError::Dns => write!(f, "could not resolve hostname"),
            FetchError::Connect => write!(f, "connection failed"),
            FetchError::Tls => write!(f, "TLS certificate error"),
            FetchError::RedirectLoop => write!(f, "too many redirects"),
            FetchError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

// The seam between the crawl engine and HTTP.
//
// One fetcher instance belongs to one worker thread (each worker gets its
// own client handle and read buffers), so implementations only need &self
// with interior ownership, and Send so the handle can move into the worker.
pub trait PageFetcher: Send {
    fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_success_bounds() {
        let mut page = FetchedPage {
            status: 200,
            content_type: None,
            body: String::new(),
        };
        assert!(page.is_success());

        page.status = 299;
        assert!(page.is_success());

        page.status = 301;
        assert!(!page.is_success());

        page.status = 404;
        assert!(!page.is_success());
    }

    #[test]
    fn test_is_html_checks_substring() {
        let page = FetchedPage {
            status: 200,
            content_type: Some("text/html; charset=utf-8".to_string()),
            body: String::new(),
        };
        assert!(page.is_html());

        let json = FetchedPage {
            status: 200,
            content_type: Some("application/json".to_string()),
            body: String::new(),
        };
        assert!(!json.is_html());

        let missing = FetchedPage {
            status: 200,
            content_type: None,
            body: String::new(),
        };
        assert!(!missing.is_html());
    }
}
