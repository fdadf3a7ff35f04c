// src/fetch/http.rs
// =============================================================================
// This module implements PageFetcher over reqwest's blocking client.
//
// Key settings (each worker thread gets its own HttpFetcher):
// - Connect timeout: 10s, total timeout: 20s - a worker can never be stuck
//   on one unresponsive host for longer than that
// - Follows up to 5 redirects, then gives up (redirect loop)
// - TLS certificate verification is ON (the default; we never turn it off)
// - Sends an identifying User-Agent so site operators know who we are
//
// Rust concepts:
// - Builder pattern: Client::builder() chains settings, then build()
// - From/Into conversions: mapping reqwest::Error into our FetchError
// =============================================================================

use std::time::Duration;

use anyhow::Result;
use reqwest::blocking::Client;

use super::{FetchError, FetchedPage, PageFetcher};

// How long we wait for a TCP connection to be established
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
// How long the whole request (connect + transfer) may take
const TOTAL_TIMEOUT: Duration = Duration::from_secs(20);
// How many redirect hops we follow before declaring a loop
const MAX_REDIRECTS: usize = 5;

const USER_AGENT: &str = concat!("webcrawl/", env!("CARGO_PKG_VERSION"));

// A blocking HTTP fetcher. One per worker thread - the client is created
// when the worker starts and dropped when its loop exits, however the loop
// ends.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(TOTAL_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self.client.get(url).send().map_err(categorize_error)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        // Reading the body can also fail mid-transfer (e.g. the total
        // timeout fires while streaming), so it goes through the same
        // categorization
        let body = response.text().map_err(categorize_error)?;

        Ok(FetchedPage {
            status,
            content_type,
            body,
        })
    }
}

// Sorts a reqwest error into our FetchError taxonomy.
//
// reqwest doesn't expose a precise error kind for everything, so for DNS
// and TLS we fall back to inspecting the error text - same approach the
// status checkers in this space use.
fn categorize_error(error: reqwest::Error) -> FetchError {
    let error_string = error.to_string();

    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_redirect() {
        FetchError::RedirectLoop
    } else if error.is_connect() {
        if error_string.contains("dns") {
            FetchError::Dns
        } else {
            FetchError::Connect
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        FetchError::Tls
    } else {
        FetchError::Other(error_string)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why the blocking client and not async?
//    - The engine runs a fixed pool of OS threads, each processing one URL
//      at a time; a thread that is waiting on the network has nothing else
//      it could be doing anyway
//    - The blocking client gives us exactly "this call returns when the
//      response (or the timeout) arrives", which is the contract the
//      worker loop is written against
//
// 2. What does concat!/env! do for USER_AGENT?
//    - env!("CARGO_PKG_VERSION") reads the version from Cargo.toml at
//      compile time, so the UA string never drifts from the crate version
// -----------------------------------------------------------------------------
