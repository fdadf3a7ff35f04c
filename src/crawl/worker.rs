// src/crawl/worker.rs
// =============================================================================
// This module is the per-worker pipeline: the loop each pool thread runs
// and the state machine one URL goes through inside it.
//
// Per iteration:
//   pop -> claim -> policy check -> fetch -> status check -> content-type
//   check -> extract -> resolve -> scope filter -> enqueue
//
// Two rules hold the whole engine together:
// - A URL is processed only by the worker whose claim() returned true
// - EVERY popped URL completes exactly one pending-work unit, whatever
//   happens to it - the loop calls session.unit_done() on every path, so
//   no outcome can leak a unit and stall (or prematurely end) the crawl
//
// Failures are contained here. A timeout, a 500, a PDF, a page of broken
// markup: each is just an outcome for that one URL. Nothing a page does
// can take down the worker or corrupt shared state.
// =============================================================================

use url::Url;

use crate::extract::extract_hrefs;
use crate::fetch::{FetchError, PageFetcher};

use super::resolver::resolve;
use super::session::{CrawlSession, CrawlStats};

// Terminal states for one URL's trip through the pipeline
#[derive(Debug)]
pub(crate) enum PageOutcome {
    /// Another worker claimed this URL first
    Skipped,
    /// The access policy refused the fetch
    Denied,
    /// The frontier entry didn't parse as a URL (shouldn't happen - only
    /// normalized URLs are enqueued - but we'd rather count it than panic)
    Invalid,
    /// Transport-level failure
    FetchFailed(FetchError),
    /// Response arrived with a non-2xx status
    NonSuccess(u16),
    /// 2xx response that isn't HTML; nothing to parse
    NotHtml,
    /// Fetched, parsed, links resolved and filtered
    Done {
        links_found: usize,
        links_enqueued: usize,
    },
}

// The worker loop. Runs until the frontier reports "stopped and empty".
//
// The fetcher is moved in at loop entry and dropped when the function
// returns - normal stop or panic, the handle is released with the loop.
pub(crate) fn run<P: PageFetcher>(session: &CrawlSession, fetcher: P) {
    while let Some(url) = session.frontier.pop() {
        let outcome = process(session, &fetcher, &url);
        record(session, &url, &outcome);
        // The one and only completion for this popped URL
        session.unit_done();
    }
}

// Takes one URL through the state machine and returns its terminal state.
// Infallible by design: every failure mode is an outcome, not an error.
fn process<P: PageFetcher>(session: &CrawlSession, fetcher: &P, url: &str) -> PageOutcome {
    // Dedup gate: exactly one worker ever gets true for a given URL
    if !session.visited.claim(url) {
        return PageOutcome::Skipped;
    }

    // The frontier only ever holds URLs serialized from parsed ones, so
    // this re-parse is a formality - but the page URL is also our base for
    // resolving relative links, so we need the parsed form anyway
    let page_url = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return PageOutcome::Invalid,
    };

    if !session.policy.allows(&page_url) {
        return PageOutcome::Denied;
    }

    let page = match fetcher.fetch(url) {
        Ok(page) => page,
        Err(e) => return PageOutcome::FetchFailed(e),
    };

    if !page.is_success() {
        return PageOutcome::NonSuccess(page.status);
    }

    if !page.is_html() {
        return PageOutcome::NotHtml;
    }

    // Extraction can't fail (html5ever repairs what it can); hrefs come
    // back raw and in document order
    let hrefs = extract_hrefs(&page.body);
    let links_found = hrefs.len();
    let mut links_enqueued = 0;

    for href in &hrefs {
        // Resolve against THIS page, not the seed - relative links are
        // relative to the page they appear on
        let resolved = match resolve(&page_url, href) {
            Some(resolved) => resolved,
            // Anchors, mailto:, javascript: - expected, silent
            None => continue,
        };

        if session.scope.contains(&resolved) {
            session.enqueue(resolved.to_string());
            links_enqueued += 1;
        } else {
            CrawlStats::bump(&session.stats.links_out_of_scope);
        }
    }

    PageOutcome::Done {
        links_found,
        links_enqueued,
    }
}

// Updates the stats counters and prints the user-facing progress line
// for one finished URL.
fn record(session: &CrawlSession, url: &str, outcome: &PageOutcome) {
    let stats = &session.stats;
    match outcome {
        PageOutcome::Skipped => {
            CrawlStats::bump(&stats.duplicates_skipped);
        }
        PageOutcome::Denied => {
            CrawlStats::bump(&stats.denied);
        }
        PageOutcome::Invalid => {
            eprintln!("  Warning: Unparseable URL in frontier: {}", url);
            CrawlStats::bump(&stats.fetch_failures);
        }
        PageOutcome::FetchFailed(e) => {
            eprintln!("  Warning: Failed to fetch {}: {}", url, e);
            CrawlStats::bump(&stats.fetch_failures);
        }
        PageOutcome::NonSuccess(status) => {
            eprintln!("  Warning: HTTP {} for {}", status, url);
            CrawlStats::bump(&stats.non_success);
        }
        PageOutcome::NotHtml => {
            CrawlStats::bump(&stats.non_html);
        }
        PageOutcome::Done {
            links_found,
            links_enqueued,
        } => {
            println!(
                "  Crawled: {} ({} links, {} in scope, {} visited so far)",
                url,
                links_found,
                links_enqueued,
                session.visited.len()
            );
            CrawlStats::bump(&stats.pages_ok);
            CrawlStats::bump_by(&stats.links_found, *links_found);
            CrawlStats::bump_by(&stats.links_enqueued, *links_enqueued);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::policy::AccessPolicy;
    use crate::crawl::resolver::Scope;
    use crate::fetch::FetchedPage;

    // Minimal fetcher: every URL returns the same canned response
    struct OneResponse(Result<FetchedPage, FetchError>);

    impl PageFetcher for OneResponse {
        fn fetch(&self, _url: &str) -> Result<FetchedPage, FetchError> {
            self.0.clone()
        }
    }

    struct DenyAll;

    impl AccessPolicy for DenyAll {
        fn allows(&self, _url: &Url) -> bool {
            false
        }
    }

    fn session_for(seed: &str) -> CrawlSession {
        let url = Url::parse(seed).unwrap();
        CrawlSession::for_tests(Scope::from_seed(&url).unwrap())
    }

    fn ok_html(body: &str) -> Result<FetchedPage, FetchError> {
        Ok(FetchedPage {
            status: 200,
            content_type: Some("text/html".to_string()),
            body: body.to_string(),
        })
    }

    #[test]
    fn test_duplicate_claim_is_skipped() {
        let session = session_for("https://site.test/");
        let fetcher = OneResponse(ok_html(""));

        session.visited.claim("https://site.test/dup");
        let outcome = process(&session, &fetcher, "https://site.test/dup");
        assert!(matches!(outcome, PageOutcome::Skipped));
    }

    #[test]
    fn test_done_enqueues_only_in_scope_links() {
        let session = session_for("https://site.test/");
        let fetcher = OneResponse(ok_html(
            r##"<a href="/in">in</a>
               <a href="https://elsewhere.test/out">out</a>
               <a href="#frag">frag</a>"##,
        ));

        let outcome = process(&session, &fetcher, "https://site.test/");
        match outcome {
            PageOutcome::Done {
                links_found,
                links_enqueued,
            } => {
                assert_eq!(links_found, 3);
                assert_eq!(links_enqueued, 1);
            }
            other => panic!("expected Done, got {:?}", other),
        }
        assert_eq!(
            session.frontier.pop(),
            Some("https://site.test/in".to_string())
        );
    }

    #[test]
    fn test_relative_links_resolve_against_current_page() {
        let session = session_for("https://site.test/");
        let fetcher = OneResponse(ok_html(r#"<a href="sibling.html">s</a>"#));

        // The page lives under /docs/, so its relative link must too
        process(&session, &fetcher, "https://site.test/docs/index.html");
        assert_eq!(
            session.frontier.pop(),
            Some("https://site.test/docs/sibling.html".to_string())
        );
    }

    #[test]
    fn test_fetch_failure_outcome() {
        let session = session_for("https://site.test/");
        let fetcher = OneResponse(Err(FetchError::Timeout));

        let outcome = process(&session, &fetcher, "https://site.test/slow");
        assert!(matches!(
            outcome,
            PageOutcome::FetchFailed(FetchError::Timeout)
        ));
        // Claimed and attempted: the URL stays in the registry
        assert!(!session.visited.claim("https://site.test/slow"));
    }

    #[test]
    fn test_non_success_outcome() {
        let session = session_for("https://site.test/");
        let fetcher = OneResponse(Ok(FetchedPage {
            status: 404,
            content_type: Some("text/html".to_string()),
            body: r#"<a href="/never">x</a>"#.to_string(),
        }));

        let outcome = process(&session, &fetcher, "https://site.test/gone");
        assert!(matches!(outcome, PageOutcome::NonSuccess(404)));
        // Non-2xx bodies are never parsed
        assert!(session.frontier.is_empty());
    }

    #[test]
    fn test_not_html_outcome() {
        let session = session_for("https://site.test/");
        let fetcher = OneResponse(Ok(FetchedPage {
            status: 200,
            content_type: Some("application/json".to_string()),
            body: r#"<a href="/never">x</a>"#.to_string(),
        }));

        let outcome = process(&session, &fetcher, "https://site.test/api");
        assert!(matches!(outcome, PageOutcome::NotHtml));
        assert!(session.frontier.is_empty());
    }

    #[test]
    fn test_denied_by_policy() {
        let url = Url::parse("https://site.test/").unwrap();
        let session =
            CrawlSession::for_tests_with_policy(Scope::from_seed(&url).unwrap(), Box::new(DenyAll));
        let fetcher = OneResponse(ok_html(""));

        let outcome = process(&session, &fetcher, "https://site.test/forbidden");
        assert!(matches!(outcome, PageOutcome::Denied));
    }
}
