// src/crawl/resolver.rs
// =============================================================================
// This module turns raw href values into crawlable absolute URLs, and
// decides which of those URLs belong to the site we are crawling.
//
// Two pieces:
// - resolve(): a pure function from (page URL, raw href) to an absolute
//   URL, or None for hrefs that aren't fetchable pages at all
// - Scope: the authority (scheme + host + port) of the seed URL; only links
//   inside the scope ever reach the frontier, which is what keeps the crawl
//   from wandering off across the whole internet
//
// resolve() owns nothing and shares nothing - it's the easiest part of the
// crawler to test exhaustively, so we do.
// =============================================================================

use url::Url;

// Resolves a possibly-relative href against the page it appeared on.
//
// Parameters:
//   base: the URL of the page the href was found on (NOT the seed URL -
//         relative links are relative to the page that contains them)
//   href: the raw attribute value, e.g. "/about", "page.html",
//         "//cdn.example.com/x", "https://other.com/x"
//
// Returns: Some(absolute_url) if this is something we could fetch,
//          None for anchors, javascript:, mailto:, and anything that
//          doesn't resolve to an http(s) URL.
//
// Rejections are expected and frequent - they are not errors, so the
// signature is Option, not Result.
pub fn resolve(base: &Url, href: &str) -> Option<Url> {
    // Not fetchable resources: script pseudo-links, email links, and
    // anything carrying a fragment (the page is the same resource with or
    // without its #section, so fragments would defeat deduplication)
    if href.starts_with("javascript:") || href.starts_with("mailto:") || href.contains('#') {
        return None;
    }

    // Url::join handles every remaining shape for us the way a browser
    // would: absolute URLs pass through, "//host/x" inherits the base
    // scheme, "/x" is root-relative, "x" is relative to the base's last
    // path segment
    let resolved = base.join(href).ok()?;

    // Only http(s) pages are crawlable (this also drops tel:, ftp:, data:
    // and friends that parse fine but aren't ours to fetch)
    match resolved.scheme() {
        "http" | "https" => Some(resolved),
        _ => None,
    }
}

// The crawl scope: the authority component of the seed URL.
//
// A discovered link is only enqueued when its scheme, host and effective
// port all match the seed's. "Effective" port means the default port counts
// as the explicit one - https://example.com and https://example.com:443 are
// the same authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl Scope {
    // Builds the scope from the seed URL.
    //
    // Returns None if the URL has no host (e.g. data: or file: URLs) -
    // such a URL can't anchor a crawl. The url crate has already
    // case-folded the scheme and host during parsing.
    pub fn from_seed(seed: &Url) -> Option<Self> {
        let host = seed.host_str()?;
        Some(Self {
            scheme: seed.scheme().to_string(),
            host: host.to_string(),
            port: seed.port_or_known_default(),
        })
    }

    // True iff the URL's authority equals the seed's authority.
    pub fn contains(&self, url: &Url) -> bool {
        url.scheme() == self.scheme
            && url.host_str() == Some(self.host.as_str())
            && url.port_or_known_default() == self.port
    }
}
