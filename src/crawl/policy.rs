// src/crawl/policy.rs
// =============================================================================
// This module defines the pre-fetch access policy: a collaborator the
// pipeline consults after claiming a URL and before fetching it.
//
// Today the only implementation allows everything - this crawler does not
// read robots.txt. The trait exists so that a robots-aware policy can be
// slotted in as a new pipeline step without touching the frontier, the
// registry, or the quiescence protocol.
// =============================================================================

use url::Url;

// Decides whether the crawler may fetch a URL.
//
// Implementations must be cheap and must not block on the network from
// inside allows() without their own timeout - a stalled policy stalls a
// worker the same way a stalled fetch would.
pub trait AccessPolicy: Send + Sync {
    fn allows(&self, url: &Url) -> bool;
}

// The default policy: fetch anything in scope.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

impl AccessPolicy for AllowAll {
    fn allows(&self, _url: &Url) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_all_allows() {
        let policy = AllowAll;
        let url = Url::parse("https://example.com/anything").unwrap();
        assert!(policy.allows(&url));
    }
}
