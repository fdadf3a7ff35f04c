// src/crawl/visited.rs
// =============================================================================
// This module implements the visited registry: the set of URLs that have
// already been claimed for processing.
//
// The one operation that matters is claim(): "insert this URL if nobody has
// before, and tell me whether I was the one who inserted it". That
// test-and-insert has to happen in a single critical section - if it were
// two separate calls (contains? then insert), two workers could both see
// "not present" and both fetch the same page.
//
// Entries are never removed: once a URL is claimed it stays claimed for the
// lifetime of the crawl. The registry is the single source of truth for
// "has this page already been scheduled".
// =============================================================================

use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    // Atomically tests membership and inserts if absent.
    //
    // Returns true iff THIS call performed the insertion - the caller whose
    // claim() returned true owns the URL and is the only one allowed to
    // fetch it. Everyone else gets false and moves on.
    //
    // HashSet::insert already has exactly these semantics; holding the lock
    // across the call is what makes it atomic between threads.
    pub fn claim(&self, url: &str) -> bool {
        self.urls.lock().unwrap().insert(url.to_string())
    }

    // Point-in-time count of claimed URLs, for progress reporting and the
    // final summary.
    pub fn len(&self) -> usize {
        self.urls.lock().unwrap().len()
    }

    // Sorted copy of every claimed URL, taken once at the end of the crawl
    // for the summary output.
    pub fn snapshot(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.urls.lock().unwrap().iter().cloned().collect();
        urls.sort();
        urls
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does claim() take &str but store String?
//    - Callers usually still need their URL after claiming it
//    - Borrowing in and cloning once inside keeps the API friendly
//
// 2. Could we use a fancier concurrent set (e.g. a sharded map)?
//    - Yes, and under heavy contention it would scale better
//    - But the critical section here is tiny (one hash + one insert), and
//      a Mutex<HashSet> is the simplest thing that is obviously correct
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_first_claim_wins() {
        let visited = VisitedSet::new();
        assert!(visited.claim("https://example.com/"));
        assert!(!visited.claim("https://example.com/"));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_distinct_urls_are_independent() {
        let visited = VisitedSet::new();
        assert!(visited.claim("https://example.com/a"));
        assert!(visited.claim("https://example.com/b"));
        assert_eq!(visited.len(), 2);
    }

    #[test]
    fn test_exactly_one_concurrent_claim_succeeds() {
        let visited = Arc::new(VisitedSet::new());

        // Eight threads all try to claim the same URL at the same moment
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let visited = visited.clone();
                thread::spawn(move || visited.claim("https://example.com/contested"))
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|claimed| *claimed)
            .count();

        // Exactly one claim call may return true, no matter the interleaving
        assert_eq!(winners, 1);
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_snapshot_is_sorted() {
        let visited = VisitedSet::new();
        visited.claim("https://example.com/c");
        visited.claim("https://example.com/a");
        visited.claim("https://example.com/b");

        assert_eq!(
            visited.snapshot(),
            vec![
                "https://example.com/a".to_string(),
                "https://example.com/b".to_string(),
                "https://example.com/c".to_string(),
            ]
        );
    }
}
