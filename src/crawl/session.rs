// src/crawl/session.rs
// =============================================================================
// This module owns the crawl session: the shared state every worker sees,
// the pending-work counter that decides when the crawl is over, and the
// coordinator that seeds the frontier, launches the pool, waits for
// quiescence and joins the workers.
//
// Termination is the subtle part. Checking "queue empty AND nobody busy"
// as two separate reads is racy: a worker can be between popping a URL and
// starting to fetch it at the exact moment you look, and the crawl would
// stop with work still in flight. Instead we keep ONE balanced counter:
//
//   +1 every time a URL is pushed onto the frontier (the seed included)
//   -1 exactly once when a popped URL's processing fully completes
//     (skipped as a duplicate, failed, or fully parsed - every exit path)
//
// Because every push is eventually matched by exactly one completion, the
// counter reaches zero precisely when no URL is queued and no worker is
// mid-pipeline. That single transition is the termination signal.
// =============================================================================

use std::sync::{Condvar, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use url::Url;

use crate::fetch::PageFetcher;

use super::frontier::Frontier;
use super::policy::{AccessPolicy, AllowAll};
use super::resolver::Scope;
use super::visited::VisitedSet;
use super::worker;

// How often the coordinator wakes up to print a progress line while it
// waits for quiescence. Purely cosmetic - termination is decided by the
// counter, never by this timer.
const PROGRESS_INTERVAL: Duration = Duration::from_secs(2);

// Settings for one crawl run
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// The absolute URL to start from; its authority becomes the scope
    pub start_url: String,
    /// Number of worker threads in the pool
    pub num_threads: usize,
}

// The balanced pending-work counter plus the condvar the coordinator
// sleeps on. A plain atomic wouldn't be enough on its own: the coordinator
// needs to SLEEP until the count hits zero, and waking it requires the
// same lock/condvar pairing the frontier uses.
#[derive(Debug, Default)]
struct PendingWork {
    count: Mutex<usize>,
    drained: Condvar,
}

impl PendingWork {
    // One more URL entered the system (pushed onto the frontier)
    fn add(&self) {
        *self.count.lock().unwrap() += 1;
    }

    // One popped URL finished its whole lifecycle. The completion that
    // drops the count to zero wakes the coordinator.
    fn complete(&self) {
        let mut count = self.count.lock().unwrap();
        debug_assert!(*count > 0, "pending-work counter would go negative");
        *count -= 1;
        if *count == 0 {
            self.drained.notify_all();
        }
    }

    // Point-in-time count, for progress reporting
    fn current(&self) -> usize {
        *self.count.lock().unwrap()
    }

    // Blocks until the count is zero, waking periodically so the caller
    // can report progress. Returns only at genuine quiescence.
    fn wait_drained<F: FnMut()>(&self, mut on_tick: F) {
        let mut count = self.count.lock().unwrap();
        while *count > 0 {
            let (guard, timed_out) = self
                .drained
                .wait_timeout(count, PROGRESS_INTERVAL)
                .unwrap();
            count = guard;
            if timed_out.timed_out() && *count > 0 {
                // Drop the lock while printing so workers aren't held up
                drop(count);
                on_tick();
                count = self.count.lock().unwrap();
            }
        }
    }
}

// Counters for the final summary. Plain atomics: each is independent and
// only ever read for reporting, so relaxed ordering is fine.
#[derive(Debug, Default)]
pub struct CrawlStats {
    pub pages_ok: AtomicUsize,
    pub fetch_failures: AtomicUsize,
    pub non_success: AtomicUsize,
    pub non_html: AtomicUsize,
    pub denied: AtomicUsize,
    pub duplicates_skipped: AtomicUsize,
    pub links_found: AtomicUsize,
    pub links_enqueued: AtomicUsize,
    pub links_out_of_scope: AtomicUsize,
}

impl CrawlStats {
    pub fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn bump_by(counter: &AtomicUsize, n: usize) {
        counter.fetch_add(n, Ordering::Relaxed);
    }
}

// Everything the workers share. Created by the coordinator at crawl start,
// borrowed by every worker thread, torn down after the pool joins. The
// frontier and the registry each guard only their own state; no operation
// ever holds two of these locks at once.
pub struct CrawlSession {
    pub(crate) frontier: Frontier,
    pub(crate) visited: VisitedSet,
    pub(crate) scope: Scope,
    pub(crate) stats: CrawlStats,
    pub(crate) policy: Box<dyn AccessPolicy>,
    pending: PendingWork,
}

impl CrawlSession {
    fn new(scope: Scope, policy: Box<dyn AccessPolicy>) -> Self {
        Self {
            frontier: Frontier::new(),
            visited: VisitedSet::new(),
            scope,
            stats: CrawlStats::default(),
            policy,
            pending: PendingWork::default(),
        }
    }

    // The only way URLs enter the frontier: counter first, then push, so
    // the pending count can never under-represent queued work.
    pub(crate) fn enqueue(&self, url: String) {
        self.pending.add();
        self.frontier.push(url);
    }

    // Called exactly once per popped URL, after its processing fully
    // completes - on EVERY exit path (duplicate skip, any failure, or
    // success). The worker loop owns this call so the pipeline can't
    // forget a path.
    pub(crate) fn unit_done(&self) {
        self.pending.complete();
    }
}

// Constructors for unit tests elsewhere in the crate (the pipeline tests
// drive process() against a bare session without running the coordinator)
#[cfg(test)]
impl CrawlSession {
    pub(crate) fn for_tests(scope: Scope) -> Self {
        Self::new(scope, Box::new(AllowAll))
    }

    pub(crate) fn for_tests_with_policy(scope: Scope, policy: Box<dyn AccessPolicy>) -> Self {
        Self::new(scope, policy)
    }
}

// What a finished crawl reports. Serializable for --json output.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlSummary {
    /// Unique pages claimed for processing (the headline number)
    pub pages_visited: usize,
    /// Pages fetched, 2xx, HTML, and parsed
    pub pages_ok: usize,
    /// Transport failures (DNS, connect, TLS, timeout)
    pub fetch_failures: usize,
    /// Responses with a non-2xx status
    pub non_success: usize,
    /// 2xx responses that weren't HTML
    pub non_html: usize,
    /// Fetches refused by the access policy
    pub denied: usize,
    /// Queue entries dropped because another worker claimed them first
    pub duplicates_skipped: usize,
    /// Raw hrefs seen across all parsed pages
    pub links_found: usize,
    /// Links that passed resolution + scope and were enqueued
    pub links_enqueued: usize,
    /// Resolved links rejected for pointing outside the scope
    pub links_out_of_scope: usize,
    /// Every claimed URL, sorted
    pub visited: Vec<String>,
}

// Runs a complete crawl: validates the seed, builds the session, launches
// the worker pool, waits for quiescence, stops the frontier and joins.
//
// The fetcher factory is called once per worker BEFORE any thread starts,
// so a client that can't even be constructed fails the whole run up front
// instead of silently shrinking the pool.
//
// Generic over the fetcher so tests can drive the entire engine with a
// mock and never touch the network.
pub fn crawl_site<P, F>(config: &CrawlConfig, make_fetcher: F) -> Result<CrawlSummary>
where
    P: PageFetcher,
    F: Fn() -> Result<P>,
{
    let seed = parse_seed(&config.start_url)?;
    let scope = Scope::from_seed(&seed)
        .ok_or_else(|| anyhow!("URL has no host: {}", config.start_url))?;

    if config.num_threads == 0 {
        bail!("number of threads must be at least 1");
    }

    // One private fetcher per worker (no sharing of per-request resources)
    let fetchers: Vec<P> = (0..config.num_threads)
        .map(|_| make_fetcher())
        .collect::<Result<_>>()
        .context("failed to create HTTP client")?;

    let session = CrawlSession::new(scope, Box::new(AllowAll));

    // Seed the frontier; this is the +1 everything else balances against
    session.enqueue(seed.to_string());

    // Scoped threads let workers borrow the session directly - the
    // borrow checker proves the session outlives the whole pool
    thread::scope(|scope| {
        for (id, fetcher) in fetchers.into_iter().enumerate() {
            thread::Builder::new()
                .name(format!("crawl-worker-{}", id))
                .spawn_scoped(scope, || worker::run(&session, fetcher))
                .expect("failed to spawn worker thread");
        }

        // Block until the pending-work counter drains, reporting as we go
        session.pending.wait_drained(|| {
            println!(
                "⏳ Progress: {} visited, {} in flight or queued ({} queued)",
                session.visited.len(),
                session.pending.current(),
                session.frontier.len()
            );
        });

        // No URL is queued and no worker is mid-pipeline: wake everyone up
        // and let them exit. The scope joins every worker on the way out.
        session.frontier.request_stop();
    });

    let stats = &session.stats;
    Ok(CrawlSummary {
        pages_visited: session.visited.len(),
        pages_ok: stats.pages_ok.load(Ordering::Relaxed),
        fetch_failures: stats.fetch_failures.load(Ordering::Relaxed),
        non_success: stats.non_success.load(Ordering::Relaxed),
        non_html: stats.non_html.load(Ordering::Relaxed),
        denied: stats.denied.load(Ordering::Relaxed),
        duplicates_skipped: stats.duplicates_skipped.load(Ordering::Relaxed),
        links_found: stats.links_found.load(Ordering::Relaxed),
        links_enqueued: stats.links_enqueued.load(Ordering::Relaxed),
        links_out_of_scope: stats.links_out_of_scope.load(Ordering::Relaxed),
        visited: session.visited.snapshot(),
    })
}

// Validates the seed: must parse, must be http(s), must be absolute.
fn parse_seed(start_url: &str) -> Result<Url> {
    let seed = Url::parse(start_url)
        .map_err(|e| anyhow!("Invalid URL '{}': {}", start_url, e))?;

    if seed.scheme() != "http" && seed.scheme() != "https" {
        bail!(
            "start URL must be http:// or https://, got '{}'",
            seed.scheme()
        );
    }

    Ok(seed)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is thread::scope?
//    - Scoped threads (std since 1.63) may borrow local variables because
//      the scope guarantees every thread is joined before it returns
//    - Without it we'd need Arc around the session and 'static bounds on
//      everything the workers touch
//
// 2. Why seed BEFORE spawning?
//    - The counter must be nonzero before the coordinator starts waiting,
//      otherwise an empty frontier would look like instant quiescence
//
// 3. Why is request_stop() inside the scope?
//    - The scope joins all workers when it ends; if we waited for that
//      before stopping the frontier, workers blocked in pop() would never
//      wake and the join would deadlock
// -----------------------------------------------------------------------------
