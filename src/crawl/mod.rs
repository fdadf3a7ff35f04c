// src/crawl/mod.rs
// =============================================================================
// This module is the concurrent crawl engine.
//
// Submodules, leaf-first:
// - frontier: blocking multi-producer/multi-consumer queue of pending URLs
// - visited:  thread-safe set with atomic insert-if-absent (the dedup gate)
// - resolver: pure href resolution + the domain scope filter
// - policy:   pre-fetch access policy collaborator (allow-all for now)
// - worker:   the per-thread fetch-parse-resolve-enqueue pipeline
// - session:  shared crawl state, pending-work counter, the coordinator
//
// This file (mod.rs) is the module root - it exports the public API the
// rest of the application uses: configure a crawl, run it, get a summary.
// =============================================================================

mod frontier;
mod policy;
mod resolver;
mod session;
mod visited;
mod worker;

// Re-export the public surface
// Callers write `crawl::crawl_site(...)` and never see the internals
pub use policy::{AccessPolicy, AllowAll};
pub use session::{crawl_site, CrawlConfig, CrawlSummary};
