// src/extract/mod.rs
// =============================================================================
// This module contains link extraction logic.
//
// Submodules:
// - html: pulls raw href values out of HTML documents
//
// Extraction is deliberately dumb: it returns the href strings exactly as
// they appear in the document, in document order. Resolving them against
// the page URL and filtering them by scope is the pipeline's job
// (src/crawl/worker.rs) - keeping those concerns apart is what makes both
// halves easy to test.
// =============================================================================

mod html;

pub use html::extract_hrefs;
