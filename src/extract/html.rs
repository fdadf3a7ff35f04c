// src/extract/html.rs
// =============================================================================
// This module extracts raw href values from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// html5ever is error-tolerant the way browsers are: it never refuses to
// parse, it just builds the best tree it can. That means extraction can't
// fail - garbage input simply yields few or no links.
// =============================================================================

use scraper::{Html, Selector};

// Extracts every anchor href from an HTML document, in document order.
//
// Parameters:
//   html: the HTML content to parse (borrowed as &str)
//
// Returns: the raw href attribute values, untouched - possibly relative,
// possibly junk. The caller resolves and filters them.
//
// Example:
//   html = "<a href='/docs'>Docs</a><a href='page.html'>Next</a>"
//   result = ["/docs", "page.html"]
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    // Selector::parse returns Result, so we use .unwrap() which panics on
    // error. This is OK here because our selector is a constant and known
    // to be valid.
    let selector = Selector::parse("a[href]").unwrap();

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| !href.is_empty())
        .map(|href| href.to_string())
        .collect()
}
