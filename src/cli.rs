// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// The surface is deliberately tiny:
//
//   crawl <start-url> [num-threads] [--json]
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Validation beyond "it parsed" (is the URL absolute? are the threads
// nonzero?) lives in validate() so main.rs can turn every argument problem
// into the same usage-message-plus-exit-1 behavior.
// =============================================================================

use clap::Parser;
use url::Url;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "crawl",
    version,
    about = "Crawl a website breadth-first and count every unique page",
    long_about = "crawl visits every page reachable from the start URL that lives on the \
                  same scheme://host[:port], following links breadth-first with a pool of \
                  worker threads, and prints a summary of what it found."
)]
pub struct Cli {
    /// The absolute URL to start crawling from (e.g. https://example.com)
    ///
    /// Its scheme + host + port become the crawl scope: links leading
    /// anywhere else are discovered but never fetched.
    pub start_url: String,

    /// Number of worker threads (positive integer)
    ///
    /// This is an optional positional argument with a default, matching
    /// the `crawl <start-url> [num-threads]` surface.
    #[arg(default_value_t = 4)]
    pub num_threads: usize,

    /// Output the final summary in JSON format instead of a table
    ///
    /// This is an optional flag: --json
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    // Checks the semantic constraints clap can't express for us.
    //
    // Returns a human-readable complaint, or None if the arguments are
    // usable. main.rs treats Some(..) exactly like a parse failure:
    // message + usage + exit code 1.
    pub fn validate(&self) -> Option<String> {
        if self.num_threads == 0 {
            return Some("num-threads must be at least 1".to_string());
        }

        match Url::parse(&self.start_url) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    return Some(format!(
                        "start-url must be an http:// or https:// URL, got '{}'",
                        self.start_url
                    ));
                }
                if url.host_str().is_none() {
                    return Some(format!("start-url has no host: '{}'", self.start_url));
                }
                None
            }
            // Relative references fail Url::parse, so "must be absolute"
            // is covered here too
            Err(e) => Some(format!("invalid start-url '{}': {}", self.start_url, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["crawl", "https://example.com"]);
        assert_eq!(cli.start_url, "https://example.com");
        assert_eq!(cli.num_threads, 4);
        assert!(!cli.json);
        assert!(cli.validate().is_none());
    }

    #[test]
    fn test_explicit_thread_count() {
        let cli = Cli::parse_from(["crawl", "https://example.com", "8"]);
        assert_eq!(cli.num_threads, 8);
        assert!(cli.validate().is_none());
    }

    #[test]
    fn test_json_flag() {
        let cli = Cli::parse_from(["crawl", "https://example.com", "--json"]);
        assert!(cli.json);
    }

    #[test]
    fn test_missing_url_is_a_parse_error() {
        assert!(Cli::try_parse_from(["crawl"]).is_err());
    }

    #[test]
    fn test_relative_url_rejected() {
        let cli = Cli::parse_from(["crawl", "/just/a/path"]);
        assert!(cli.validate().is_some());
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let cli = Cli::parse_from(["crawl", "ftp://example.com"]);
        assert!(cli.validate().is_some());
    }

    #[test]
    fn test_zero_threads_rejected() {
        let cli = Cli::parse_from(["crawl", "https://example.com", "0"]);
        assert!(cli.validate().is_some());
    }

    #[test]
    fn test_non_numeric_threads_is_a_parse_error() {
        assert!(Cli::try_parse_from(["crawl", "https://example.com", "lots"]).is_err());
    }
}
