// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Run the crawl (all the interesting work lives in src/crawl/)
// 3. Print the final summary, as a table or as JSON
// 4. Exit with proper code (0 = crawl completed, 1 = bad arguments,
//    2 = unexpected internal error)
//
// Rust concepts used:
// - Result<T, E>: For error handling (T = success type, E = error type)
// - match: Pattern matching to route parse/validation outcomes
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;      // src/cli.rs - command-line parsing
mod crawl;    // src/crawl/ - the concurrent crawl engine
mod extract;  // src/extract/ - HTML link extraction
mod fetch;    // src/fetch/ - HTTP fetching

use clap::{CommandFactory, Parser};

// anyhow::Result is like std::result::Result but simpler for applications
// It lets us return any error type with the ? operator
use anyhow::Result;

use cli::Cli;
use crawl::{crawl_site, CrawlConfig, CrawlSummary};
use fetch::HttpFetcher;

fn main() {
    // Run our application logic and capture the exit code
    // std::process::exit() terminates the program with the given code
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = crawl ran to completion
//   Ok(1) = missing or invalid arguments (usage already printed)
//   Err = unexpected error (becomes exit code 2 in main)
fn run() -> Result<i32> {
    // Parse command-line arguments into our Cli struct
    // We use try_parse (not parse) so that argument problems become OUR
    // exit code 1 instead of clap's default process exit
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // clap's error already includes the usage text
            // --help and --version also land here; they're not failures
            if e.use_stderr() {
                eprint!("{}", e);
                return Ok(1);
            }
            print!("{}", e);
            return Ok(0);
        }
    };

    // Semantic validation: absolute http(s) URL, positive thread count
    if let Some(problem) = cli.validate() {
        eprintln!("Error: {}", problem);
        eprintln!();
        eprint!("{}", Cli::command().render_usage());
        eprintln!();
        return Ok(1);
    }

    println!("🕷️  Crawling {} with {} worker thread(s)", cli.start_url, cli.num_threads);
    println!();

    let config = CrawlConfig {
        start_url: cli.start_url.clone(),
        num_threads: cli.num_threads,
    };

    // Each worker gets its own HTTP client; the factory runs once per worker
    let summary = crawl_site(&config, HttpFetcher::new)?;

    print_summary(&summary, cli.json)?;

    Ok(0)
}

// Prints the final summary either as a table or JSON
fn print_summary(summary: &CrawlSummary, json: bool) -> Result<()> {
    if json {
        // Serialize the summary to JSON and print
        let json_output = serde_json::to_string_pretty(summary)?;
        println!("{}", json_output);
    } else {
        print_table(summary);
    }
    Ok(())
}

// Prints the summary as a human-readable block in the terminal
fn print_table(summary: &CrawlSummary) {
    println!();
    println!("📊 Crawl finished:");
    println!("   📋 Unique pages visited: {}", summary.pages_visited);
    println!("   ✅ Fetched and parsed:   {}", summary.pages_ok);
    println!("   ⚠️  Fetch failures:       {}", summary.fetch_failures);
    println!("   🚫 Non-2xx responses:    {}", summary.non_success);
    println!("   📎 Non-HTML responses:   {}", summary.non_html);
    println!("   🔁 Duplicates skipped:   {}", summary.duplicates_skipped);
    println!(
        "   🔗 Links: {} found, {} in scope, {} outside scope",
        summary.links_found, summary.links_enqueued, summary.links_out_of_scope
    );
}
