mod archiver;
mod config;
mod error;
mod fetcher;
mod filters;
mod image;
mod models;
mod parser;
mod prompt;
mod search;

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::ScraperConfig;
use crate::fetcher::{HeadlessRenderer, PageRenderer};
use crate::filters::FilterTable;
use crate::models::SearchRequest;
use crate::search::DigikalaScraper;

#[derive(Parser)]
#[command(name = "digikala-scraper")]
#[command(about = "Scrape and export Digikala.com product data")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the main image URL of a product page
    Image {
        /// Product page URL containing a dkp id
        url: String,
    },
    /// Scrape search results and export them as CSV
    Search(SearchArgs),
}

#[derive(Args)]
struct SearchArgs {
    /// Search subject; prompts interactively when omitted
    #[arg(short, long)]
    subject: Option<String>,

    /// Number of result pages to scrape (default 3)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pages: Option<u32>,

    /// Filter by name, e.g. `cheapest` (repeatable)
    #[arg(short, long = "filter")]
    filters: Vec<String>,

    /// Filter by 1-based menu index (repeatable)
    #[arg(long = "filter-index")]
    filter_indices: Vec<usize>,

    /// Print the filter menu and exit
    #[arg(long)]
    list_filters: bool,

    /// Directory the CSV is written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Render timeout in seconds
    #[arg(long, default_value = "50")]
    timeout: u64,

    /// Seconds to wait after page load before reading the page
    #[arg(long, default_value = "2")]
    settle: u64,

    /// Show the browser window
    #[arg(long)]
    headful: bool,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(
            std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(),
        ))
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Image { url } => {
            let config = ScraperConfig::default();
            let client = fetcher::build_client(&config)?;
            let image = image::resolve_image(&client, &config.api_root, &url)?;
            println!("{image}");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Search(args) => run_search(args),
    }
}

const DEFAULT_LOG: &str = "digikala_scraper=info";

/// `RUST_LOG` directives when set and valid, otherwise info for this crate.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG))
}

fn run_search(args: SearchArgs) -> Result<ExitCode> {
    let table = FilterTable::default();
    if args.list_filters {
        print!("{}", prompt::filter_menu(&table));
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = ScraperConfig::default();
    config.render_timeout = Duration::from_secs(args.timeout);
    config.settle_delay = Duration::from_secs(args.settle);
    config.headless = !args.headful;
    if let Some(dir) = args.output_dir.clone() {
        config.output_dir = dir;
    }

    let request = resolve_request(args, &table)?;
    let output_dir = config.output_dir.clone();
    let renderer = HeadlessRenderer::launch(&config)?;
    let scraper = DigikalaScraper::new(renderer, table, config)?;
    Ok(scrape_and_export(&scraper, &request, &output_dir)?.into())
}

/// Builds the request from flags, or from prompts when no subject was given.
/// Unknown filter names are rejected here, before any browser is launched.
fn resolve_request(args: SearchArgs, table: &FilterTable) -> Result<SearchRequest> {
    let request = match args.subject {
        Some(subject) => {
            let mut filters = args.filters;
            filters.extend(table.names_by_indices(&args.filter_indices));
            SearchRequest {
                subject,
                pages_limit: args.pages,
                filters,
            }
        }
        None => {
            println!(
                "\n\t\tDigikala.com Scraper: Scrape and export products data in few seconds easily\n"
            );
            prompt::read_request(&mut io::stdin().lock(), &mut io::stdout(), table)
                .context("failed to read search options")?
        }
    };
    table.query(&request.filters)?;
    Ok(request)
}

#[derive(Debug, PartialEq, Eq)]
enum SearchOutcome {
    NoResults,
    Exported(PathBuf),
}

impl From<SearchOutcome> for ExitCode {
    fn from(outcome: SearchOutcome) -> Self {
        match outcome {
            SearchOutcome::NoResults => ExitCode::FAILURE,
            SearchOutcome::Exported(_) => ExitCode::SUCCESS,
        }
    }
}

/// Runs the search and writes the CSV. Nothing is written when no product
/// was found.
fn scrape_and_export<R: PageRenderer>(
    scraper: &DigikalaScraper<R>,
    request: &SearchRequest,
    output_dir: &Path,
) -> Result<SearchOutcome> {
    let products = scraper.get_products(request)?;

    if products.is_empty() {
        println!("No results found. Please try again later.");
        return Ok(SearchOutcome::NoResults);
    }

    let path = archiver::export_products(&products, output_dir, &request.subject)?;
    println!("All done! Check the results in {}", path.display());
    Ok(SearchOutcome::Exported(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use crate::fetcher::testing::{FakeRenderer, tiles};

    fn request(pages: u32) -> SearchRequest {
        SearchRequest {
            subject: "mobile".into(),
            pages_limit: Some(pages),
            filters: vec![],
        }
    }

    #[test]
    fn rust_log_overrides_default_level() {
        assert_eq!(
            log_filter(Some("digikala_scraper=debug")).to_string(),
            "digikala_scraper=debug"
        );
        assert_eq!(log_filter(None).to_string(), DEFAULT_LOG);
        assert_eq!(log_filter(Some("  ")).to_string(), DEFAULT_LOG);
    }

    fn search_args(argv: &[&str]) -> SearchArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Search(args) => args,
            Commands::Image { .. } => panic!("expected search subcommand"),
        }
    }

    #[test]
    fn flags_build_request_with_named_and_indexed_filters() {
        let args = search_args(&[
            "digikala-scraper",
            "search",
            "--subject",
            "laptop",
            "--pages",
            "2",
            "--filter",
            "cheapest",
            "--filter-index",
            "1",
        ]);
        let request = resolve_request(args, &FilterTable::default()).unwrap();

        assert_eq!(request.subject, "laptop");
        assert_eq!(request.pages_limit, Some(2));
        assert_eq!(request.filters, vec!["cheapest", "only_digiplus"]);
    }

    #[test]
    fn unknown_filter_flag_is_rejected_while_resolving() {
        let args = search_args(&["digikala-scraper", "search", "-s", "x", "--filter", "bogus"]);
        let err = resolve_request(args, &FilterTable::default()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ScrapeError>(),
            Some(ScrapeError::UnknownFilter(name)) if name == "bogus"
        ));
    }

    #[test]
    fn zero_pages_flag_is_refused() {
        let argv = ["digikala-scraper", "search", "-s", "x", "--pages", "0"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn empty_search_exits_with_failure_and_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("raw_Data");
        let renderer = FakeRenderer::default();
        let scraper =
            DigikalaScraper::new(&renderer, FilterTable::default(), ScraperConfig::default())
                .unwrap();

        let outcome = scrape_and_export(&scraper, &request(2), &dir).unwrap();

        assert_eq!(outcome, SearchOutcome::NoResults);
        assert_eq!(renderer.seen.borrow().len(), 2);
        assert!(!dir.join("mobile.csv").exists());
    }

    #[test]
    fn found_products_are_exported() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("raw_Data");
        let mut renderer = FakeRenderer::default();
        renderer.pages.insert(1, tiles(&["dkp-1"]));
        let scraper =
            DigikalaScraper::new(&renderer, FilterTable::default(), ScraperConfig::default())
                .unwrap();

        let outcome = scrape_and_export(&scraper, &request(1), &dir).unwrap();

        assert_eq!(outcome, SearchOutcome::Exported(dir.join("mobile.csv")));
        assert!(dir.join("mobile.csv").is_file());
    }

    #[test]
    fn unknown_filter_stops_before_rendering() {
        let renderer = FakeRenderer::default();
        let scraper =
            DigikalaScraper::new(&renderer, FilterTable::default(), ScraperConfig::default())
                .unwrap();
        let mut req = request(1);
        req.filters.push("bogus".into());

        let err = scrape_and_export(&scraper, &req, Path::new("unused")).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ScrapeError>(),
            Some(ScrapeError::UnknownFilter(name)) if name == "bogus"
        ));
        assert!(renderer.seen.borrow().is_empty());
    }
}
