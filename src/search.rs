//! Multi-page search scraping.

use scraper::Html;
use tracing::info;

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::fetcher::PageRenderer;
use crate::filters::FilterTable;
use crate::models::{Product, SearchRequest};
use crate::parser::TileExtractors;

pub struct DigikalaScraper<R> {
    renderer: R,
    filters: FilterTable,
    extractors: TileExtractors,
    config: ScraperConfig,
}

/// `{origin}/search/{subject}/?page=1..=pages&force_search_instead=1[&filters]`
pub fn page_urls(origin: &str, subject: &str, pages: u32, filter_query: &str) -> Vec<String> {
    (1..=pages)
        .map(|page| {
            let url = format!("{origin}/search/{subject}/?page={page}&force_search_instead=1");
            if filter_query.is_empty() {
                url
            } else {
                format!("{url}&{filter_query}")
            }
        })
        .collect()
}

impl<R: PageRenderer> DigikalaScraper<R> {
    pub fn new(
        renderer: R,
        filters: FilterTable,
        config: ScraperConfig,
    ) -> Result<Self, ScrapeError> {
        Ok(Self {
            renderer,
            filters,
            extractors: TileExtractors::new()?,
            config,
        })
    }

    /// Renders one results page and parses it. Iterate the returned page's
    /// products with [`Self::page_products`].
    pub fn scrape_page(&self, url: &str) -> Result<Html, ScrapeError> {
        info!("Scraping {url}...");
        let html = self.renderer.render(url)?;
        Ok(Html::parse_document(&html))
    }

    pub fn page_products<'a>(&'a self, doc: &'a Html) -> impl Iterator<Item = Product> + 'a {
        self.extractors.products(doc, &self.config.site_origin)
    }

    /// Scrapes every requested page in order and returns all products found.
    /// Filter names are checked before any page is requested.
    pub fn get_products(&self, request: &SearchRequest) -> Result<Vec<Product>, ScrapeError> {
        let filter_query = self.filters.query(&request.filters)?;
        let pages = request.pages_limit.unwrap_or(self.config.default_pages);

        let mut products = Vec::new();
        for url in page_urls(&self.config.site_origin, &request.subject, pages, &filter_query) {
            let doc = self.scrape_page(&url)?;
            let before = products.len();
            products.extend(self.page_products(&doc));
            info!("{} products on page", products.len() - before);
        }
        Ok(products)
    }
}
