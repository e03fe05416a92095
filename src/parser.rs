use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::ScrapeError;
use crate::models::Product;

const TILE: &str = r#"a[href][class*="d-block pointer pos-relative"]"#;
const TITLE: &[&str] = &[
    r#"h2[class*="ellipsis-2 text-body2-strong"]"#,
    r#"h3[class*="ellipsis-2 text-body2-strong"]"#,
];
const PRICE: &[&str] = &[
    r#"div[class="pt-1 d-flex flex-column ai-stretch jc-between"] div[class*="jc-end gap-1"]"#,
];
const DISCOUNT: &[&str] = &[
    r#"div[class="pt-1 d-flex flex-column ai-stretch jc-between"] div[class*="__discountWrapper__"]"#,
];
const STAR: &[&str] = &[
    r#"div[class="grow-1 d-flex flex-column ai-stretch jc-start"] p[class*="text-body2-strong"]"#,
];

fn parse_selector(pattern: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(pattern).map_err(|e| ScrapeError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Looks one field up inside a tile. Alternatives are tried in order and
/// the first one that matches wins.
#[derive(Debug)]
pub struct FieldExtractor {
    field: &'static str,
    alternatives: Vec<Selector>,
}

impl FieldExtractor {
    pub fn new(field: &'static str, patterns: &[&str]) -> Result<Self, ScrapeError> {
        let alternatives = patterns
            .iter()
            .map(|p| parse_selector(p))
            .collect::<Result<_, _>>()?;
        Ok(Self { field, alternatives })
    }

    pub fn extract(&self, tile: ElementRef<'_>) -> Option<String> {
        let text = self
            .alternatives
            .iter()
            .find_map(|sel| tile.select(sel).next())
            .map(element_text);
        if text.is_none() {
            debug!("no {} in tile", self.field);
        }
        text
    }
}

/// Selectors for one search-results page layout.
#[derive(Debug)]
pub struct TileExtractors {
    tile: Selector,
    title: FieldExtractor,
    price: FieldExtractor,
    discount: FieldExtractor,
    star: FieldExtractor,
}

impl TileExtractors {
    pub fn new() -> Result<Self, ScrapeError> {
        Ok(Self {
            tile: parse_selector(TILE)?,
            title: FieldExtractor::new("title", TITLE)?,
            price: FieldExtractor::new("price", PRICE)?,
            discount: FieldExtractor::new("discount", DISCOUNT)?,
            star: FieldExtractor::new("rating", STAR)?,
        })
    }

    /// Yields one product per tile, in document order. Relative links are
    /// absolutized against `origin`.
    pub fn products<'a>(
        &'a self,
        doc: &'a Html,
        origin: &'a str,
    ) -> impl Iterator<Item = Product> + 'a {
        doc.select(&self.tile).map(move |tile| {
            let href = tile.value().attr("href").unwrap_or_default();
            Product {
                name: self.title.extract(tile).unwrap_or_default(),
                price: self.price.extract(tile),
                discount: self.discount.extract(tile),
                star: self.star.extract(tile),
                link: format!("{origin}{href}"),
            }
        })
    }
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
