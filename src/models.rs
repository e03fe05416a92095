use serde::{Deserialize, Serialize};

/// Shown in the price column when a tile carries no price.
pub const OUT_OF_STOCK: &str = "ناموجود";
/// Shown for a missing discount badge or rating.
pub const NOT_AVAILABLE: &str = "-";

/// One product tile as scraped from a search-results page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    pub price: Option<String>,
    pub discount: Option<String>,
    pub star: Option<String>,
    pub link: String,
}

/// Flat export shape of a [`Product`]; absent values become sentinels here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRow {
    pub name: String,
    pub price: String,
    pub discount: String,
    pub star: String,
    pub link: String,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.clone().unwrap_or_else(|| OUT_OF_STOCK.into()),
            discount: product.discount.clone().unwrap_or_else(|| NOT_AVAILABLE.into()),
            star: product.star.clone().unwrap_or_else(|| NOT_AVAILABLE.into()),
            link: product.link.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub subject: String,
    pub pages_limit: Option<u32>,
    pub filters: Vec<String>,
}

/// Subset of `GET /v1/product/{id}/` that the image resolver reads.
#[derive(Debug, Deserialize)]
pub struct ProductResponse {
    pub data: ProductData,
}

#[derive(Debug, Deserialize)]
pub struct ProductData {
    pub seo: Seo,
}

#[derive(Debug, Deserialize)]
pub struct Seo {
    #[serde(default)]
    pub markup_schema: Vec<MarkupSchema>,
}

#[derive(Debug, Deserialize)]
pub struct MarkupSchema {
    pub image: Option<String>,
}
