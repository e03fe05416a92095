//! Single-product image lookup through the public product API.

use regex::Regex;
use reqwest::blocking::Client;
use tracing::info;

use crate::error::ScrapeError;
use crate::fetcher;
use crate::models::ProductResponse;

const PRODUCT_ID: &str = r"-(\d+)/";

/// Pulls the dkp id out of a product page URL, e.g.
/// `.../product/dkp-9115608/some-slug/` gives `9115608`.
pub fn extract_product_id(url: &str) -> Result<u64, ScrapeError> {
    let re = Regex::new(PRODUCT_ID).map_err(|e| ScrapeError::InvalidPattern {
        pattern: PRODUCT_ID.to_string(),
        reason: e.to_string(),
    })?;
    re.captures(url)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| ScrapeError::PatternNotMatched(url.to_string()))
}

pub fn product_api_url(api_root: &str, product_id: u64) -> String {
    format!("{}/v1/product/{}/", api_root.trim_end_matches('/'), product_id)
}

/// Takes `data.seo.markup_schema[0].image` from a decoded API response.
pub fn image_from_response(response: ProductResponse, url: &str) -> Result<String, ScrapeError> {
    response
        .data
        .seo
        .markup_schema
        .into_iter()
        .next()
        .and_then(|schema| schema.image)
        .ok_or_else(|| ScrapeError::MissingImage(url.to_string()))
}

pub fn resolve_image(
    client: &Client,
    api_root: &str,
    product_url: &str,
) -> Result<String, ScrapeError> {
    let product_id = extract_product_id(product_url)?;
    let api_url = product_api_url(api_root, product_id);
    info!("Fetching product {product_id} from {api_url}");

    let response: ProductResponse = fetcher::fetch_json(client, &api_url)?;
    image_from_response(response, &api_url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::API_ROOT;

    const SAMPLE: &str = "https://www.digikala.com/product/dkp-9115608/%DA%AF%D9%88%D8%B4%DB%8C-%D9%85%D9%88%D8%A8%D8%A7%DB%8C%D9%84-%D9%88%D8%A7%D9%86-%D9%BE%D9%84%D8%A7%D8%B3-%D9%85%D8%AF%D9%84-10-pro-%D8%AF%D9%88-%D8%B3%DB%8C%D9%85-%DA%A9%D8%A7%D8%B1%D8%AA-%D8%B8%D8%B1%D9%81%DB%8C%D8%AA-256-%DA%AF%DB%8C%DA%AF%D8%A7%D8%A8%D8%A7%DB%8C%D8%AA-%D9%88-%D8%B1%D9%85-12-%DA%AF%DB%8C%DA%AF%D8%A7%D8%A8%D8%A7%DB%8C%D8%AA/";

    #[test]
    fn sample_url_resolves_to_api_url() {
        let id = extract_product_id(SAMPLE).unwrap();
        assert_eq!(id, 9115608);
        assert_eq!(
            product_api_url(API_ROOT, id),
            "https://api.digikala.com/v1/product/9115608/"
        );
    }

    #[test]
    fn url_without_id_is_pattern_failure() {
        let err = extract_product_id("https://www.digikala.com/search/mobile/").unwrap_err();
        assert!(matches!(err, ScrapeError::PatternNotMatched(_)));
    }

    #[test]
    fn image_is_read_from_first_markup_schema() {
        let body = r#"{"status":200,"data":{"seo":{"title":"x","markup_schema":[
            {"@type":"Product","image":"https://dkstatics-public.digikala.com/digikala-products/1.jpg"},
            {"@type":"BreadcrumbList"}]}}}"#;
        let response: ProductResponse = serde_json::from_str(body).unwrap();
        let image = image_from_response(response, "u").unwrap();
        assert_eq!(image, "https://dkstatics-public.digikala.com/digikala-products/1.jpg");
    }

    #[test]
    fn empty_markup_schema_is_missing_image() {
        let body = r#"{"data":{"seo":{"markup_schema":[]}}}"#;
        let response: ProductResponse = serde_json::from_str(body).unwrap();
        assert!(matches!(
            image_from_response(response, "u"),
            Err(ScrapeError::MissingImage(_))
        ));
    }

    #[test]
    fn response_without_seo_does_not_decode() {
        assert!(serde_json::from_str::<ProductResponse>(r#"{"data":{}}"#).is_err());
    }
}
