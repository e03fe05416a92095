use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ScrapeError;
use crate::models::{Product, ProductRow};

/// Writes `products` to `{dir}/{subject}.csv`, creating `dir` when needed.
pub fn export_products(
    products: &[Product],
    dir: &Path,
    subject: &str,
) -> Result<PathBuf, ScrapeError> {
    let path = dir.join(format!("{subject}.csv"));
    fs::create_dir_all(dir).map_err(|e| ScrapeError::export(dir, e))?;

    let mut writer = csv::Writer::from_path(&path).map_err(|e| ScrapeError::export(&path, e))?;
    for product in products {
        writer
            .serialize(ProductRow::from(product))
            .map_err(|e| ScrapeError::export(&path, e))?;
    }
    writer.flush().map_err(|e| ScrapeError::export(&path, e))?;

    info!("Wrote {} products to {}", products.len(), path.display());
    Ok(path)
}
