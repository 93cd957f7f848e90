use async_trait::async_trait;
use scraper::Html;
use teadb_core::ScrapedProduct;

use crate::error::ScraperError;
use crate::fetch::PageFetcher;

/// A product page discovered on a retailer's listing pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductLink {
    pub url: String,
    /// Classification already known from the listing page, if the retailer
    /// organizes its catalog by tea type.
    pub tea_type: Option<String>,
}

impl ProductLink {
    #[must_use]
    pub fn new(url: impl Into<String>, tea_type: Option<String>) -> Self {
        Self {
            url: url.into(),
            tea_type,
        }
    }
}

/// Per-retailer scraping logic.
///
/// Implementations know where a retailer lists its products and how to read
/// one product page. The provided [`SourceExtractor::scrape`] drives the two
/// together.
#[async_trait]
pub trait SourceExtractor: Send + Sync {
    /// Display name of the source; must match a provisioned source row.
    fn source_name(&self) -> &str;

    /// Walks the retailer's listing pages and returns every product page
    /// found, in discovery order.
    async fn discover_product_urls(
        &self,
        fetcher: &PageFetcher,
    ) -> Result<Vec<ProductLink>, ScraperError>;

    /// Reads one product page. Returns `None` when a required field is
    /// missing or the product cannot be classified or priced.
    fn extract_product(&self, document: &Html, link: &ProductLink) -> Option<ScrapedProduct>;

    /// Discovers product pages, fetches and extracts each one, and returns the
    /// valid records. Pages that cannot be fetched or yield no product are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Propagates discovery failures; per-page failures never surface here.
    async fn scrape(&self, fetcher: &PageFetcher) -> Result<Vec<ScrapedProduct>, ScraperError> {
        let source = self.source_name().to_owned();
        let links = self.discover_product_urls(fetcher).await?;
        tracing::info!(source = %source, pages = links.len(), "discovered product pages");

        let mut products = Vec::new();
        for link in &links {
            let extracted = fetcher
                .fetch(&link.url)
                .await
                .and_then(|document| self.extract_product(&document, link));

            let Some(product) = extracted else {
                tracing::debug!(source = %source, url = %link.url, "no product extracted");
                continue;
            };

            if let Err(e) = product.validate() {
                tracing::warn!(
                    source = %source,
                    url = %link.url,
                    error = %e,
                    "discarding incomplete product"
                );
                continue;
            }

            tracing::info!(source = %source, product = %product.name, "scraped product");
            products.push(product);
        }

        Ok(products)
    }
}
