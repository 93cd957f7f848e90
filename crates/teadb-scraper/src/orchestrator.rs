use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use teadb_core::ScrapedProduct;

use crate::extractor::SourceExtractor;
use crate::fetch::PageFetcher;

/// Runs every extractor in order and concatenates their products.
///
/// Each extractor is isolated: an error or a panic inside one is logged and
/// that source contributes nothing, while the remaining sources still run.
pub async fn run_all(
    extractors: &[Box<dyn SourceExtractor>],
    fetcher: &PageFetcher,
) -> Vec<ScrapedProduct> {
    let mut products = Vec::new();

    for extractor in extractors {
        let source = extractor.source_name().to_owned();
        tracing::info!(source = %source, "scraping source");

        match AssertUnwindSafe(extractor.scrape(fetcher))
            .catch_unwind()
            .await
        {
            Ok(Ok(scraped)) => {
                tracing::info!(source = %source, count = scraped.len(), "source scrape complete");
                products.extend(scraped);
            }
            Ok(Err(e)) => {
                tracing::error!(source = %source, error = %e, "source scrape failed");
            }
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_owned())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_owned());
                tracing::error!(source = %source, panic = %message, "source scraper panicked");
            }
        }
    }

    products
}
