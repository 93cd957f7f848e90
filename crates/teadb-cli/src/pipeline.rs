//! One full scrape-to-catalog cycle: scrape every source, reconcile each
//! record, then sweep stale listings once.

use sqlx::SqlitePool;
use teadb_core::ScrapedProduct;
use teadb_db::DbError;
use teadb_scraper::{PageFetcher, SourceExtractor};

/// What a pipeline run did.
#[derive(Debug, Default)]
pub(crate) struct RunSummary {
    /// Records produced by the extractors.
    pub scraped: usize,
    /// Records written to the catalog, in scrape order.
    pub upserted: Vec<ScrapedProduct>,
    /// Records refused for unknown reference data or missing fields.
    pub rejected: usize,
    /// Records whose write failed for any other reason.
    pub failed: usize,
    /// Listings deactivated by the staleness sweep.
    pub deactivated: u64,
}

/// Runs the pipeline. Per-record failures are logged and counted; only a
/// sweep failure aborts the run.
///
/// # Errors
///
/// Returns an error if the staleness sweep fails.
pub(crate) async fn run_pipeline(
    pool: &SqlitePool,
    fetcher: &PageFetcher,
    extractors: &[Box<dyn SourceExtractor>],
    max_age_days: i64,
) -> anyhow::Result<RunSummary> {
    let scraped = teadb_scraper::run_all(extractors, fetcher).await;
    let mut summary = RunSummary {
        scraped: scraped.len(),
        ..RunSummary::default()
    };

    for product in scraped {
        match teadb_db::upsert_scraped_product(pool, &product).await {
            Ok(_) => summary.upserted.push(product),
            Err(DbError::InvalidReference { kind, value }) => {
                tracing::error!(
                    source = %product.source,
                    product = %product.name,
                    reference = %kind,
                    value = %value,
                    "record names unprovisioned reference data; check reference.yaml and extractor mappings"
                );
                summary.rejected += 1;
            }
            Err(DbError::InvalidRecord(e)) => {
                tracing::warn!(
                    source = %product.source,
                    product = %product.name,
                    error = %e,
                    "rejecting incomplete record"
                );
                summary.rejected += 1;
            }
            Err(e) => {
                tracing::error!(
                    source = %product.source,
                    product = %product.name,
                    error = %e,
                    "failed to write record"
                );
                summary.failed += 1;
            }
        }
    }

    summary.deactivated = teadb_db::deactivate_stale(pool, max_age_days).await?;

    tracing::info!(
        scraped = summary.scraped,
        upserted = summary.upserted.len(),
        rejected = summary.rejected,
        failed = summary.failed,
        deactivated = summary.deactivated,
        "pipeline run complete"
    );

    Ok(summary)
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
