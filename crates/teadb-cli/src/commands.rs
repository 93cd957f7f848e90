//! Handlers for the catalog maintenance and query commands.

use std::path::Path;

use anyhow::Context;
use sqlx::SqlitePool;
use teadb_db::{parse_search_text, search_active_listings, ListingFilter};

use crate::pipeline::RunSummary;

pub(crate) async fn ensure_schema(pool: &SqlitePool) -> anyhow::Result<()> {
    let applied = teadb_db::run_migrations(pool)
        .await
        .context("failed to apply migrations")?;
    if applied > 0 {
        tracing::info!(applied, "applied pending migrations");
    }
    Ok(())
}

pub(crate) async fn run_migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    let applied = teadb_db::run_migrations(pool)
        .await
        .context("failed to apply migrations")?;
    println!("applied {applied} migration(s)");
    Ok(())
}

pub(crate) async fn run_seed(pool: &SqlitePool, path: &Path) -> anyhow::Result<()> {
    let reference = teadb_core::load_reference(path)
        .with_context(|| format!("failed to load reference data from {}", path.display()))?;
    let summary = teadb_db::seed_reference(pool, &reference).await?;
    println!(
        "seeded {} tea type(s), {} source(s), {} tag(s)",
        summary.tea_types, summary.sources, summary.tags
    );
    Ok(())
}

pub(crate) async fn run_types(pool: &SqlitePool) -> anyhow::Result<()> {
    for tea_type in teadb_db::list_tea_types(pool).await? {
        println!("{tea_type}");
    }
    Ok(())
}

pub(crate) async fn run_search(
    pool: &SqlitePool,
    tea_types: Vec<String>,
    text: Option<&str>,
    tags: Vec<String>,
    json: bool,
) -> anyhow::Result<()> {
    let filter = ListingFilter {
        tea_types,
        keywords: text.map(parse_search_text).unwrap_or_default(),
        tags,
    };
    let rows = search_active_listings(pool, &filter).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("no matches found");
        return Ok(());
    }
    for row in &rows {
        println!(
            "{:>7.2} $/oz  {:<12} {:<40} {}",
            row.cost_oz, row.tea_type, row.tea_name, row.source_name
        );
    }
    Ok(())
}

pub(crate) fn print_run_summary(summary: &RunSummary, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&summary.upserted)?);
        return Ok(());
    }
    for product in &summary.upserted {
        println!("{product}");
    }
    println!(
        "scraped {}, upserted {}, rejected {}, failed {}, deactivated {}",
        summary.scraped,
        summary.upserted.len(),
        summary.rejected,
        summary.failed,
        summary.deactivated
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use teadb_db::PoolConfig;

    use super::*;

    fn reference_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config/reference.yaml")
    }

    #[tokio::test]
    async fn seed_works_on_a_fresh_database() {
        let pool = teadb_db::connect_pool("sqlite::memory:", PoolConfig::default())
            .await
            .expect("failed to open in-memory database");

        ensure_schema(&pool).await.expect("schema setup failed");
        run_seed(&pool, &reference_path())
            .await
            .expect("seed failed on a fresh database");

        let tea_types = teadb_db::list_tea_types(&pool)
            .await
            .expect("listing tea types failed");
        assert!(tea_types.iter().any(|t| t == "Green Tea"));

        run_search(&pool, Vec::new(), None, Vec::new(), false)
            .await
            .expect("search failed on a freshly seeded database");
    }

    #[tokio::test]
    async fn ensure_schema_is_idempotent() {
        let pool = teadb_db::connect_pool("sqlite::memory:", PoolConfig::default())
            .await
            .expect("failed to open in-memory database");

        ensure_schema(&pool).await.expect("first schema setup failed");
        ensure_schema(&pool).await.expect("second schema setup failed");
        run_types(&pool).await.expect("types failed after schema setup");
    }
}
