use sqlx::SqlitePool;
use teadb_core::ReferenceFile;

use crate::DbError;

/// Rows processed per reference table by [`seed_reference`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub tea_types: usize,
    pub sources: usize,
    pub tags: usize,
}

/// Provision reference data (tea types, sources, tags) from the reference
/// file. Existing rows are kept; a source's URL is updated in place.
///
/// All inserts run inside a single transaction; if any operation fails the
/// entire batch is rolled back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_reference(
    pool: &SqlitePool,
    reference: &ReferenceFile,
) -> Result<SeedSummary, DbError> {
    let mut tx = pool.begin().await?;
    let mut summary = SeedSummary::default();

    for tea_type in &reference.tea_types {
        sqlx::query("INSERT INTO tea_types (tea_type) VALUES (?) ON CONFLICT (tea_type) DO NOTHING")
            .bind(tea_type.trim())
            .execute(&mut *tx)
            .await?;
        summary.tea_types += 1;
    }

    for source in &reference.sources {
        sqlx::query(
            "INSERT INTO sources (source_name, url) VALUES (?, ?) \
             ON CONFLICT (source_name) DO UPDATE SET url = excluded.url",
        )
        .bind(source.name.trim())
        .bind(source.url.trim())
        .execute(&mut *tx)
        .await?;
        summary.sources += 1;
    }

    for tag in &reference.tags {
        sqlx::query("INSERT INTO tags (tag_name) VALUES (?) ON CONFLICT (tag_name) DO NOTHING")
            .bind(tag.trim())
            .execute(&mut *tx)
            .await?;
        summary.tags += 1;
    }

    tx.commit().await?;
    Ok(summary)
}
