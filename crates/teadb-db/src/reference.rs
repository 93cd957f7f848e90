//! Reads against the reference tables (tea types, sources, tags).
//!
//! Lookups are generic over the executor so the reconciler can run them
//! inside its per-record transaction.

use sqlx::{Executor, Sqlite};

use crate::DbError;

/// A row from the `sources` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, serde::Serialize)]
pub struct SourceRow {
    pub id: i64,
    pub source_name: String,
    pub url: String,
}

/// All tea type labels, alphabetically.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_tea_types<'e, E>(executor: E) -> Result<Vec<String>, DbError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let labels = sqlx::query_scalar::<_, String>("SELECT tea_type FROM tea_types ORDER BY tea_type")
        .fetch_all(executor)
        .await?;
    Ok(labels)
}

/// Id of the tea type with exactly this label, if provisioned.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn resolve_tea_type<'e, E>(executor: E, label: &str) -> Result<Option<i64>, DbError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let id = sqlx::query_scalar::<_, i64>("SELECT id FROM tea_types WHERE tea_type = ?")
        .bind(label)
        .fetch_optional(executor)
        .await?;
    Ok(id)
}

/// Id of the source with exactly this display name, if provisioned.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn resolve_source<'e, E>(executor: E, name: &str) -> Result<Option<i64>, DbError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let id = sqlx::query_scalar::<_, i64>("SELECT id FROM sources WHERE source_name = ?")
        .bind(name)
        .fetch_optional(executor)
        .await?;
    Ok(id)
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_sources<'e, E>(executor: E) -> Result<Vec<SourceRow>, DbError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, SourceRow>(
        "SELECT id, source_name, url FROM sources ORDER BY source_name",
    )
    .fetch_all(executor)
    .await?;
    Ok(rows)
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_tags<'e, E>(executor: E) -> Result<Vec<String>, DbError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let tags = sqlx::query_scalar::<_, String>("SELECT tag_name FROM tags ORDER BY tag_name")
        .fetch_all(executor)
        .await?;
    Ok(tags)
}
