//! Catalog reconciliation: folds scraped records into the `teas` and
//! `listings` tables.
//!
//! A tea is identified by its exact name and a listing by
//! `(source_id, product_id)`. Repeat sightings overwrite in place, so running
//! the same record twice only refreshes timestamps.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use teadb_core::ScrapedProduct;

use crate::reference::{resolve_source, resolve_tea_type};
use crate::timestamps::{db_now, format_timestamp};
use crate::{DbError, ReferenceKind};

/// Row ids touched by one reconciled record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub tea_id: i64,
    pub listing_id: i64,
}

/// Inserts or updates the tea named `name`, returning its id.
///
/// On conflict the type, description and timestamp are overwritten.
///
/// # Errors
///
/// Returns [`DbError::InvalidReference`] if `tea_type` is not a provisioned
/// tea type (nothing is written), or [`DbError::Sqlx`] if a query fails.
pub async fn upsert_tea(
    conn: &mut SqliteConnection,
    name: &str,
    tea_type: &str,
    description: &str,
    updated_at: DateTime<Utc>,
) -> Result<i64, DbError> {
    let tea_type_id = resolve_tea_type(&mut *conn, tea_type)
        .await?
        .ok_or_else(|| DbError::InvalidReference {
            kind: ReferenceKind::TeaType,
            value: tea_type.to_owned(),
        })?;

    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO teas (name, tea_type_id, description, last_updated_date) \
         VALUES (?, ?, ?, ?) \
         ON CONFLICT (name) DO UPDATE SET \
             tea_type_id       = excluded.tea_type_id, \
             description       = excluded.description, \
             last_updated_date = excluded.last_updated_date \
         RETURNING id",
    )
    .bind(name)
    .bind(tea_type_id)
    .bind(description)
    .bind(format_timestamp(updated_at))
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

/// Inserts or updates the listing for `(source_name, product_id)`, returning
/// its id. A repeat sighting always marks the listing available again.
///
/// # Errors
///
/// Returns [`DbError::InvalidReference`] if `source_name` is not a
/// provisioned source, or [`DbError::Sqlx`] if a query fails.
#[allow(clippy::too_many_arguments)]
pub async fn upsert_listing(
    conn: &mut SqliteConnection,
    tea_id: i64,
    source_name: &str,
    product_id: &str,
    cost_oz: f64,
    url: &str,
    image_url: Option<&str>,
    updated_at: DateTime<Utc>,
) -> Result<i64, DbError> {
    let source_id = resolve_source(&mut *conn, source_name)
        .await?
        .ok_or_else(|| DbError::InvalidReference {
            kind: ReferenceKind::Source,
            value: source_name.to_owned(),
        })?;

    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO listings \
             (tea_id, source_id, product_id, cost_oz, url, image_url, is_available, last_updated_date) \
         VALUES (?, ?, ?, ?, ?, ?, 1, ?) \
         ON CONFLICT (source_id, product_id) DO UPDATE SET \
             tea_id            = excluded.tea_id, \
             cost_oz           = excluded.cost_oz, \
             url               = excluded.url, \
             image_url         = excluded.image_url, \
             is_available      = 1, \
             last_updated_date = excluded.last_updated_date \
         RETURNING id",
    )
    .bind(tea_id)
    .bind(source_id)
    .bind(product_id)
    .bind(cost_oz)
    .bind(url)
    .bind(image_url)
    .bind(format_timestamp(updated_at))
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

/// Reconciles one scraped record at the current time.
///
/// # Errors
///
/// See [`upsert_scraped_product_at`].
pub async fn upsert_scraped_product(
    pool: &SqlitePool,
    product: &ScrapedProduct,
) -> Result<UpsertOutcome, DbError> {
    upsert_scraped_product_at(pool, product, db_now()).await
}

/// Reconciles one scraped record: the tea and its listing are written in a
/// single transaction, so a rejected record leaves no partial rows.
///
/// # Errors
///
/// - [`DbError::InvalidRecord`]: a required field is empty or the cost is unusable.
/// - [`DbError::InvalidReference`]: unknown tea type or source.
/// - [`DbError::Sqlx`]: any query or the commit fails.
pub async fn upsert_scraped_product_at(
    pool: &SqlitePool,
    product: &ScrapedProduct,
    updated_at: DateTime<Utc>,
) -> Result<UpsertOutcome, DbError> {
    product.validate()?;

    let mut tx = pool.begin().await?;

    let tea_id = upsert_tea(
        &mut *tx,
        &product.name,
        &product.tea_type,
        &product.description,
        updated_at,
    )
    .await?;

    let listing_id = upsert_listing(
        &mut *tx,
        tea_id,
        &product.source,
        &product.product_id,
        product.cost,
        &product.url,
        product.image.as_deref(),
        updated_at,
    )
    .await?;

    tx.commit().await?;

    Ok(UpsertOutcome { tea_id, listing_id })
}
