//! Staleness sweep: active listings not refreshed within the age window are
//! marked unavailable. This is the only way a listing leaves the active set.

use chrono::{DateTime, TimeDelta, Utc};
use sqlx::SqlitePool;

use crate::timestamps::{db_now, parse_timestamp};
use crate::DbError;

/// Deactivates listings older than `max_age_days` relative to now.
///
/// # Errors
///
/// See [`deactivate_stale_at`].
pub async fn deactivate_stale(pool: &SqlitePool, max_age_days: i64) -> Result<u64, DbError> {
    deactivate_stale_at(pool, max_age_days, db_now()).await
}

/// Deactivates every active listing whose last update is strictly before
/// `now - max_age_days`. A listing updated exactly at the cutoff stays
/// active. Returns the number of listings deactivated.
///
/// Listings with an unreadable timestamp are logged and left alone.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if a query or the commit fails; no listing is
/// deactivated in that case.
pub async fn deactivate_stale_at(
    pool: &SqlitePool,
    max_age_days: i64,
    now: DateTime<Utc>,
) -> Result<u64, DbError> {
    let Some(cutoff) =
        TimeDelta::try_days(max_age_days).and_then(|age| now.checked_sub_signed(age))
    else {
        tracing::warn!(max_age_days, "age window out of range; nothing deactivated");
        return Ok(0);
    };

    let mut tx = pool.begin().await?;

    let active: Vec<(i64, String)> = sqlx::query_as::<_, (i64, String)>(
        "SELECT id, last_updated_date FROM listings WHERE is_available = 1",
    )
    .fetch_all(&mut *tx)
    .await?;

    let mut deactivated = 0u64;
    for (id, last_updated) in active {
        let updated_at = match parse_timestamp(&last_updated) {
            Ok(ts) => ts,
            Err(e) => {
                tracing::warn!(listing_id = id, error = %e, "skipping listing with unreadable timestamp");
                continue;
            }
        };

        if updated_at < cutoff {
            sqlx::query("UPDATE listings SET is_available = 0 WHERE id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            deactivated += 1;
        }
    }

    tx.commit().await?;

    tracing::info!(deactivated, max_age_days, "staleness sweep complete");
    Ok(deactivated)
}
