//! Catalog timestamps are stored as sortable `YYYY-MM-DD HH:MM:SS` UTC text
//! and parsed back with the same format.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};

use crate::DbError;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// # Errors
///
/// Returns [`DbError::InvalidTimestamp`] if `value` is not in
/// [`TIMESTAMP_FORMAT`].
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DbError> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| DbError::InvalidTimestamp {
            value: value.to_owned(),
            reason: e.to_string(),
        })
}

/// Current time at the stored precision (whole seconds).
#[must_use]
pub fn db_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}
