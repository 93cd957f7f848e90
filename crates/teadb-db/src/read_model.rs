//! Read side of the catalog: the `active_listings` view filtered by type,
//! description keywords, and tags.

use std::collections::BTreeSet;

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::DbError;

/// A row from the `active_listings` view.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, serde::Serialize)]
pub struct ActiveListingRow {
    pub id: i64,
    pub tea_id: i64,
    pub tea_name: String,
    pub tea_description: String,
    pub tea_type_id: i64,
    pub tea_type: String,
    pub source_name: String,
    pub source_url: String,
    pub product_url: String,
    pub image_url: Option<String>,
    pub cost_oz: f64,
}

/// Search criteria. Empty fields do not filter.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    /// Matches a listing of any of these tea types.
    pub tea_types: Vec<String>,
    /// Every keyword must appear in the description (case-insensitive).
    pub keywords: Vec<String>,
    /// The tea must carry every one of these tags.
    pub tags: Vec<String>,
}

/// Splits free search text into lowercase keywords on whitespace and
/// commas, dropping duplicates.
#[must_use]
pub fn parse_search_text(text: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    text.split(|c: char| c.is_whitespace() || c == ',')
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .filter(|word| seen.insert(word.clone()))
        .collect()
}

/// Active listings matching `filter`, cheapest per ounce first, ties broken
/// by tea type.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn search_active_listings(
    pool: &SqlitePool,
    filter: &ListingFilter,
) -> Result<Vec<ActiveListingRow>, DbError> {
    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT id, tea_id, tea_name, tea_description, tea_type_id, tea_type, \
                source_name, source_url, product_url, image_url, cost_oz \
         FROM active_listings WHERE 1 = 1",
    );

    if !filter.tea_types.is_empty() {
        qb.push(" AND tea_type IN (");
        let mut types = qb.separated(", ");
        for tea_type in &filter.tea_types {
            types.push_bind(tea_type.clone());
        }
        types.push_unseparated(")");
    }

    for keyword in &filter.keywords {
        qb.push(" AND instr(lower(tea_description), ")
            .push_bind(keyword.to_lowercase())
            .push(") > 0");
    }

    let tags: BTreeSet<&str> = filter.tags.iter().map(String::as_str).collect();
    if !tags.is_empty() {
        qb.push(
            " AND tea_id IN (SELECT tt.tea_id FROM tea_tags tt \
             JOIN tags g ON g.id = tt.tag_id WHERE g.tag_name IN (",
        );
        let mut names = qb.separated(", ");
        for tag in &tags {
            names.push_bind((*tag).to_owned());
        }
        names.push_unseparated(")");
        qb.push(" GROUP BY tt.tea_id HAVING COUNT(DISTINCT tt.tag_id) = ")
            .push_bind(i64::try_from(tags.len()).unwrap_or(i64::MAX))
            .push(")");
    }

    qb.push(" ORDER BY cost_oz ASC, tea_type ASC, id ASC");

    let rows = qb
        .build_query_as::<ActiveListingRow>()
        .fetch_all(pool)
        .await?;
    Ok(rows)
}
