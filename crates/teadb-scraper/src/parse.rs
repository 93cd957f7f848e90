//! Text and unit helpers shared by the source extractors.

use scraper::ElementRef;

/// Ounces per gram.
pub const OUNCES_PER_GRAM: f64 = 0.035_274;

/// Converts a weight in grams to ounces.
#[must_use]
pub fn grams_to_oz(grams: f64) -> f64 {
    grams * OUNCES_PER_GRAM
}

/// Builds a dollar amount from the whole-dollar and cents groups of a price
/// match, e.g. `("12", "50")` becomes `12.50`.
#[must_use]
pub fn dollars_and_cents(whole: &str, cents: &str) -> Option<f64> {
    let whole: u32 = whole.parse().ok()?;
    let cents: u32 = cents.parse().ok()?;
    Some(f64::from(whole) + f64::from(cents) / 100.0)
}

/// Unit cost for `dollars` spread over `units`; `None` for a zero or
/// non-finite quantity.
#[must_use]
pub fn unit_cost(dollars: f64, units: f64) -> Option<f64> {
    if units <= 0.0 || !units.is_finite() {
        return None;
    }
    let cost = dollars / units;
    cost.is_finite().then_some(cost)
}

/// Concatenated, trimmed text content of an element.
#[must_use]
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}

/// Joins the non-empty text of each paragraph with a single space.
pub fn join_paragraphs<'a>(paragraphs: impl Iterator<Item = ElementRef<'a>>) -> String {
    paragraphs
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns `Some(value)` unless `value` is blank.
#[must_use]
pub fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
