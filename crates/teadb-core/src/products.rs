use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A product record pulled off a retailer's product page, normalized to a
/// per-ounce unit cost and one of the catalog's tea type labels.
///
/// Produced by the source extractors and consumed by the catalog
/// reconciler. Never persisted as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedProduct {
    pub name: String,
    /// Canonical tea type label, e.g. `"Green Tea"`.
    pub tea_type: String,
    pub description: String,
    /// Source display name; must match a provisioned source.
    pub source: String,
    /// Retailer-local identifier (variant id, product code).
    pub product_id: String,
    /// Unit cost in dollars per ounce.
    pub cost: f64,
    pub url: String,
    pub image: Option<String>,
}

impl ScrapedProduct {
    /// Builds a record, trimming surrounding whitespace from every string
    /// field. A blank image URL becomes `None`.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        tea_type: &str,
        description: &str,
        source: &str,
        product_id: &str,
        cost: f64,
        url: &str,
        image: Option<&str>,
    ) -> Self {
        Self {
            name: name.trim().to_owned(),
            tea_type: tea_type.trim().to_owned(),
            description: description.trim().to_owned(),
            source: source.trim().to_owned(),
            product_id: product_id.trim().to_owned(),
            cost,
            url: url.trim().to_owned(),
            image: image
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
        }
    }

    /// Checks that every required field is present and the cost is usable.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingField`] for the first empty required field
    /// and [`CoreError::InvalidCost`] for a non-finite or non-positive cost.
    pub fn validate(&self) -> Result<(), CoreError> {
        let required = [
            ("name", &self.name),
            ("tea_type", &self.tea_type),
            ("description", &self.description),
            ("source", &self.source),
            ("product_id", &self.product_id),
            ("url", &self.url),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(CoreError::MissingField(field));
            }
        }
        if !self.cost.is_finite() || self.cost <= 0.0 {
            return Err(CoreError::InvalidCost(self.cost));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl std::fmt::Display for ScrapedProduct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Source: {}, Name: {}", self.source, self.name)
    }
}
