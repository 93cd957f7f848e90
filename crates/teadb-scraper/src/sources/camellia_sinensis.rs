//! Camellia Sinensis lists its whole catalog on paged listing pages and
//! quotes bulk prices per gram weight.
//!
//! Past the last page the site serves the last page again, so pagination
//! stops as soon as the "Items N" counter stops growing, or at the page cap.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};
use teadb_core::ScrapedProduct;

use crate::error::ScraperError;
use crate::extractor::{ProductLink, SourceExtractor};
use crate::fetch::{resolve_url, PageFetcher};
use crate::parse::{
    dollars_and_cents, element_text, grams_to_oz, join_paragraphs, non_empty, unit_cost,
};

pub const SOURCE_NAME: &str = "Camellia Sinensis";
pub const DEFAULT_BASE_URL: &str = "http://camellia-sinensis.com";
pub const DEFAULT_MAX_PAGES: usize = 25;

const LISTING_PATH: &str = "/en/tea?limit=100&mode=list&p=";

/// Text artifacts the site leaves in descriptions.
const DESCRIPTION_ARTIFACTS: [&str; 2] = ["&#8232", "\u{2028}"];

static SPAN: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span").expect("valid selector"));
static PRODUCT_ANCHOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.infos.clearfix a[class][href][title]").expect("valid selector")
});
static PRODUCT_CODE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p.product-code").expect("valid selector"));
static RIGHT_COLUMN: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div#right-column").expect("valid selector"));
static NAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p.name").expect("valid selector"));
static DESCRIPTION_PARAGRAPH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.description p").expect("valid selector"));
static FAMILY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p.family").expect("valid selector"));
static SALEABLE_OPTION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("option[data-saleable][value]").expect("valid selector")
});
static IMAGE_OVERLAY: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div#left-column a.img-overlay[href]").expect("valid selector")
});

static ITEM_COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Items (\d+)").expect("valid item count regex"));
static PRODUCT_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"PRODUCT CODE : (\S+)").expect("valid product code regex"));
static GRAM_PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)g[ ]?\x{a0}?\$(\d+).(\d+)").expect("valid gram price regex")
});

/// Maps the site's tea family label onto a catalog tea type.
fn map_family(family: &str) -> Option<&'static str> {
    match family.trim() {
        "BLACK TEA" | "SCENTED TEA BLACK" => Some("Black Tea"),
        "GREEN TEA" | "SCENTED TEA GREEN" => Some("Green Tea"),
        "WHITE TEA" | "SCENTED TEA WHITE" => Some("White Tea"),
        "WULONG TEA" | "WULONG AGED TEA" => Some("Oolong Tea"),
        "HERBAL TEA" | "ROOIBOS" => Some("Herbal Tea"),
        _ => None,
    }
}

/// One listing page: the running item counter and the product links on it.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ListingPage {
    pub item_count: Option<usize>,
    pub hrefs: Vec<String>,
}

pub(crate) fn parse_listing_page(document: &Html) -> ListingPage {
    let item_count = document.select(&SPAN).find_map(|span| {
        let text = element_text(span);
        ITEM_COUNT_RE
            .captures(&text)
            .and_then(|caps| caps[1].parse::<usize>().ok())
    });
    let hrefs = document
        .select(&PRODUCT_ANCHOR)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_owned)
        .collect();
    ListingPage { item_count, hrefs }
}

pub struct CamelliaSinensis {
    base_url: String,
    max_pages: usize,
}

impl CamelliaSinensis {
    #[must_use]
    pub fn new(base_url: impl Into<String>, max_pages: usize) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            max_pages,
        }
    }

    fn listing_url(&self, page: usize) -> String {
        format!("{}{LISTING_PATH}{page}", self.base_url)
    }
}

impl Default for CamelliaSinensis {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_MAX_PAGES)
    }
}

fn parse_description(column: scraper::ElementRef<'_>) -> Option<String> {
    let mut description = join_paragraphs(column.select(&DESCRIPTION_PARAGRAPH));
    for artifact in DESCRIPTION_ARTIFACTS {
        description = description.replace(artifact, "");
    }
    non_empty(description.trim().to_owned())
}

/// Per-ounce cost from the first saleable option quoted in grams. Boxes,
/// bags and gift sets are not quoted that way and yield `None`.
fn parse_cost(column: scraper::ElementRef<'_>) -> Option<f64> {
    let option = column.select(&SALEABLE_OPTION).next()?;
    let text = option.text().collect::<String>();
    let caps = GRAM_PRICE_RE.captures(&text)?;
    let grams: f64 = caps[1].parse().ok()?;
    let dollars = dollars_and_cents(&caps[2], &caps[3])?;
    unit_cost(dollars, grams_to_oz(grams))
}

#[async_trait]
impl SourceExtractor for CamelliaSinensis {
    fn source_name(&self) -> &str {
        SOURCE_NAME
    }

    async fn discover_product_urls(
        &self,
        fetcher: &PageFetcher,
    ) -> Result<Vec<ProductLink>, ScraperError> {
        let mut reviewed_items = 0usize;
        let mut links = Vec::new();

        for page in 1..=self.max_pages {
            let url = self.listing_url(page);
            let Some(listing) = fetcher
                .fetch(&url)
                .await
                .map(|document| parse_listing_page(&document))
            else {
                break;
            };

            let total = listing.item_count.unwrap_or(reviewed_items);
            if total <= reviewed_items {
                tracing::debug!(page, total, "item counter stopped growing; end of listing");
                break;
            }
            reviewed_items = total;

            for href in &listing.hrefs {
                match resolve_url(&self.base_url, href) {
                    Ok(url) => links.push(ProductLink::new(url, None)),
                    Err(e) => tracing::debug!(href = %href, error = %e, "skipping bad product link"),
                }
            }

            if page == self.max_pages {
                tracing::warn!(
                    max_pages = self.max_pages,
                    "listing page cap reached; remaining pages not visited"
                );
            }
        }

        Ok(links)
    }

    fn extract_product(&self, document: &Html, link: &ProductLink) -> Option<ScrapedProduct> {
        let code_text = document.select(&PRODUCT_CODE).next().map(element_text)?;
        let product_id = PRODUCT_CODE_RE.captures(&code_text)?[1].to_owned();

        let column = document.select(&RIGHT_COLUMN).next()?;
        let name = column.select(&NAME).next().map(element_text).and_then(non_empty)?;
        let description = parse_description(column)?;
        let family = column.select(&FAMILY).next().map(element_text)?;
        let Some(tea_type) = map_family(&family) else {
            tracing::debug!(url = %link.url, family = %family, "unmapped tea family");
            return None;
        };
        let cost = parse_cost(column)?;

        let image = document
            .select(&IMAGE_OVERLAY)
            .filter_map(|a| a.value().attr("href"))
            .last()
            .and_then(|href| resolve_url(&self.base_url, href).ok());

        Some(ScrapedProduct::new(
            &name,
            tea_type,
            &description,
            SOURCE_NAME,
            &product_id,
            cost,
            &link.url,
            image.as_deref(),
        ))
    }
}

#[cfg(test)]
#[path = "camellia_sinensis_test.rs"]
mod tests;
