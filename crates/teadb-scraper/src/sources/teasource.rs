//! TeaSource organizes its catalog into per-type collections, so the tea
//! type of each product comes from the collection it was listed under.

use std::collections::HashSet;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};
use teadb_core::ScrapedProduct;

use crate::error::ScraperError;
use crate::extractor::{ProductLink, SourceExtractor};
use crate::fetch::{resolve_url, PageFetcher};
use crate::parse::{dollars_and_cents, element_text, join_paragraphs, non_empty, unit_cost};

pub const SOURCE_NAME: &str = "TeaSource";
pub const DEFAULT_BASE_URL: &str = "https://www.teasource.com";

const COLLECTIONS_PATH: &str = "/pages/tea-collection";
const COLLECTION_URL_SUFFIX: &str = "?view=all";
const TITLE_SPLITTER: &str = " | ";

static LIST_ITEM: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li").expect("valid selector"));
static COLLECTION_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.indiv-product a[href]").expect("valid selector"));
static COLLECTION_LABEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.hp-title a").expect("valid selector"));
static GRID_PRODUCT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("[class*=\"product-grid\"] .indiv-product").expect("valid selector")
});
static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid selector"));
static DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.product-description-wrapper").expect("valid selector")
});
static PARAGRAPH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("valid selector"));
static FEATURED_IMAGE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.featured-image-div img[src]").expect("valid selector")
});
static VARIANT_OPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div#product-variants option").expect("valid selector"));

static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+) ounces - \$ (\d+).(\d+)").expect("valid price regex")
});

/// Maps a collection heading onto a catalog tea type.
fn map_collection(label: &str) -> Option<&'static str> {
    match label.trim() {
        "Black Tea" => Some("Black Tea"),
        "Green Tea" => Some("Green Tea"),
        "White Tea" => Some("White Tea"),
        "Herbal Tea" => Some("Herbal Tea"),
        "Oolong Tea" => Some("Oolong Tea"),
        _ => None,
    }
}

/// A tea-type collection page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Collection {
    pub tea_type: &'static str,
    pub url: String,
}

pub struct TeaSource {
    base_url: String,
}

impl TeaSource {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }
}

impl Default for TeaSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Collections listed on the tea-collection index, keeping only those whose
/// heading maps onto a known tea type.
pub(crate) fn parse_collections(document: &Html, base_url: &str) -> Vec<Collection> {
    let mut collections = Vec::new();
    for item in document.select(&LIST_ITEM) {
        let href = item
            .select(&COLLECTION_LINK)
            .next()
            .and_then(|a| a.value().attr("href"));
        let label = item.select(&COLLECTION_LABEL).next().map(element_text);

        let (Some(href), Some(label)) = (href, label) else {
            continue;
        };
        let Some(tea_type) = map_collection(&label) else {
            tracing::debug!(label = %label, "skipping unmapped collection");
            continue;
        };
        match resolve_url(base_url, href) {
            Ok(url) => collections.push(Collection {
                tea_type,
                url: format!("{url}{COLLECTION_URL_SUFFIX}"),
            }),
            Err(e) => tracing::debug!(href, error = %e, "skipping collection with bad link"),
        }
    }
    collections
}

/// Product page URLs in a collection's product grid, deduplicated in page
/// order.
pub(crate) fn parse_product_urls(document: &Html, base_url: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();
    for product in document.select(&GRID_PRODUCT) {
        let Some(href) = product
            .select(&ANCHOR)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            continue;
        };
        if let Ok(url) = resolve_url(base_url, href) {
            if seen.insert(url.clone()) {
                urls.push(url);
            }
        }
    }
    urls
}

fn parse_name(document: &Html) -> Option<String> {
    let title = document.select(&TITLE).next().map(element_text)?;
    let (name, _) = title.split_once(TITLE_SPLITTER)?;
    non_empty(name.trim().to_owned())
}

fn parse_description(document: &Html) -> Option<String> {
    let wrapper = document.select(&DESCRIPTION).next()?;
    let paragraphs = join_paragraphs(wrapper.select(&PARAGRAPH));
    if paragraphs.is_empty() {
        non_empty(element_text(wrapper))
    } else {
        Some(paragraphs)
    }
}

/// Variant id and per-ounce cost from the first entry of the size dropdown.
fn parse_variant(document: &Html) -> Option<(String, f64)> {
    let option = document.select(&VARIANT_OPTION).next()?;
    let id = non_empty(option.value().attr("value")?.trim().to_owned())?;
    let text = element_text(option);
    let caps = PRICE_RE.captures(&text)?;
    let ounces: f64 = caps[1].parse().ok()?;
    let dollars = dollars_and_cents(&caps[2], &caps[3])?;
    Some((id, unit_cost(dollars, ounces)?))
}

#[async_trait]
impl SourceExtractor for TeaSource {
    fn source_name(&self) -> &str {
        SOURCE_NAME
    }

    async fn discover_product_urls(
        &self,
        fetcher: &PageFetcher,
    ) -> Result<Vec<ProductLink>, ScraperError> {
        let index_url = format!("{}{COLLECTIONS_PATH}", self.base_url);
        let collections = {
            let document = fetcher.fetch_document(&index_url).await?;
            parse_collections(&document, &self.base_url)
        };
        tracing::debug!(collections = collections.len(), "found tea collections");

        let mut seen = HashSet::new();
        let mut links = Vec::new();
        for collection in collections {
            let Some(urls) = fetcher
                .fetch(&collection.url)
                .await
                .map(|document| parse_product_urls(&document, &self.base_url))
            else {
                continue;
            };
            for url in urls {
                if seen.insert(url.clone()) {
                    links.push(ProductLink::new(url, Some(collection.tea_type.to_owned())));
                }
            }
        }
        Ok(links)
    }

    fn extract_product(&self, document: &Html, link: &ProductLink) -> Option<ScrapedProduct> {
        let tea_type = link.tea_type.as_deref()?;
        let name = parse_name(document)?;
        let description = parse_description(document)?;
        let (product_id, cost) = parse_variant(document)?;
        let image = document
            .select(&FEATURED_IMAGE)
            .next()
            .and_then(|img| img.value().attr("src"))
            .and_then(|src| resolve_url(&self.base_url, src).ok());

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
#[path = "teasource_test.rs"]
mod tests;
