//! Isolation behavior of `run_all` with stub extractors.

use async_trait::async_trait;
use scraper::Html;

use teadb_core::ScrapedProduct;
use teadb_scraper::{run_all, PageFetcher, ProductLink, ScraperError, SourceExtractor};

enum Behavior {
    Products(Vec<ScrapedProduct>),
    Fail,
    Panic,
}

struct StubExtractor {
    name: &'static str,
    behavior: Behavior,
}

#[async_trait]
impl SourceExtractor for StubExtractor {
    fn source_name(&self) -> &str {
        self.name
    }

    async fn discover_product_urls(
        &self,
        _fetcher: &PageFetcher,
    ) -> Result<Vec<ProductLink>, ScraperError> {
        Ok(Vec::new())
    }

    fn extract_product(&self, _document: &Html, _link: &ProductLink) -> Option<ScrapedProduct> {
        None
    }

    async fn scrape(&self, _fetcher: &PageFetcher) -> Result<Vec<ScrapedProduct>, ScraperError> {
        match &self.behavior {
            Behavior::Products(products) => Ok(products.clone()),
            Behavior::Fail => Err(ScraperError::NotFound {
                url: "http://stub.invalid/".to_owned(),
            }),
            Behavior::Panic => panic!("markup changed underneath us"),
        }
    }
}

fn product(source: &str, id: &str) -> ScrapedProduct {
    ScrapedProduct::new("Dragon Well", "Green Tea", "desc", source, id, 2.5, "url1", None)
}

fn stub(name: &'static str, behavior: Behavior) -> Box<dyn SourceExtractor> {
    Box::new(StubExtractor { name, behavior })
}

fn test_fetcher() -> PageFetcher {
    PageFetcher::new(5, "teadb-test/0.1", 0, 0).expect("failed to build test PageFetcher")
}

#[tokio::test]
async fn run_all_concatenates_in_registration_order() {
    let extractors = vec![
        stub("SourceA", Behavior::Products(vec![product("SourceA", "P1")])),
        stub(
            "SourceB",
            Behavior::Products(vec![product("SourceB", "P2"), product("SourceB", "P3")]),
        ),
    ];

    let products = run_all(&extractors, &test_fetcher()).await;
    let ids: Vec<&str> = products.iter().map(|p| p.product_id.as_str()).collect();
    assert_eq!(ids, vec!["P1", "P2", "P3"]);
}

#[tokio::test]
async fn failing_source_does_not_stop_later_sources() {
    let extractors = vec![
        stub("Broken", Behavior::Fail),
        stub("SourceA", Behavior::Products(vec![product("SourceA", "P1")])),
    ];

    let products = run_all(&extractors, &test_fetcher()).await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].source, "SourceA");
}

#[tokio::test]
async fn panicking_source_contributes_nothing() {
    let extractors = vec![
        stub("SourceA", Behavior::Products(vec![product("SourceA", "P1")])),
        stub("Exploding", Behavior::Panic),
        stub("SourceB", Behavior::Products(vec![product("SourceB", "P9")])),
    ];

    let products = run_all(&extractors, &test_fetcher()).await;
    let sources: Vec<&str> = products.iter().map(|p| p.source.as_str()).collect();
    assert_eq!(sources, vec!["SourceA", "SourceB"]);
}

#[tokio::test]
async fn no_extractors_yields_empty_batch() {
    let products = run_all(&[], &test_fetcher()).await;
    assert!(products.is_empty());
}
