//! Registered retailer extractors.

pub mod camellia_sinensis;
pub mod teasource;

use teadb_core::AppConfig;

use crate::extractor::SourceExtractor;

pub use camellia_sinensis::CamelliaSinensis;
pub use teasource::TeaSource;

/// Where each registered source is reached. Defaults point at the live
/// retailers; tests swap in a local mock server.
#[derive(Debug, Clone)]
pub struct ExtractorSettings {
    pub teasource_base_url: String,
    pub camellia_sinensis_base_url: String,
    pub camellia_sinensis_max_pages: usize,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            teasource_base_url: teasource::DEFAULT_BASE_URL.to_owned(),
            camellia_sinensis_base_url: camellia_sinensis::DEFAULT_BASE_URL.to_owned(),
            camellia_sinensis_max_pages: camellia_sinensis::DEFAULT_MAX_PAGES,
        }
    }
}

impl ExtractorSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            camellia_sinensis_max_pages: config.scraper_max_listing_pages,
            ..Self::default()
        }
    }
}

/// All registered extractors, in run order.
#[must_use]
pub fn default_extractors(settings: &ExtractorSettings) -> Vec<Box<dyn SourceExtractor>> {
    vec![
        Box::new(TeaSource::new(settings.teasource_base_url.clone())),
        Box::new(CamelliaSinensis::new(
            settings.camellia_sinensis_base_url.clone(),
            settings.camellia_sinensis_max_pages,
        )),
    ]
}
