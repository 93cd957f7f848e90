//! Page fetching and per-retailer product extraction.

pub mod error;
pub mod extractor;
pub mod fetch;
pub mod orchestrator;
pub mod parse;
pub(crate) mod retry;
pub mod sources;

pub use error::ScraperError;
pub use extractor::{ProductLink, SourceExtractor};
pub use fetch::{resolve_url, PageFetcher};
pub use orchestrator::run_all;
pub use sources::{default_extractors, CamelliaSinensis, ExtractorSettings, TeaSource};
