pub mod app_config;
pub mod config;
pub mod products;
pub mod reference;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::ScrapedProduct;
pub use reference::{load_reference, ReferenceFile, SourceConfig};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("scraped product is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("scraped product has invalid unit cost {0}")]
    InvalidCost(f64),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
    #[error("failed to read reference file {path}: {source}")]
    ReferenceFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse reference file: {0}")]
    ReferenceFileParse(#[from] serde_yaml::Error),
    #[error("reference data validation failed: {0}")]
    Validation(String),
}
