//! HTML page fetching with bounded retry.

use std::time::Duration;

use reqwest::{Client, Url};
use scraper::Html;
use teadb_core::AppConfig;

use crate::error::ScraperError;
use crate::retry::retry_with_delay;

/// Fetches retailer pages and parses them into navigable HTML documents.
///
/// Transient errors (network failures, 429, 5xx) are retried up to
/// `max_retries` additional attempts. Every other failure ends the request
/// on the first attempt.
pub struct PageFetcher {
    client: Client,
    max_retries: u32,
    retry_delay_ms: u64,
}

impl PageFetcher {
    /// Creates a `PageFetcher` with configured timeout, `User-Agent`, and
    /// retry policy. Set `max_retries` to `0` to disable retries.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            retry_delay_ms,
        })
    }

    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            config.scraper_request_timeout_secs,
            &config.scraper_user_agent,
            config.scraper_max_retries,
            config.scraper_retry_delay_ms,
        )
    }

    /// Fetches `url` and parses the body as HTML.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::NotFound`]: HTTP 404 (not retried).
    /// - [`ScraperError::RateLimited`]: HTTP 429 after all retries exhausted.
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx (5xx retried, 4xx not).
    /// - [`ScraperError::Http`]: network or TLS failure after all retries exhausted.
    /// - [`ScraperError::Parse`]: empty body or non-HTML content type (not retried).
    pub async fn fetch_document(&self, url: &str) -> Result<Html, ScraperError> {
        let body = retry_with_delay(self.max_retries, self.retry_delay_ms, || {
            let url = url.to_owned();
            async move {
                let response = self
                    .client
                    .get(&url)
                    .header(
                        reqwest::header::ACCEPT,
                        "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
                    )
                    .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    return Err(ScraperError::RateLimited { url });
                }
                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(ScraperError::NotFound { url });
                }
                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                let content_type = response
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_ascii_lowercase);
                if let Some(content_type) = content_type {
                    if !content_type.contains("html") {
                        return Err(ScraperError::Parse {
                            url,
                            reason: format!("unexpected content type \"{content_type}\""),
                        });
                    }
                }

                let body = response.text().await?;
                if body.trim().is_empty() {
                    return Err(ScraperError::Parse {
                        url,
                        reason: "empty body".to_owned(),
                    });
                }
                Ok(body)
            }
        })
        .await?;

        Ok(Html::parse_document(&body))
    }

    /// Fetches `url`, collapsing every failure into `None`.
    ///
    /// The failure is logged; callers treat a missing document as "skip this
    /// page" and carry on.
    pub async fn fetch(&self, url: &str) -> Option<Html> {
        match self.fetch_document(url).await {
            Ok(document) => Some(document),
            Err(e) => {
                tracing::warn!(url, error = %e, "page fetch failed; skipping");
                None
            }
        }
    }
}

/// Resolves `href` (absolute or relative) against `base`.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] if `base` is not an absolute URL or
/// the join fails.
pub fn resolve_url(base: &str, href: &str) -> Result<String, ScraperError> {
    let base_url = Url::parse(base).map_err(|e| ScraperError::InvalidUrl {
        url: base.to_owned(),
        reason: e.to_string(),
    })?;
    let joined = base_url
        .join(href.trim())
        .map_err(|e| ScraperError::InvalidUrl {
            url: href.to_owned(),
            reason: e.to_string(),
        })?;
    Ok(joined.to_string())
}
