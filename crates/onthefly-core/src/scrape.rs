use crate::error::AppError;
use crate::extract;
use crate::models::MetaFields;
use crate::retry::{RetryPolicy, fetch_with_retry};
use crate::traits::Fetcher;

/// Orchestrates the scrape pipeline: fetch (with retry) → extract.
///
/// Generic over the fetcher via its trait, enabling dependency
/// injection and testability without real HTTP calls. Errors
/// propagate to the HTTP boundary, which converts every one of them
/// into a structured error response; nothing here panics or escapes
/// unconverted.
pub struct ScrapeService<F: Fetcher> {
    fetcher: F,
    policy: RetryPolicy,
}

impl<F: Fetcher> ScrapeService<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(fetcher: F, policy: RetryPolicy) -> Self {
        Self { fetcher, policy }
    }

    /// Fetch the target page and extract its metadata.
    pub async fn scrape(&self, url: &str) -> Result<MetaFields, AppError> {
        tracing::info!(%url, "Scraping");
        let html = fetch_with_retry(&self.fetcher, url, &self.policy).await?;
        tracing::info!(bytes = html.len(), "Fetched page body");

        let fields = extract::extract(&html, url);
        tracing::info!(
            title = %fields.title,
            has_image = !fields.image_url.is_empty(),
            "Extraction complete"
        );

        Ok(fields)
    }
}
