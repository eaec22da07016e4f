use url::Url;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::CachedResponse;
use crate::traits::{CacheStore, Fetcher};

/// The asset whose request signals a version bump: fetching it always
/// clears its own prior cache entry first, so a new deployment is
/// visible immediately rather than after TTL expiry.
const ENTRY_DOCUMENT: &str = "index.html";

/// Versioned, edit-mode-aware cache in front of the static asset
/// origin.
///
/// Cache keys are the full origin URL including the `?v=` version
/// parameter. Edit-mode requests bypass the cache in both directions:
/// they are never served from it and never written to it.
pub struct AssetService<F: Fetcher, S: CacheStore> {
    fetcher: F,
    store: S,
    config: AppConfig,
}

impl<F: Fetcher, S: CacheStore> AssetService<F, S> {
    pub fn new(fetcher: F, store: S, config: AppConfig) -> Self {
        Self {
            fetcher,
            store,
            config,
        }
    }

    /// Fetch an asset, serving from cache when possible.
    ///
    /// Origin non-success statuses are not errors here: they come back
    /// as a 404 placeholder response. Transport failures propagate.
    pub async fn get_asset(
        &self,
        path: &str,
        edit_mode: bool,
    ) -> Result<CachedResponse, AppError> {
        let path = path.trim_start_matches('/');
        let key = self.config.asset_url(path);

        if !edit_mode
            && let Some(hit) = self.store.get(&key).await?
        {
            tracing::info!(%path, "Asset cache hit");
            return Ok(hit);
        }

        tracing::info!(%path, %edit_mode, "Asset cache miss, fetching from origin");

        if path == ENTRY_DOCUMENT {
            self.store.delete(&key).await?;
            tracing::info!(%path, "Cleared entry document cache key");
        }

        let content = match self.fetcher.fetch(&key).await {
            Ok(body) => body,
            Err(AppError::FetchFailed { status }) => {
                tracing::warn!(%path, status, "Origin does not have asset");
                return Ok(CachedResponse::not_found("Asset not found"));
            }
            Err(err) => return Err(err),
        };

        let mime_type = mime_for_path(path);
        let content = if mime_type == "text/html" {
            self.transform_html(&content)
        } else {
            content
        };

        let response = CachedResponse::new(content, mime_type, self.config.assets_ttl_secs);

        if !edit_mode {
            self.store.put(&key, response.clone()).await?;
        }

        Ok(response)
    }

    /// Rewrite an HTML asset for serving from this deployment:
    /// root the relative script/stylesheet references, point embedded
    /// upstream-origin URLs at the public origin, and expose the
    /// scrape endpoint to client code before the closing head tag.
    fn transform_html(&self, content: &str) -> String {
        let mut content = content
            .replacen(r#"src="dist/index.js""#, r#"src="/dist/index.js""#, 1)
            .replacen(r#"href="styles.css""#, r#"href="/styles.css""#, 1);

        if let Some(upstream) = origin_of(&self.config.asset_origin) {
            content = content.replace(&upstream, &self.config.public_origin);
        }

        let injected = format!(
            "<script type='text/javascript'>window.SCRAPER_URL = '{}';</script></head>",
            self.config.scrape_endpoint
        );
        content.replacen("</head>", &injected, 1)
    }
}

/// MIME type by file extension; anything unrecognized is plain text.
fn mime_for_path(path: &str) -> &'static str {
    if path.ends_with(".js") {
        "application/javascript"
    } else if path.ends_with(".css") {
        "text/css"
    } else if path.ends_with(".html") {
        "text/html"
    } else {
        "text/plain"
    }
}

/// Scheme + host part of a URL, without any path.
fn origin_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(match parsed.port() {
        Some(port) => format!("{}://{host}:{port}", parsed.scheme()),
        None => format!("{}://{host}", parsed.scheme()),
    })
}
