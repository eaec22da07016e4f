use crate::error::AppError;

/// Process-wide configuration, constructed once at startup.
///
/// Maps the original deployment's module-level constants (cache name,
/// asset version, origins, TTLs) onto env-driven settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Logical name of the edge cache this deployment writes to.
    pub cache_name: String,
    /// Logical version of the static assets; bumping it changes every
    /// asset cache key and invalidates the entry document eagerly.
    pub asset_version: String,
    /// Origin the static assets are fetched from, no trailing slash.
    pub asset_origin: String,
    /// Public origin this deployment serves under, no trailing slash.
    /// Embedded upstream references in HTML assets are rewritten to it.
    pub public_origin: String,
    /// Max-age for cached assets, in seconds.
    pub assets_ttl_secs: u64,
    /// Max-age for cached rendered pages, in seconds.
    pub pages_ttl_secs: u64,
    /// Path of the scrape endpoint injected into the entry document.
    pub scrape_endpoint: String,
}

const DEFAULT_ASSET_VERSION: &str = "1.1.4";
const DEFAULT_TTL_SECS: u64 = 60 * 60 * 24; // 24 hours

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_name: "onthefly-cache".to_string(),
            asset_version: DEFAULT_ASSET_VERSION.to_string(),
            asset_origin: "https://compress-to-url.dobuki.net/example".to_string(),
            public_origin: "https://onthefly.dobuki.net".to_string(),
            assets_ttl_secs: DEFAULT_TTL_SECS,
            pages_ttl_secs: DEFAULT_TTL_SECS,
            scrape_endpoint: "/scrape".to_string(),
        }
    }
}

impl AppConfig {
    /// Read configuration from environment variables.
    ///
    /// All variables are optional and fall back to the defaults above:
    /// `ONTHEFLY_CACHE_NAME`, `ONTHEFLY_ASSET_VERSION`,
    /// `ONTHEFLY_ASSET_ORIGIN`, `ONTHEFLY_PUBLIC_ORIGIN`,
    /// `ONTHEFLY_ASSETS_TTL_SECS`, `ONTHEFLY_PAGES_TTL_SECS`.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let cache_name =
            std::env::var("ONTHEFLY_CACHE_NAME").unwrap_or(defaults.cache_name);
        let asset_version =
            std::env::var("ONTHEFLY_ASSET_VERSION").unwrap_or(defaults.asset_version);
        let asset_origin = std::env::var("ONTHEFLY_ASSET_ORIGIN")
            .unwrap_or(defaults.asset_origin)
            .trim_end_matches('/')
            .to_string();
        let public_origin = std::env::var("ONTHEFLY_PUBLIC_ORIGIN")
            .unwrap_or(defaults.public_origin)
            .trim_end_matches('/')
            .to_string();

        let assets_ttl_secs = parse_ttl("ONTHEFLY_ASSETS_TTL_SECS", defaults.assets_ttl_secs)?;
        let pages_ttl_secs = parse_ttl("ONTHEFLY_PAGES_TTL_SECS", defaults.pages_ttl_secs)?;

        Ok(Self {
            cache_name,
            asset_version,
            asset_origin,
            public_origin,
            assets_ttl_secs,
            pages_ttl_secs,
            scrape_endpoint: defaults.scrape_endpoint,
        })
    }

    /// Full origin URL (with version query) for an asset path.
    pub fn asset_url(&self, path: &str) -> String {
        format!(
            "{}/{}?v={}",
            self.asset_origin,
            path.trim_start_matches('/'),
            self.asset_version
        )
    }
}

fn parse_ttl(var: &str, default: u64) -> Result<u64, AppError> {
    match std::env::var(var) {
        Err(_) => Ok(default),
        Ok(raw) => {
            let parsed: u64 = raw.parse().map_err(|_| {
                AppError::ConfigError(format!(
                    "Invalid {var} '{raw}': must be a non-negative integer"
                ))
            })?;
            if parsed == 0 {
                return Err(AppError::ConfigError(format!("{var} must be at least 1")));
            }
            Ok(parsed)
        }
    }
}
