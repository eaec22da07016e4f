use onthefly_client::{ReqwestFetcher, UrlCodec};
use onthefly_core::{
    AppConfig, AppError, AssetService, MokaStore, PageCache, Renderer, ScrapeService,
};

/// Shared application state, available to all route handlers via
/// `State<Arc<AppState>>`.
pub struct AppState {
    pub config: AppConfig,
    pub scraper: ScrapeService<ReqwestFetcher>,
    pub assets: AssetService<ReqwestFetcher, MokaStore>,
    pub pages: PageCache<UrlCodec, MokaStore>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        Self::with_fetcher(config, ReqwestFetcher::new()?)
    }

    /// Build state around a specific fetcher (tests point it at a
    /// local mock origin with the SSRF guard disabled).
    pub fn with_fetcher(config: AppConfig, fetcher: ReqwestFetcher) -> Result<Self, AppError> {
        let store = MokaStore::open(&config.cache_name);
        let renderer = Renderer::new(UrlCodec::new(), &config.public_origin);

        Ok(Self {
            scraper: ScrapeService::new(fetcher.clone()),
            assets: AssetService::new(fetcher, store.clone(), config.clone()),
            pages: PageCache::new(renderer, store, config.pages_ttl_secs),
            config,
        })
    }
}
