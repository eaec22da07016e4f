pub mod assets;
pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod render;
pub mod retry;
pub mod scrape;
pub mod traits;

#[cfg(test)]
pub mod testutil;

pub use assets::AssetService;
pub use cache::MokaStore;
pub use config::AppConfig;
pub use error::AppError;
pub use models::{CachedResponse, MetaFields, compute_hash};
pub use render::{PageCache, Renderer};
pub use retry::{RetryPolicy, fetch_with_retry};
pub use scrape::ScrapeService;
pub use traits::{CacheStore, Codec, Fetcher};
