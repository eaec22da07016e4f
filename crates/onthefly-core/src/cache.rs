use std::time::{Duration, Instant};

use moka::future::Cache;

use crate::error::AppError;
use crate::models::CachedResponse;
use crate::traits::CacheStore;

const DEFAULT_CAPACITY: u64 = 10_000;

/// Per-entry expiry driven by the entry's own Cache-Control max-age.
struct MaxAgeExpiry;

impl moka::Expiry<String, CachedResponse> for MaxAgeExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedResponse,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(Duration::from_secs(value.max_age_secs))
    }
}

/// In-process edge cache store backed by moka.
///
/// Stands in for the platform's key-value edge cache: opened by name,
/// entries expire after their own max-age, and concurrent writers for
/// the same key resolve last-write-wins.
#[derive(Clone)]
pub struct MokaStore {
    name: String,
    cache: Cache<String, CachedResponse>,
}

impl MokaStore {
    pub fn open(name: impl Into<String>) -> Self {
        Self::with_capacity(name, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(name: impl Into<String>, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(MaxAgeExpiry)
            .build();
        Self {
            name: name.into(),
            cache,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl CacheStore for MokaStore {
    async fn get(&self, key: &str) -> Result<Option<CachedResponse>, AppError> {
        Ok(self.cache.get(key).await)
    }

    async fn put(&self, key: &str, entry: CachedResponse) -> Result<(), AppError> {
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.cache.invalidate(key).await;
        Ok(())
    }
}
