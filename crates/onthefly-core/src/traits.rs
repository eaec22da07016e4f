use std::future::Future;

use crate::error::AppError;
use crate::models::CachedResponse;

/// Fetches a page body from a URL.
///
/// A successful result is the (possibly salvaged, see the client
/// crate's streaming reader) response body; non-success statuses
/// surface as [`AppError::FetchFailed`] so callers can classify them.
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Encodes page content to an opaque URL-safe payload and back.
///
/// Consumed as a black box: the renderer only relies on
/// `decode(encode(x)) == x` and on decode failures being
/// [`AppError::DecodeError`].
pub trait Codec: Send + Sync + Clone {
    fn encode(&self, content: &str) -> Result<String, AppError>;
    fn decode(&self, payload: &str) -> Result<String, AppError>;
}

/// Key-value edge cache collaborator.
///
/// Reads and writes are not transactional; two concurrent misses for
/// the same key may both write, and last-write-wins is acceptable
/// because cached content is derived deterministically from the same
/// origin fetch.
pub trait CacheStore: Send + Sync + Clone {
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<CachedResponse>, AppError>> + Send;

    fn put(
        &self,
        key: &str,
        entry: CachedResponse,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    fn delete(&self, key: &str) -> impl Future<Output = Result<(), AppError>> + Send;
}
