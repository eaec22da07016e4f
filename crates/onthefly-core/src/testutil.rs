//! Test utilities: mock implementations of the core traits.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::AppError;
use crate::models::CachedResponse;
use crate::traits::{CacheStore, Codec, Fetcher};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Mock fetcher that returns a configurable response queue and counts
/// calls, so retry tests can assert exact attempt numbers.
#[derive(Clone)]
pub struct MockFetcher {
    /// Queue of responses. Each call pops the first element.
    /// If empty, the last configured success (or a default page) repeats.
    responses: Arc<Mutex<Vec<Result<String, AppError>>>>,
    calls: Arc<Mutex<u32>>,
}

impl MockFetcher {
    pub fn new(body: &str) -> Self {
        Self::with_responses(vec![Ok(body.to_string())])
    }

    pub fn with_error(error: AppError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<String, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Number of fetches performed so far.
    pub fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, _url: &str) -> Result<String, AppError> {
        *self.calls.lock().unwrap() += 1;
        let mut responses = self.responses.lock().unwrap();
        if responses.len() > 1 {
            responses.remove(0)
        } else if let Some(last) = responses.first() {
            match last {
                Ok(body) => Ok(body.clone()),
                Err(_) => responses.remove(0),
            }
        } else {
            Ok("<html><body>default</body></html>".to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// MockCodec
// ---------------------------------------------------------------------------

/// Mock codec. Passthrough mode maps content to itself in both
/// directions; error mode fails every decode.
#[derive(Clone)]
pub struct MockCodec {
    error: Arc<Mutex<Option<AppError>>>,
    decode_calls: Arc<Mutex<u32>>,
}

impl MockCodec {
    pub fn passthrough() -> Self {
        Self {
            error: Arc::new(Mutex::new(None)),
            decode_calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_error(error: AppError) -> Self {
        Self {
            error: Arc::new(Mutex::new(Some(error))),
            decode_calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn decode_calls(&self) -> u32 {
        *self.decode_calls.lock().unwrap()
    }
}

impl Codec for MockCodec {
    fn encode(&self, content: &str) -> Result<String, AppError> {
        Ok(content.to_string())
    }

    fn decode(&self, payload: &str) -> Result<String, AppError> {
        *self.decode_calls.lock().unwrap() += 1;
        let mut error = self.error.lock().unwrap();
        if let Some(err) = error.take() {
            return Err(err);
        }
        Ok(payload.to_string())
    }
}

// ---------------------------------------------------------------------------
// MemoryCache
// ---------------------------------------------------------------------------

/// In-memory CacheStore that records writes and deletes for
/// assertions (e.g. that edit-mode requests never write).
#[derive(Clone, Default)]
pub struct MemoryCache {
    entries: Arc<Mutex<HashMap<String, CachedResponse>>>,
    puts: Arc<Mutex<u32>>,
    deletes: Arc<Mutex<Vec<String>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate an entry without counting it as a put.
    pub async fn seed(&self, key: &str, entry: CachedResponse) {
        self.entries.lock().unwrap().insert(key.to_string(), entry);
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    pub fn put_count(&self) -> u32 {
        *self.puts.lock().unwrap()
    }

    pub fn deleted_keys(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }
}

impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<CachedResponse>, AppError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn put(&self, key: &str, entry: CachedResponse) -> Result<(), AppError> {
        *self.puts.lock().unwrap() += 1;
        self.entries.lock().unwrap().insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.deletes.lock().unwrap().push(key.to_string());
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
