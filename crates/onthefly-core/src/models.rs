use sha2::{Digest, Sha256};

/// Structured metadata extracted from a third-party page.
///
/// Absent fields default to the empty string rather than failing the
/// whole extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MetaFields {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub url: String,
}

/// A response body held in (or destined for) the edge cache.
///
/// Cached entries always carry status 200; the 404 placeholder for a
/// missing origin asset is returned to the caller but never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub status: u16,
    pub body: String,
    pub mime_type: String,
    /// Cache-Control max-age, in seconds.
    pub max_age_secs: u64,
}

impl CachedResponse {
    pub fn new(body: impl Into<String>, mime_type: &str, max_age_secs: u64) -> Self {
        Self {
            status: 200,
            body: body.into(),
            mime_type: mime_type.to_string(),
            max_age_secs,
        }
    }

    /// Placeholder for an asset the origin does not have.
    pub fn not_found(message: &str) -> Self {
        Self {
            status: 404,
            body: message.to_string(),
            mime_type: "text/plain".to_string(),
            max_age_secs: 0,
        }
    }
}

/// Compute a SHA-256 hash of a string, returned as 64-char hex.
///
/// Used to derive page-cache keys from payloads, bounding key length
/// and keeping payload structure out of cache introspection.
pub fn compute_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
