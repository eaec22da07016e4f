use serde::{Deserialize, Serialize};

use onthefly_core::MetaFields;

// ---------------------------------------------------------------------------
// Scrape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ScrapeQuery {
    /// Third-party page to extract link-preview metadata from.
    pub url: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ScrapeResponse {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub url: String,
}

impl From<MetaFields> for ScrapeResponse {
    fn from(fields: MetaFields) -> Self {
        Self {
            title: fields.title,
            description: fields.description,
            image_url: fields.image_url,
            url: fields.url,
        }
    }
}

// ---------------------------------------------------------------------------
// Decompression
// ---------------------------------------------------------------------------

/// The payload arrives as arbitrary JSON so a non-string value can be
/// rejected with the documented 400 shape instead of a serde 422.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct DecompressRequest {
    pub payload: serde_json::Value,
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
