use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use url::Url;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use onthefly_core::AppError;
use onthefly_core::models::CachedResponse;

use crate::dto::{DecompressRequest, HealthResponse, ScrapeQuery, ScrapeResponse};
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Build the full router.
///
/// The JSON endpoints get real routes; everything else goes through
/// the [`dispatch`] fallback, which owns the original worker's
/// conditional dispatch: `u=` payloads render pages, a handful of
/// known paths serve versioned assets, the rest is 404.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/scrape", get(scrape))
        .route("/decompress", post(decompress))
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(get(dispatch))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Scrape
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/scrape",
    params(ScrapeQuery),
    responses(
        (status = 200, description = "Extracted page metadata", body = ScrapeResponse),
        (status = 400, description = "Missing url parameter", body = crate::dto::ErrorResponse),
        (status = 500, description = "Fetch/stream/parse failure", body = crate::dto::ErrorResponse),
    ),
    tag = "scrape"
)]
pub async fn scrape(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ScrapeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let target = query
        .url
        .ok_or_else(|| AppError::MissingParameter("url".to_string()))?;

    let fields = state.scraper.scrape(&target).await?;

    Ok(axum::Json(ScrapeResponse::from(fields)))
}

// ---------------------------------------------------------------------------
// Decompression
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/decompress",
    request_body = DecompressRequest,
    responses(
        (status = 200, description = "Rendered HTML", content_type = "text/html"),
        (status = 400, description = "Payload missing or not a string", body = crate::dto::ErrorResponse),
        (status = 500, description = "Codec rejected the payload", body = crate::dto::ErrorResponse),
    ),
    tag = "pages"
)]
pub async fn decompress(
    State(state): State<Arc<AppState>>,
    axum::Json(body): axum::Json<DecompressRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = body.payload.as_str().ok_or_else(|| {
        AppError::InvalidPayload("payload must be a string".to_string())
    })?;

    let request_url = public_request_url(state.as_ref(), "/", None)?;
    let page = state.pages.get_or_render(payload, &request_url).await?;

    Ok(respond(page))
}

// ---------------------------------------------------------------------------
// Page / asset dispatch
// ---------------------------------------------------------------------------

/// Fallback handler: plain conditional dispatch over the request path
/// and query, mirroring the original edge worker.
pub async fn dispatch(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let edit_mode = params.get("edit").is_some_and(|v| v == "1");

    if let Some(payload) = params.get("u") {
        return render_page(&state, &uri, payload, edit_mode).await;
    }

    let asset_path = match uri.path() {
        "/dist/index.js" => "dist/index.js",
        "/styles.css" => "styles.css",
        "/" | "/index.html" => "index.html",
        _ => {
            return (
                StatusCode::NOT_FOUND,
                [(header::CONTENT_TYPE, "text/plain")],
                "Not Found",
            )
                .into_response();
        }
    };

    match state.assets.get_asset(asset_path, edit_mode).await {
        Ok(asset) => respond(asset),
        Err(err) => {
            tracing::error!(path = asset_path, error = %err, "Asset fetch failed");
            ApiError(err).into_response()
        }
    }
}

/// Render a `u=` payload. Edit mode bypasses the page cache in both
/// directions; failures come back as the original's plain-text 500.
async fn render_page(state: &AppState, uri: &Uri, payload: &str, edit_mode: bool) -> Response {
    let result: Result<CachedResponse, AppError> = async {
        let request_url = public_request_url(state, uri.path(), uri.query())?;
        if edit_mode {
            let html = state.pages.render_live(payload, &request_url)?;
            Ok(CachedResponse::new(html, "text/html", 0))
        } else {
            state.pages.get_or_render(payload, &request_url).await
        }
    }
    .await;

    match result {
        Ok(page) => respond(page),
        Err(err) => {
            tracing::error!(error = %err, "Page render failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain")],
                format!("Error: {err}"),
            )
                .into_response()
        }
    }
}

/// Absolute URL of this request as seen under the public origin; the
/// renderer derives the edit link from it.
fn public_request_url(state: &AppState, path: &str, query: Option<&str>) -> Result<Url, AppError> {
    let mut url = Url::parse(&state.config.public_origin)
        .map_err(|e| AppError::ConfigError(format!("invalid public origin: {e}")))?;
    url.set_path(path);
    url.set_query(query);
    Ok(url)
}

/// Turn a cached/rendered response into HTTP, carrying its own
/// Cache-Control max-age.
fn respond(entry: CachedResponse) -> Response {
    let status = StatusCode::from_u16(entry.status).unwrap_or(StatusCode::OK);
    (
        status,
        [
            (header::CONTENT_TYPE, entry.mime_type),
            (
                header::CACHE_CONTROL,
                format!("max-age={}", entry.max_age_secs),
            ),
        ],
        entry.body,
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse)),
    tag = "system"
)]
pub async fn health() -> impl IntoResponse {
    axum::Json(HealthResponse { status: "healthy" })
}
