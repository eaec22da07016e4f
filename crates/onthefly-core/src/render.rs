use url::Url;

use crate::error::AppError;
use crate::models::{CachedResponse, compute_hash};
use crate::traits::{CacheStore, Codec};

/// Decodes an opaque page payload back into servable, annotated HTML.
///
/// The codec is a black box; this service owns document
/// normalization and the injected attribution/editor fragments.
pub struct Renderer<C: Codec> {
    codec: C,
    public_origin: String,
}

impl<C: Codec> Renderer<C> {
    pub fn new(codec: C, public_origin: impl Into<String>) -> Self {
        Self {
            codec,
            public_origin: public_origin.into(),
        }
    }

    /// Decode `payload` and produce the final HTML for `request_url`.
    pub fn render(&self, payload: &str, request_url: &Url) -> Result<String, AppError> {
        let decoded = self.codec.decode(payload)?;
        tracing::info!(bytes = decoded.len(), "Decoded payload");

        let html = normalize_document(&decoded);
        let edit_url = edit_url(request_url, payload);

        let banner = format!(
            "<div style=\"background: #aa3333; color: white; padding: 10px; margin: 0px; \
             text-align: center; font-size: 16px; font-weight: bold; width: 100%; \
             z-index: 1000; display: block!important; top: 0; left: 0;\">\
             This website is generated on the fly by \
             <a href=\"{origin}\" target=\"_blank\" style=\"color: #ffffff; \
             text-decoration: underline;\">{origin}</a></div>",
            origin = self.public_origin
        );

        let note = format!(
            "<div style=\"position: fixed; bottom: 10px; right: 10px; \
             background: rgba(0, 0, 0, 0.7); color: white; padding: 5px 10px; \
             border-radius: 3px; font-size: 12px; z-index: 1000;\">\
             Produced using <a href=\"{edit_url}\" target=\"_blank\" \
             style=\"color: #3498db; text-decoration: none;\">{origin}</a></div>",
            origin = self.public_origin
        );

        let html = html.replacen("<body>", &format!("<body>{banner}"), 1);
        let html = html.replacen("</body>", &format!("{note}</body>"), 1);

        Ok(html)
    }
}

/// Make sure the decoded document has matching open/close body tags:
/// bare content gets a minimal skeleton, an unclosed body gets its
/// closing tag appended before the closing html tag (or at the end
/// when there is none).
fn normalize_document(html: &str) -> String {
    if html.contains("</body>") {
        return html.to_string();
    }
    if !html.contains("<body>") {
        return format!("<!DOCTYPE html><html><body>{html}</body></html>");
    }
    if html.contains("</html>") {
        html.replacen("</html>", "</body></html>", 1)
    } else {
        format!("{html}</body></html>")
    }
}

/// Clone the request URL and point it at the live editor for the same
/// payload: `u=<payload>` and `edit=1`, replacing any existing values.
fn edit_url(request_url: &Url, payload: &str) -> Url {
    let retained: Vec<(String, String)> = request_url
        .query_pairs()
        .filter(|(key, _)| key != "u" && key != "edit")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = request_url.clone();
    url.set_query(None);
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        pairs.append_pair("u", payload);
        pairs.append_pair("edit", "1");
    }
    url
}

/// Content-hash-keyed cache in front of the renderer, for non-edit
/// requests only. The key is a digest of the payload, not the payload
/// itself, which bounds key length and keeps payload structure out of
/// cache introspection.
pub struct PageCache<C: Codec, S: CacheStore> {
    renderer: Renderer<C>,
    store: S,
    max_age_secs: u64,
}

impl<C: Codec, S: CacheStore> PageCache<C, S> {
    pub fn new(renderer: Renderer<C>, store: S, max_age_secs: u64) -> Self {
        Self {
            renderer,
            store,
            max_age_secs,
        }
    }

    pub fn cache_key(payload: &str) -> String {
        format!("page:{}", compute_hash(payload))
    }

    /// Serve a previously rendered page, or render and store it.
    pub async fn get_or_render(
        &self,
        payload: &str,
        request_url: &Url,
    ) -> Result<CachedResponse, AppError> {
        let key = Self::cache_key(payload);

        if let Some(hit) = self.store.get(&key).await? {
            tracing::info!("Page cache hit");
            return Ok(hit);
        }

        tracing::info!("Page cache miss, rendering");
        let html = self.renderer.render(payload, request_url)?;
        let response = CachedResponse::new(html, "text/html", self.max_age_secs);
        self.store.put(&key, response.clone()).await?;

        Ok(response)
    }

    /// Render without consulting or filling the cache (edit mode).
    pub fn render_live(&self, payload: &str, request_url: &Url) -> Result<String, AppError> {
        self.renderer.render(payload, request_url)
    }
}
