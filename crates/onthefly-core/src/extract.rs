use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::models::MetaFields;

/// Which [`MetaFields`] member a pattern list feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Description,
    ImageUrl,
    Url,
}

/// Ordered fallback patterns per field, tried in priority order.
/// The first pattern that matches wins and later ones are never
/// consulted for that field; fields are independent of each other.
static FIELD_PATTERNS: LazyLock<Vec<(Field, Vec<Regex>)>> = LazyLock::new(|| {
    vec![
        (
            Field::Title,
            vec![
                regex(r"<title>(.*?)</title>"),
                regex(r#"<meta[^>]*property="og:title"[^>]*content="([^"]*)""#),
                regex(r#"<meta[^>]*name="twitter:title"[^>]*content="([^"]*)""#),
            ],
        ),
        (
            Field::Description,
            vec![
                regex(r#"<meta[^>]*property="og:description"[^>]*content="([^"]*)""#),
                regex(r#"<meta[^>]*name="twitter:description"[^>]*content="([^"]*)""#),
                regex(r#"<meta[^>]*name="description"[^>]*content="([^"]*)""#),
            ],
        ),
        (
            Field::ImageUrl,
            vec![
                regex(r#"<meta[^>]*property="og:image"[^>]*content="([^"]*)""#),
                regex(r#"<meta[^>]*name="twitter:image"[^>]*content="([^"]*)""#),
            ],
        ),
        (
            Field::Url,
            vec![regex(r#"<meta[^>]*property="og:url"[^>]*content="([^"]*)""#)],
        ),
    ]
});

static IMG_SRC: LazyLock<Regex> =
    LazyLock::new(|| regex(r#"<img[^>]*src=["']([^"']+)["']"#));

fn regex(pattern: &str) -> Regex {
    // Patterns are compile-time constants; a failure here is a bug.
    Regex::new(&format!("(?i){pattern}")).expect("invalid metadata pattern")
}

/// Extract page metadata from raw (possibly malformed or truncated)
/// HTML. Pure function over text: no I/O and no failure path; fields
/// with no matching pattern stay empty.
pub fn extract(html: &str, base_url: &str) -> MetaFields {
    let mut fields = MetaFields::default();

    for (field, patterns) in FIELD_PATTERNS.iter() {
        for pattern in patterns {
            if let Some(captures) = pattern.captures(html) {
                let value = captures[1].to_string();
                match field {
                    Field::Title => fields.title = value,
                    Field::Description => fields.description = value,
                    Field::ImageUrl => fields.image_url = value,
                    Field::Url => fields.url = value,
                }
                break;
            }
        }
    }

    if fields.image_url.is_empty()
        && let Some(found) = scan_image_tags(html, base_url)
    {
        fields.image_url = found;
    }

    fields
}

/// Fallback scan over `<img>` tags in document order: resolve each
/// `src` against the page URL, accept the first that looks like an
/// actual content photo (jpg/png/jpeg, not a logo or icon).
fn scan_image_tags(html: &str, base_url: &str) -> Option<String> {
    let base = Url::parse(base_url).ok()?;

    for captures in IMG_SRC.captures_iter(html) {
        let src = &captures[1];
        let Ok(resolved) = base.join(src) else {
            continue;
        };

        if is_acceptable_image(&resolved) {
            return Some(resolved.into());
        }
    }

    None
}

fn is_acceptable_image(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    let has_photo_extension =
        path.ends_with(".jpg") || path.ends_with(".png") || path.ends_with(".jpeg");

    let full = url.as_str().to_ascii_lowercase();
    has_photo_extension && !full.contains("logo") && !full.contains("icon")
}
