use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use onthefly_client::UrlCodec;
use onthefly_core::traits::Codec;

use crate::common::{body_string, setup_test_app};

// No asset fetch happens in these tests unless a mock origin is given
const UNUSED_ORIGIN: &str = "http://origin.invalid";

#[tokio::test]
async fn health_returns_200() {
    let app = setup_test_app(UNUSED_ORIGIN);

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["status"], "healthy");
}

// ---------------------------------------------------------------------------
// Scrape
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scrape_without_url_returns_400() {
    let app = setup_test_app(UNUSED_ORIGIN);

    let response = app
        .oneshot(Request::get("/scrape").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(json["error"].as_str().unwrap().contains("url"));
}

#[tokio::test]
async fn scrape_extracts_metadata_from_target() {
    let target = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head>
                <title>An Article</title>
                <meta property="og:description" content="Worth reading">
                <meta property="og:image" content="https://cdn.example.com/cover.png">
                <meta property="og:url" content="https://example.com/article">
            </head></html>"#,
        ))
        .mount(&target)
        .await;

    let app = setup_test_app(UNUSED_ORIGIN);
    let response = app
        .oneshot(
            Request::get(format!("/scrape?url={}/article", target.uri()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["title"], "An Article");
    assert_eq!(json["description"], "Worth reading");
    assert_eq!(json["image_url"], "https://cdn.example.com/cover.png");
    assert_eq!(json["url"], "https://example.com/article");
}

#[tokio::test]
async fn scrape_of_missing_target_returns_500_without_retrying() {
    let target = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1) // permanent: exactly one attempt
        .mount(&target)
        .await;

    let app = setup_test_app(UNUSED_ORIGIN);
    let response = app
        .oneshot(
            Request::get(format!("/scrape?url={}/gone", target.uri()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(json["error"].as_str().unwrap().contains("404"));
}

// ---------------------------------------------------------------------------
// Page rendering
// ---------------------------------------------------------------------------

#[tokio::test]
async fn u_param_renders_annotated_page() {
    let payload = UrlCodec::new()
        .encode("<html><body><h1>Hello</h1></body></html>")
        .unwrap();

    let app = setup_test_app(UNUSED_ORIGIN);
    let response = app
        .oneshot(
            Request::get(format!("/?u={payload}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "text/html"
    );
    let html = body_string(response).await;
    assert!(html.contains("<h1>Hello</h1>"));
    assert!(html.contains("generated on the fly"));
    assert!(html.contains("edit=1"));
}

#[tokio::test]
async fn edit_mode_renders_without_caching() {
    let payload = UrlCodec::new()
        .encode("<html><body>editable</body></html>")
        .unwrap();

    let app = setup_test_app(UNUSED_ORIGIN);
    let response = app
        .oneshot(
            Request::get(format!("/?u={payload}&edit=1"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["cache-control"].to_str().unwrap(),
        "max-age=0"
    );
    assert!(body_string(response).await.contains("editable"));
}

#[tokio::test]
async fn invalid_payload_renders_plaintext_500() {
    let app = setup_test_app(UNUSED_ORIGIN);
    let response = app
        .oneshot(Request::get("/?u=!!!").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "text/plain"
    );
    assert!(body_string(response).await.starts_with("Error:"));
}

// ---------------------------------------------------------------------------
// Decompress endpoint
// ---------------------------------------------------------------------------

#[tokio::test]
async fn decompress_returns_rendered_html() {
    let payload = UrlCodec::new()
        .encode("<html><body>posted</body></html>")
        .unwrap();

    let app = setup_test_app(UNUSED_ORIGIN);
    let response = app
        .oneshot(
            Request::post("/decompress")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "payload": payload }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("posted"));
}

#[tokio::test]
async fn decompress_rejects_non_string_payload() {
    let app = setup_test_app(UNUSED_ORIGIN);
    let response = app
        .oneshot(
            Request::post("/decompress")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"payload": 42}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(json["error"].as_str().unwrap().contains("string"));
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stylesheet_is_served_and_cached() {
    let origin = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/styles.css"))
        .and(query_param("v", "1.1.4"))
        .respond_with(ResponseTemplate::new(200).set_body_string("body { margin: 0 }"))
        .expect(1) // second request must come from the cache
        .mount(&origin)
        .await;

    let app = setup_test_app(&origin.uri());
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(Request::get("/styles.css").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"].to_str().unwrap(),
            "text/css"
        );
        assert_eq!(body_string(response).await, "body { margin: 0 }");
    }
}

#[tokio::test]
async fn entry_document_is_rewritten_for_serving() {
    let origin = MockServer::start().await;
    let html = format!(
        concat!(
            "<html><head><link href=\"styles.css\"></head>",
            "<body><script src=\"dist/index.js\"></script>",
            "<a href=\"{}/about\">about</a></body></html>"
        ),
        origin.uri()
    );
    Mock::given(method("GET"))
        .and(path("/index.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(&origin)
        .await;

    let app = setup_test_app(&origin.uri());
    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains(r#"href="/styles.css""#));
    assert!(body.contains(r#"src="/dist/index.js""#));
    assert!(body.contains("https://onthefly.test/about"));
    assert!(body.contains("window.SCRAPER_URL = '/scrape';"));
}

#[tokio::test]
async fn missing_asset_returns_placeholder_404() {
    let origin = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dist/index.js"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&origin)
        .await;

    let app = setup_test_app(&origin.uri());
    let response = app
        .oneshot(Request::get("/dist/index.js").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(response).await, "Asset not found");
}

#[tokio::test]
async fn unknown_path_is_404() {
    let app = setup_test_app(UNUSED_ORIGIN);
    let response = app
        .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(response).await, "Not Found");
}
