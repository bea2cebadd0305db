use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use lectio::domain::config::ApiConfig;
use serde_json::Value;
use tower::ServiceExt;

fn app() -> Router {
    let state = lectio::init(&ApiConfig::default()).expect("sample corpus should seed");
    lectio_server::app(state)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_reports_up() {
    let (status, body) = get(app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "up");
}

#[tokio::test]
async fn text_renders_a_passage() {
    let (status, body) = get(app(), "/bible/text/KJV/John%203:3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["osisId"], "John.3.3");
    let html = body["html"].as_str().unwrap();
    assert!(html.contains(r#"class="passage""#));
    assert!(html.contains(r#"<span class="verse">3</span>"#));
}

#[tokio::test]
async fn text_responses_are_cacheable() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/bible/text/KJV/Gen%201")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cache_control = response.headers().get(header::CACHE_CONTROL).unwrap();
    assert!(cache_control.to_str().unwrap().starts_with("public, max-age="));
}

#[tokio::test]
async fn unknown_module_is_not_found() {
    let (status, body) = get(app(), "/bible/text/NOPE/John%203:3").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "MODULE_NOT_FOUND");
}

#[tokio::test]
async fn unresolvable_reference_is_not_found() {
    let (status, body) = get(app(), "/bible/text/KJV/Foobar%2099").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NO_SUCH_KEY");
}

#[tokio::test]
async fn verses_rejects_malformed_ordinals() {
    let (status, body) = get(app(), "/bible/verses/KJV/abc/2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn verses_renders_an_ordinal_range() {
    let (status, body) = get(app(), "/bible/verses/KJV/1/3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["startOrdinal"], 1);
    assert_eq!(body["endOrdinal"], 3);
    assert!(body["html"].as_str().unwrap().contains("Let there be light"));
}

#[tokio::test]
async fn versions_lists_bibles_by_default() {
    let (status, body) = get(app(), "/bible/versions").await;
    assert_eq!(status, StatusCode::OK);
    let versions = body.as_array().unwrap();
    assert!(versions.iter().any(|v| v["initials"] == "KJV"));
    assert!(versions.iter().all(|v| v["category"] == "BIBLE"));

    let (_, all) = get(app(), "/bible/versions?all=true").await;
    assert!(all.as_array().unwrap().len() >= versions.len());
}

#[tokio::test]
async fn features_requires_a_version() {
    let (status, body) = get(app(), "/bible/features").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");

    let (status, body) = get(app(), "/bible/features?version=KJV").await;
    assert_eq!(status, StatusCode::OK);
    let features = body.as_array().unwrap();
    assert!(features.iter().any(|f| f == "VERSE_NUMBERS"));
}

#[tokio::test]
async fn feature_registry_is_enriched() {
    let (status, body) = get(app(), "/bible/features/all").await;
    assert_eq!(status, StatusCode::OK);
    let verse_numbers = body
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["feature"] == "VERSE_NUMBERS")
        .expect("registry lists verse numbers");
    assert_eq!(verse_numbers["defaultEnabled"], true);
    assert_eq!(verse_numbers["displayName"], "Verse numbers");
}

#[tokio::test]
async fn books_lookahead_filters_by_prefix() {
    let (status, body) = get(app(), "/bible/books/KJV?prefix=ge").await;
    assert_eq!(status, StatusCode::OK);
    let books = body.as_array().unwrap();
    assert!(books.iter().any(|b| b["osis"] == "Gen"));
}

#[tokio::test]
async fn chapter_navigation_round_trips() {
    let (status, body) = get(app(), "/bible/chapter/next/KJV/John%202").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["osisId"], "John.3");

    let (status, body) = get(app(), "/bible/chapter/sideways/KJV/John%202").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");

    let (status, body) = get(app(), "/bible/chapter/expand/KJV/John%203:2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["osisId"], "John.3");
}

#[tokio::test]
async fn key_info_converts_between_versifications() {
    let (status, body) = get(app(), "/bible/key/KJV/John%203:3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["osisId"], "John.3.3");
    assert!(body["startOrdinal"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn plain_text_strips_markup() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/bible/plain/KJV/Gen%201:3")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert_eq!(text, "And God said, Let there be light: and there was light.");
    assert!(!text.contains('<'));
}
