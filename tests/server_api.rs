use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crunchbox_core::server;
use crunchbox_core::styler::StyleEngine;

fn app() -> axum::Router {
    let engine = Arc::new(StyleEngine::new().expect("catalog loads"));
    server::create_router(engine)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn categories_listing() {
    let response = app()
        .oneshot(Request::builder().uri("/api/categories").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let listing = body.as_object().unwrap();
    assert_eq!(listing.len(), 7);
    assert!(listing["mascot_theater"]["description"].is_string());
    assert!(listing["health_halo"]["mood_match"].is_array());
}

#[tokio::test]
async fn category_rules_roundtrip() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/categories/mascot_theater")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let rules = body_json(response).await;
    assert_eq!(rules["name"], "mascot_theater");
    assert_eq!(rules["core_intention"], "playful_commercialism");
    assert!(rules["subject_rules"]["human"]["treatment"].is_string());
}

#[tokio::test]
async fn unknown_category_is_404_with_alternatives() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/categories/vaporwave")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("vaporwave"));
    assert_eq!(body["available"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn parse_then_transform_then_assemble() {
    let response = app()
        .oneshot(post_json("/api/parse", json!({ "prompt": "a happy chef cooking soup" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let parsed = body_json(response).await;
    assert_eq!(parsed["subject"]["name"], "chef");
    assert!(parsed["semantic_weights"]["subject"].as_u64().unwrap() > 0);

    // Feed the parse result straight back through the pipeline endpoints.
    let components = json!({
        "subject": parsed["subject"],
        "action": parsed["action"],
        "setting": parsed["setting"],
        "objects": parsed["objects"],
        "colors": parsed["colors"],
        "mood": parsed["mood"],
    });

    let response = app()
        .oneshot(post_json(
            "/api/transform",
            json!({ "components": components, "category": "mascot_theater" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let transformed = body_json(response).await;
    assert!(transformed["subject"].as_str().unwrap().contains("cartoon mascot"));

    let response = app()
        .oneshot(post_json(
            "/api/assemble",
            json!({
                "transformed": transformed,
                "category": "mascot_theater",
                "semantic_weights": parsed["semantic_weights"],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let skeleton = body_json(response).await;
    assert_eq!(skeleton["metadata"]["category"], "mascot_theater");
    assert!(skeleton["metadata"]["estimated_tokens"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn refine_endpoint_updates_skeleton() {
    // Build a skeleton through the API first.
    let response = app()
        .oneshot(post_json("/api/parse", json!({ "prompt": "a happy chef cooking soup" })))
        .await
        .unwrap();
    let parsed = body_json(response).await;

    let response = app()
        .oneshot(post_json(
            "/api/variants",
            json!({
                "components": parsed,
                "category": "mascot_theater",
                "count": 1,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let variants = body_json(response).await;
    let skeleton = &variants[0]["skeleton"];

    let response = app()
        .oneshot(post_json(
            "/api/refine",
            json!({
                "skeleton": skeleton,
                "component": "subject",
                "value": "grinning cartoon chef",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let refined = body_json(response).await;
    assert_eq!(refined["sections"][0]["text"], "grinning cartoon chef");
    assert_eq!(refined["metadata"]["user_modifications"][0], "subject");

    // Refining a section that does not exist is rejected and names the
    // valid targets.
    let response = app()
        .oneshot(post_json(
            "/api/refine",
            json!({
                "skeleton": skeleton,
                "component": "soundtrack",
                "value": "jazz",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert!(body["available"].as_array().unwrap().iter().any(|v| v == "subject"));
}

#[tokio::test]
async fn invalid_variant_count_is_400() {
    let response = app()
        .oneshot(post_json("/api/parse", json!({ "prompt": "a dog" })))
        .await
        .unwrap();
    let parsed = body_json(response).await;

    let response = app()
        .oneshot(post_json(
            "/api/variants",
            json!({ "components": parsed, "category": "mascot_theater", "count": 6 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("between 1 and 5"));
}

#[tokio::test]
async fn suggest_endpoint_accepts_parse_output() {
    let response = app()
        .oneshot(post_json(
            "/api/parse",
            json!({ "prompt": "a happy cartoon dog playing in a fun park" }),
        ))
        .await
        .unwrap();
    let parsed = body_json(response).await;

    // The extra semantic_weights field from parse output is ignored.
    let response = app()
        .oneshot(post_json("/api/suggest", parsed))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let suggestion = body_json(response).await;
    assert_eq!(suggestion["primary"], "mascot_theater");
    assert_eq!(suggestion["alternatives"].as_array().unwrap().len(), 2);
    assert_eq!(suggestion["scores"].as_object().unwrap().len(), 7);
}

#[tokio::test]
async fn catalog_metadata_endpoint() {
    let response = app()
        .oneshot(Request::builder().uri("/api/catalog").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let meta = body_json(response).await;
    assert_eq!(meta["total_categories"], 7);
}
