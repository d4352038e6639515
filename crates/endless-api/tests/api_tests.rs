//! Integration tests for the REST endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server, against the in-memory store and a scripted
//! inference backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use endless_api::build_router;
use endless_worldgen::InferenceError;
use serde_json::{Value, json};
use tower::ServiceExt;

use common::{fenced_reply, harness, refusing_harness, world};

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// =========================================================================
// Maps
// =========================================================================

#[tokio::test]
async fn test_generate_map_stores_and_returns_payload() {
    let h = harness(Ok(fenced_reply(40)));
    let router = build_router(h.state.clone());

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/maps/generate",
            &json!({"theme": "volcano", "description": "rivers of lava", "mapId": "map_volcano"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["mapId"], "map_volcano");
    assert_eq!(json["mapData"]["mapArray"].as_array().unwrap().len(), 40);

    let stored = router
        .oneshot(Request::get("/maps/map_volcano").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(stored.status(), StatusCode::OK);
    let json = body_to_json(stored.into_body()).await;
    assert_eq!(json["mapData"]["version"], "latest");
    assert_eq!(json["mapData"]["createdBy"], "AI");
    assert_eq!(json["mapData"]["metadata"]["kind"], "generated");
    assert_eq!(json["mapData"]["metadata"]["theme"], "volcano");
    assert_eq!(json["mapData"]["metadata"]["description"], "rivers of lava");
}

#[tokio::test]
async fn test_generate_map_defaults_theme_and_mints_id() {
    let h = harness(Ok(fenced_reply(40)));
    let router = build_router(h.state.clone());

    let response = router
        .clone()
        .oneshot(json_request("POST", "/maps/generate", &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    let map_id = json["mapId"].as_str().unwrap().to_owned();
    assert!(map_id.starts_with("map_"));

    let stored = router
        .oneshot(Request::get(format!("/maps/{map_id}")).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_to_json(stored.into_body()).await;
    assert_eq!(json["mapData"]["metadata"]["theme"], "fantasy");
}

#[tokio::test]
async fn test_generate_map_rejects_short_grid_and_stores_nothing() {
    let h = harness(Ok(fenced_reply(39)));
    let router = build_router(h.state.clone());

    let response = router
        .oneshot(json_request("POST", "/maps/generate", &json!({"theme": "volcano"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["kind"], "ValidationError");
    assert!(json["error"].as_str().unwrap().contains("got=39"));
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn test_generate_map_surfaces_inference_failure_without_retry() {
    let h = harness(Err(InferenceError("service unavailable".to_owned())));
    let router = build_router(h.state.clone());

    let response = router
        .oneshot(json_request("POST", "/maps/generate", &json!({"theme": "volcano"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["kind"], "InferenceError");
    assert_eq!(h.backend.calls(), 1);
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn test_generate_map_unsaved_world_is_storage_error() {
    let (state, backend) = refusing_harness(Ok(fenced_reply(40)));
    let router = build_router(state);

    let response = router
        .oneshot(json_request("POST", "/maps/generate", &json!({"theme": "volcano"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["kind"], "StorageError");
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn test_update_session_store_failure_is_storage_error() {
    let (state, _backend) = refusing_harness(Ok(fenced_reply(40)));
    let router = build_router(state);

    let response = router
        .oneshot(json_request("PUT", "/sessions/explorer", &json!({"playerX": 3})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["kind"], "StorageError");
}

#[tokio::test]
async fn test_generate_map_prose_reply_is_inference_error() {
    let h = harness(Ok("The volcano is sleeping today.".to_owned()));
    let router = build_router(h.state.clone());

    let response = router
        .oneshot(json_request("POST", "/maps/generate", &json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["kind"], "InferenceError");
}

#[tokio::test]
async fn test_generate_map_malformed_body_is_request_error() {
    let h = harness(Ok(fenced_reply(40)));
    let router = build_router(h.state.clone());

    let request = Request::builder()
        .method("POST")
        .uri("/maps/generate")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["kind"], "RequestError");
    assert_eq!(h.backend.calls(), 0);
}

#[tokio::test]
async fn test_get_unknown_map_is_not_found() {
    let h = harness(Ok(fenced_reply(40)));
    let router = build_router(h.state.clone());

    let response = router
        .oneshot(Request::get("/maps/map_missing").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["kind"], "NotFoundError");
    assert_eq!(json["error"], "Map not found");
}

#[tokio::test]
async fn test_save_map_overwrites_latest() {
    let h = harness(Ok(fenced_reply(40)));
    let router = build_router(h.state.clone());

    for _ in 0..2 {
        let response = router
            .clone()
            .oneshot(json_request("POST", "/maps/hand_made", &json!({"mapData": world(40)})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_to_json(response.into_body()).await;
        assert_eq!(json, json!({"success": true, "mapId": "hand_made"}));
    }
    assert_eq!(h.store.len().await, 1);

    let stored = router
        .oneshot(Request::get("/maps/hand_made").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_to_json(stored.into_body()).await;
    assert_eq!(json["mapData"]["createdBy"], "Human");
    assert_eq!(json["mapData"]["metadata"], json!({"kind": "authored"}));
    assert_eq!(json["mapData"]["newObjects"]["L"], "Lava pool");
}

#[tokio::test]
async fn test_save_map_requires_map_data() {
    let h = harness(Ok(fenced_reply(40)));
    let router = build_router(h.state.clone());

    let response = router
        .oneshot(json_request("POST", "/maps/hand_made", &json!({"other": 1})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["kind"], "RequestError");
}

#[tokio::test]
async fn test_save_map_rejects_wrong_dimensions() {
    let h = harness(Ok(fenced_reply(40)));
    let router = build_router(h.state.clone());

    let response = router
        .oneshot(json_request("POST", "/maps/hand_made", &json!({"mapData": world(12)})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(h.store.is_empty().await);
}

// =========================================================================
// Sessions
// =========================================================================

#[tokio::test]
async fn test_get_session_creates_default() {
    let h = harness(Ok(fenced_reply(40)));
    let router = build_router(h.state.clone());

    let response = router
        .oneshot(Request::get("/sessions/player_one").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["session"]["sessionId"], "player_one");
    assert_eq!(json["session"]["currentMap"], 0);
    assert_eq!(json["session"]["playerX"], 10);
    assert_eq!(json["session"]["playerY"], 10);
    assert_eq!(json["session"]["visitedAreas"], json!([]));
    assert_eq!(h.store.len().await, 1);
}

#[tokio::test]
async fn test_update_session_overrides_named_fields_only() {
    let h = harness(Ok(fenced_reply(40)));
    let router = build_router(h.state.clone());

    let first = json!({"currentMap": 2, "playerX": 5, "playerY": 7, "visitedAreas": ["0", "2"]});
    let response = router
        .clone()
        .oneshot(json_request("PUT", "/sessions/explorer", &first))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(json_request("PUT", "/sessions/explorer", &json!({"playerX": 9})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["session"]["currentMap"], 2);
    assert_eq!(json["session"]["playerX"], 9);
    assert_eq!(json["session"]["playerY"], 7);
    assert_eq!(json["session"]["visitedAreas"], json!(["0", "2"]));
}

#[tokio::test]
async fn test_update_session_wrong_field_type_is_request_error() {
    let h = harness(Ok(fenced_reply(40)));
    let router = build_router(h.state.clone());

    let response = router
        .oneshot(json_request("PUT", "/sessions/explorer", &json!({"playerX": "nine"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(h.store.is_empty().await);
}

// =========================================================================
// Routing
// =========================================================================

#[tokio::test]
async fn test_unknown_route_is_not_found_envelope() {
    let h = harness(Ok(fenced_reply(40)));
    let router = build_router(h.state.clone());

    let response = router
        .oneshot(Request::get("/nowhere").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json, json!({"success": false, "error": "Not found", "kind": "NotFoundError"}));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let h = harness(Ok(fenced_reply(40)));
    let router = build_router(h.state.clone());

    let request = Request::get("/sessions/cors_check")
        .header("origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}
