//! Message-boundary dispatch tests.
//!
//! Frames are fed straight into [`dispatch`] so each action is checked
//! without opening a socket.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

mod common;

use endless_api::ws::dispatch;
use endless_types::{ReplyType, ServerMessage};
use serde_json::{Value, json};

use common::{fenced_reply, harness};

fn frame(value: &Value) -> String {
    value.to_string()
}

fn data(reply: &ServerMessage) -> Value {
    reply.data.clone().unwrap_or(Value::Null)
}

#[tokio::test]
async fn join_game_creates_session() {
    let h = harness(Ok(fenced_reply(40)));
    let reply = dispatch(
        &h.state,
        &frame(&json!({"action": "joinGame", "sessionId": "ws_player"})),
    )
    .await;

    assert_eq!(reply.reply_type, ReplyType::Success);
    assert_eq!(reply.action, "joinGame");
    assert_eq!(data(&reply)["session"]["sessionId"], "ws_player");
    assert_eq!(data(&reply)["session"]["playerX"], 10);
}

#[tokio::test]
async fn move_updates_position_only() {
    let h = harness(Ok(fenced_reply(40)));
    dispatch(
        &h.state,
        &frame(&json!({
            "action": "saveGameState",
            "sessionId": "walker",
            "data": {"currentMap": 3, "visitedAreas": ["0", "3"]}
        })),
    )
    .await;

    let reply = dispatch(
        &h.state,
        &frame(&json!({"action": "move", "sessionId": "walker", "data": {"x": 14, "y": 22}})),
    )
    .await;

    assert_eq!(reply.reply_type, ReplyType::Success);
    let session = &data(&reply)["session"];
    assert_eq!(session["playerX"], 14);
    assert_eq!(session["playerY"], 22);
    assert_eq!(session["currentMap"], 3);
    assert_eq!(session["visitedAreas"], json!(["0", "3"]));
}

#[tokio::test]
async fn generate_then_get_map() {
    let h = harness(Ok(fenced_reply(40)));
    let generated = dispatch(
        &h.state,
        &frame(&json!({
            "action": "generateMap",
            "sessionId": "maker",
            "data": {"theme": "volcano", "mapId": "ws_map"}
        })),
    )
    .await;
    assert_eq!(generated.reply_type, ReplyType::Success);
    assert_eq!(data(&generated)["mapId"], "ws_map");

    let fetched = dispatch(
        &h.state,
        &frame(&json!({"action": "getMap", "sessionId": "maker", "data": {"mapId": "ws_map"}})),
    )
    .await;
    assert_eq!(fetched.reply_type, ReplyType::Success);
    assert_eq!(data(&fetched)["mapData"]["mapId"], "ws_map");
}

#[tokio::test]
async fn missing_map_is_an_error_reply() {
    let h = harness(Ok(fenced_reply(40)));
    let reply = dispatch(
        &h.state,
        &frame(&json!({"action": "getMap", "sessionId": "s", "data": {"mapId": "nope"}})),
    )
    .await;
    assert_eq!(reply.reply_type, ReplyType::Error);
    assert_eq!(reply.action, "getMap");
    assert_eq!(reply.error.as_deref(), Some("Map not found"));
    assert!(reply.data.is_none());
}

#[tokio::test]
async fn unknown_action_is_an_error_reply() {
    let h = harness(Ok(fenced_reply(40)));
    let reply = dispatch(
        &h.state,
        &frame(&json!({"action": "teleport", "sessionId": "s", "data": {}})),
    )
    .await;
    assert_eq!(reply.reply_type, ReplyType::Error);
    assert_eq!(reply.action, "teleport");
    assert!(reply.error.unwrap().contains("teleport"));
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn malformed_payload_is_an_error_reply() {
    let h = harness(Ok(fenced_reply(40)));
    let reply = dispatch(
        &h.state,
        &frame(&json!({"action": "move", "sessionId": "s", "data": {"x": "left"}})),
    )
    .await;
    assert_eq!(reply.reply_type, ReplyType::Error);
    assert_eq!(reply.action, "move");
}

#[tokio::test]
async fn unreadable_frame_is_an_error_reply() {
    let h = harness(Ok(fenced_reply(40)));
    let reply = dispatch(&h.state, "definitely not json").await;
    assert_eq!(reply.reply_type, ReplyType::Error);
    assert_eq!(reply.action, "unknown");

    let serialized = serde_json::to_value(&reply).unwrap();
    assert_eq!(serialized["type"], "error");
}

#[tokio::test]
async fn blank_session_is_rejected() {
    let h = harness(Ok(fenced_reply(40)));
    let reply = dispatch(
        &h.state,
        &frame(&json!({"action": "joinGame", "sessionId": "  "})),
    )
    .await;
    assert_eq!(reply.reply_type, ReplyType::Error);
    assert_eq!(reply.error.as_deref(), Some("Session ID is required"));
}
