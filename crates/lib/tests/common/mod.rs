//! Shared test helpers: a sample ticket conversation and an in-process mock of the
//! `/v1/chat/completions` endpoint.

#![allow(dead_code)]

use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
use serde_json::json;
use std::sync::{Arc, Mutex};

pub const TEST_API_KEY: &str = "sk-test-123";

pub fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
    listener.local_addr().expect("local_addr").port()
}

/// A platform `get("ticket.conversation")` response with noise events mixed in.
pub fn sample_conversation() -> serde_json::Value {
    json!({
        "ticket.conversation": [
            {
                "author": { "id": 1, "name": "Alice", "role": "user" },
                "message": { "content": "Joined", "contentType": "text/plain" },
                "channel": { "name": "messaging" },
                "attachments": [],
                "timestamp": "2024-03-01T10:00:00Z"
            },
            {
                "author": { "id": 1, "name": "Alice", "role": "user" },
                "message": { "content": "I was charged twice this month.", "contentType": "text/plain" },
                "channel": { "name": "messaging" },
                "attachments": [],
                "timestamp": "2024-03-01T10:00:30Z"
            },
            {
                "author": { "id": 0, "name": "Zendesk", "role": "system" },
                "message": { "content": "Ticket assigned to Billing", "contentType": "text/plain" },
                "channel": { "name": "internal" },
                "timestamp": "2024-03-01T10:01:00Z"
            },
            {
                "author": { "id": 1, "name": "Alice", "role": "user" },
                "message": { "content": null, "contentType": "text/plain" },
                "channel": { "name": "messaging" },
                "attachments": [{ "filename": "invoice.pdf" }],
                "timestamp": "2024-03-01T10:02:00Z"
            },
            {
                "author": { "id": 2, "name": "Bob", "role": "agent" },
                "message": { "content": "<p>Refund&nbsp;requested</p>", "contentType": "text/html" },
                "channel": { "name": "internal" },
                "timestamp": "2024-03-01T10:03:00Z"
            }
        ]
    })
}

/// What the mock endpoint saw.
#[derive(Default)]
pub struct Recorded {
    pub authorization: Vec<String>,
    pub bodies: Vec<serde_json::Value>,
}

#[derive(Clone)]
struct MockState {
    recorded: Arc<Mutex<Recorded>>,
    reply: Arc<String>,
}

async fn chat_completions(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, Json<serde_json::Value>) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let authorized = auth == format!("Bearer {}", TEST_API_KEY);
    {
        let mut r = state.recorded.lock().unwrap();
        r.authorization.push(auth);
        r.bodies.push(body);
    }
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": { "message": "Incorrect API key provided" } })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": state.reply.as_str() },
                "finish_reason": "stop"
            }]
        })),
    )
}

/// Spawn the mock on a random loopback port. Returns its `/v1` base URL and the recording.
pub async fn spawn_mock_openai(reply: &str) -> (String, Arc<Mutex<Recorded>>) {
    let recorded = Arc::new(Mutex::new(Recorded::default()));
    let state = MockState {
        recorded: recorded.clone(),
        reply: Arc::new(reply.to_string()),
    };
    let app = Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock server");
    let addr = listener.local_addr().expect("local_addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{}/v1", addr), recorded)
}
