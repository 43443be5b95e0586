//! Integration test: start the gateway on a free port, check health, prompt, and generate routes.
//! Does not require network access; `/generate` talks to an in-process mock endpoint.

mod common;

use common::{free_port, sample_conversation, spawn_mock_openai, TEST_API_KEY};
use lib::config::Config;
use lib::gateway::{self, GatewayState};
use lib::llm::{ChatTransport, OpenAiClient};
use std::sync::Arc;
use std::time::Duration;

/// Poll GET / until the server answers, or panic after ~5s.
async fn wait_for_health(client: &reqwest::Client, base: &str) -> serde_json::Value {
    let url = format!("{}/", base);
    let mut last_err = None;
    for _ in 0..100 {
        match client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => {
                return resp.json().await.expect("parse JSON");
            }
            Ok(_) => {}
            Err(e) => last_err = Some(e),
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!(
        "GET {} did not return 200 with health JSON within 5s; last error: {:?}",
        url, last_err
    );
}

/// Serve the router with the given state on a random port; returns the base URL.
async fn spawn_gateway(state: GatewayState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind gateway");
    let addr = listener.local_addr().expect("local_addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, gateway::router(state)).await;
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn gateway_health_http_responds_with_running() {
    let port = free_port();
    let mut config = Config::default();
    config.gateway.port = port;
    config.gateway.bind = "127.0.0.1".to_string();

    let gateway_handle = tokio::spawn(async move {
        let _ = gateway::run_gateway(config).await;
    });

    let client = reqwest::Client::new();
    let json = wait_for_health(&client, &format!("http://127.0.0.1:{}", port)).await;
    assert_eq!(json.get("runtime").and_then(|v| v.as_str()), Some("running"));
    assert_eq!(json.get("port").and_then(|v| v.as_u64()), Some(port as u64));
    gateway_handle.abort();
}

#[tokio::test]
async fn gateway_refuses_non_loopback_bind() {
    let mut config = Config::default();
    config.gateway.bind = "0.0.0.0".to_string();
    config.gateway.port = free_port();
    let err = gateway::run_gateway(config).await.unwrap_err();
    assert!(err.to_string().contains("refusing to bind"));
}

#[tokio::test]
async fn prompt_route_builds_request() {
    let base = spawn_gateway(GatewayState::new(Config::default(), None)).await;
    let client = reqwest::Client::new();
    wait_for_health(&client, &base).await;

    let resp = client
        .post(format!("{}/prompt/summarize", base))
        .json(&sample_conversation())
        .send()
        .await
        .expect("send");
    assert!(resp.status().is_success());
    let body: serde_json::Value = resp.json().await.expect("json");
    assert_eq!(body["model"], "gpt-3.5-turbo");
    assert_eq!(body["messages"].as_array().map(Vec::len), Some(2));
    let transcript = body["messages"][1]["content"].as_str().unwrap();
    assert!(transcript.contains("Bob (agent): Refund requested\n"));
}

#[tokio::test]
async fn prompt_route_applies_configured_model() {
    let mut config = Config::default();
    config.openai.model = Some("gpt-4o-mini".to_string());
    let base = spawn_gateway(GatewayState::new(config, None)).await;
    let client = reqwest::Client::new();
    wait_for_health(&client, &base).await;

    let body: serde_json::Value = client
        .post(format!("{}/prompt/handoff", base))
        .json(&sample_conversation())
        .send()
        .await
        .expect("send")
        .json()
        .await
        .expect("json");
    assert_eq!(body["model"], "gpt-4o-mini");
}

#[tokio::test]
async fn unknown_kind_is_bad_request() {
    let base = spawn_gateway(GatewayState::new(Config::default(), None)).await;
    let client = reqwest::Client::new();
    wait_for_health(&client, &base).await;

    let resp = client
        .post(format!("{}/prompt/nonsense", base))
        .json(&sample_conversation())
        .send()
        .await
        .expect("send");
    assert_eq!(resp.status().as_u16(), 400);
    let body: serde_json::Value = resp.json().await.expect("json");
    assert_eq!(body["error"], "No prompt type provided.");
}

#[tokio::test]
async fn normalize_route_returns_messages_and_comments() {
    let base = spawn_gateway(GatewayState::new(Config::default(), None)).await;
    let client = reqwest::Client::new();
    wait_for_health(&client, &base).await;

    let body: serde_json::Value = client
        .post(format!("{}/normalize", base))
        .json(&sample_conversation())
        .send()
        .await
        .expect("send")
        .json()
        .await
        .expect("json");
    let comments = body["comments"].as_array().expect("comments");
    assert_eq!(comments.len(), 3);
    assert_eq!(comments[0]["is_end_user"], true);
    assert_eq!(comments[0]["is_public"], true);
    assert_eq!(comments[2]["is_end_user"], false);
    assert_eq!(comments[2]["is_public"], false);
    assert_eq!(comments[2]["plain_text"], "Refund requested");
    assert_eq!(body["messages"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn generate_without_key_is_unavailable() {
    let base = spawn_gateway(GatewayState::new(Config::default(), None)).await;
    let client = reqwest::Client::new();
    let health = wait_for_health(&client, &base).await;
    assert_eq!(health["generate"], false);

    let resp = client
        .post(format!("{}/generate/summarize", base))
        .json(&sample_conversation())
        .send()
        .await
        .expect("send");
    assert_eq!(resp.status().as_u16(), 503);
}

#[tokio::test]
async fn generate_route_returns_editor_html() {
    let (openai_url, _recorded) = spawn_mock_openai("Summary\n- refund pending").await;
    let transport: Arc<dyn ChatTransport> =
        Arc::new(OpenAiClient::new(Some(TEST_API_KEY.to_string()), Some(openai_url)).unwrap());
    let base = spawn_gateway(GatewayState::new(Config::default(), Some(transport))).await;
    let client = reqwest::Client::new();
    wait_for_health(&client, &base).await;

    let resp = client
        .post(format!("{}/generate/summarize", base))
        .json(&sample_conversation())
        .send()
        .await
        .expect("send");
    assert!(resp.status().is_success());
    let body: serde_json::Value = resp.json().await.expect("json");
    assert_eq!(body["kind"], "summarize");
    assert_eq!(body["html"], "Summary<br>- refund pending");
}

#[tokio::test]
async fn generate_route_maps_upstream_failure_to_bad_gateway() {
    let (openai_url, _recorded) = spawn_mock_openai("unused").await;
    let transport: Arc<dyn ChatTransport> =
        Arc::new(OpenAiClient::new(Some("sk-wrong".to_string()), Some(openai_url)).unwrap());
    let base = spawn_gateway(GatewayState::new(Config::default(), Some(transport))).await;
    let client = reqwest::Client::new();
    wait_for_health(&client, &base).await;

    let resp = client
        .post(format!("{}/generate/handoff", base))
        .json(&sample_conversation())
        .send()
        .await
        .expect("send");
    assert_eq!(resp.status().as_u16(), 502);
}
