//! Gateway HTTP server (single port).

use crate::assist::{self, AssistError};
use crate::config::{self, Config};
use crate::conversation::{normalize, Normalized, RawMessageEvent};
use crate::gateway::protocol::{ErrorBody, GenerateResponse};
use crate::llm::{ChatTransport, LlmError, OpenAiClient};
use crate::prompt::{PromptKind, PromptRequest};
use crate::source::{conversation_from_response, StaticSource};
use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

/// Shared, read-only state for handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub config: Arc<Config>,
    /// Model override from config, applied to every request.
    pub model: Option<String>,
    /// None when no API key is configured; `/generate` then answers 503.
    pub transport: Option<Arc<dyn ChatTransport>>,
}

impl GatewayState {
    pub fn new(config: Config, transport: Option<Arc<dyn ChatTransport>>) -> Self {
        let model = config::resolve_model(&config);
        Self {
            config: Arc::new(config),
            model,
            transport,
        }
    }

    /// Build state with an OpenAI client from the resolved API key and base URL, if a key is set.
    pub fn from_config(config: Config) -> Self {
        let transport = match OpenAiClient::new(
            config::resolve_api_key(&config),
            config::resolve_base_url(&config),
        ) {
            Ok(client) => {
                log::info!("gateway: chat completions via {}", client.base_url());
                Some(Arc::new(client) as Arc<dyn ChatTransport>)
            }
            Err(e) => {
                log::warn!("gateway: {}; /generate is disabled", e);
                None
            }
        };
        Self::new(config, transport)
    }
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, error: impl ToString) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: error.to_string(),
        }),
    )
}

/// Routes: `GET /`, `POST /normalize`, `POST /prompt/:kind`, `POST /generate/:kind`.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(health_http))
        .route("/normalize", post(normalize_http))
        .route("/prompt/:kind", post(prompt_http))
        .route("/generate/:kind", post(generate_http))
        .with_state(state)
}

/// Run the gateway until Ctrl+C / SIGTERM. Only loopback binds are allowed since there is no auth.
pub async fn run_gateway(config: Config) -> Result<()> {
    let bind = config.gateway.bind.trim().to_string();
    if !config::is_loopback_bind(&bind) {
        anyhow::bail!(
            "refusing to bind gateway to {} (the gateway has no auth; use a loopback address)",
            bind
        );
    }
    let bind_addr = format!("{}:{}", bind, config.gateway.port);
    let app = router(GatewayState::from_config(config));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("gateway listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server exited")?;
    log::info!("gateway stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                log::warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received");
}

/// GET / returns a small health JSON.
async fn health_http(State(state): State<GatewayState>) -> Json<serde_json::Value> {
    Json(json!({
        "runtime": "running",
        "port": state.config.gateway.port,
        "generate": state.transport.is_some(),
    }))
}

fn parse_events(body: serde_json::Value) -> Result<Vec<RawMessageEvent>, ApiError> {
    conversation_from_response(body).map_err(|e| api_error(StatusCode::BAD_REQUEST, e))
}

fn parse_kind(kind: &str) -> Result<PromptKind, ApiError> {
    kind.parse::<PromptKind>()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))
}

/// POST /normalize returns `{ messages, comments }`.
async fn normalize_http(Json(body): Json<serde_json::Value>) -> Result<Json<Normalized>, ApiError> {
    let events = parse_events(body)?;
    Ok(Json(normalize(events)))
}

/// POST /prompt/:kind returns the chat-completion request body without sending it.
async fn prompt_http(
    State(state): State<GatewayState>,
    Path(kind): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<PromptRequest>, ApiError> {
    let kind = parse_kind(&kind)?;
    let events = parse_events(body)?;
    let prepared = assist::prepare(kind, events, state.model.as_deref());
    Ok(Json(prepared.request))
}

/// POST /generate/:kind sends the prompt and returns the editor HTML.
async fn generate_http(
    State(state): State<GatewayState>,
    Path(kind): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let kind = parse_kind(&kind)?;
    let events = parse_events(body)?;
    let transport = state
        .transport
        .as_ref()
        .ok_or_else(|| api_error(StatusCode::SERVICE_UNAVAILABLE, LlmError::MissingApiKey))?;
    let source = StaticSource::new(events);
    let reply = assist::generate_reply(kind, &source, &**transport, state.model.as_deref())
        .await
        .map_err(|e| {
            log::warn!("gateway: generate {} failed: {}", kind, e);
            match e {
                AssistError::Source(e) => api_error(StatusCode::BAD_REQUEST, e),
                other => api_error(StatusCode::BAD_GATEWAY, other),
            }
        })?;
    Ok(Json(GenerateResponse {
        kind: reply.kind,
        html: reply.html,
    }))
}
