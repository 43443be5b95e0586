//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.deskmate/config.json`) and environment.
//! The API key is normally supplied through `OPENAI_API_KEY` rather than written to disk.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Chat-completion endpoint settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Gateway server settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Chat-completion endpoint: key, base URL, model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenAiConfig {
    /// Bearer token. Overridden by OPENAI_API_KEY env.
    pub api_key: Option<String>,
    /// Base URL up to and including the version segment (default https://api.openai.com/v1).
    pub base_url: Option<String>,
    /// Model name; when unset requests use gpt-3.5-turbo.
    pub model: Option<String>,
}

/// Gateway bind and port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Port for HTTP (default 15152).
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bind address (default "127.0.0.1").
    #[serde(default = "default_gateway_bind")]
    pub bind: String,
}

fn default_gateway_port() -> u16 {
    15152
}

fn default_gateway_bind() -> String {
    "127.0.0.1".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            bind: default_gateway_bind(),
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

/// Resolve the API key: env OPENAI_API_KEY overrides config.
pub fn resolve_api_key(config: &Config) -> Option<String> {
    std::env::var("OPENAI_API_KEY")
        .ok()
        .and_then(|s| non_empty(&s))
        .or_else(|| config.openai.api_key.as_deref().and_then(non_empty))
}

/// Resolve the base URL: env OPENAI_BASE_URL overrides config. None means the default endpoint.
pub fn resolve_base_url(config: &Config) -> Option<String> {
    std::env::var("OPENAI_BASE_URL")
        .ok()
        .and_then(|s| non_empty(&s))
        .or_else(|| config.openai.base_url.as_deref().and_then(non_empty))
}

/// Configured model override, if any.
pub fn resolve_model(config: &Config) -> Option<String> {
    config.openai.model.as_deref().and_then(non_empty)
}

/// True if the bind address is loopback (127.0.0.1, ::1, etc.).
pub fn is_loopback_bind(bind: &str) -> bool {
    let b = bind.trim();
    b == "127.0.0.1" || b == "::1" || b == "localhost"
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("DESKMATE_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".deskmate").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the given path, or the default path (or DESKMATE_CONFIG_PATH). Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}
