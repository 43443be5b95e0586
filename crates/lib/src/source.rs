//! Conversation sources: where a ticket's raw events come from.
//!
//! The helpdesk platform answers a `get("ticket.conversation")` call with an object keyed by
//! `"ticket.conversation"`. Sources return the list under that key; a bare JSON array is
//! accepted too so exported conversations can be fed in directly.

use crate::conversation::RawMessageEvent;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

/// Key of the conversation list in a platform `get` response.
pub const CONVERSATION_KEY: &str = "ticket.conversation";

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("reading conversation from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid conversation JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response has no \"ticket.conversation\" list")]
    MissingConversation,
}

/// Supplies a ticket's raw conversation. Called once per generation; results are not cached.
#[async_trait]
pub trait ConversationSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<RawMessageEvent>, SourceError>;
}

/// Extract the event list from a platform response (or a bare array).
pub fn conversation_from_response(
    value: serde_json::Value,
) -> Result<Vec<RawMessageEvent>, SourceError> {
    let list = match value {
        serde_json::Value::Array(_) => value,
        serde_json::Value::Object(mut map) => map
            .remove(CONVERSATION_KEY)
            .filter(|v| v.is_array())
            .ok_or(SourceError::MissingConversation)?,
        _ => return Err(SourceError::MissingConversation),
    };
    Ok(serde_json::from_value(list)?)
}

/// Reads a conversation JSON document from a file, or from stdin when the path is `-`.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_stdin(&self) -> bool {
        self.path.as_os_str() == "-"
    }

    async fn read(&self) -> Result<String, SourceError> {
        let io_err = |source| SourceError::Io {
            path: self.path.display().to_string(),
            source,
        };
        if self.is_stdin() {
            let mut s = String::new();
            tokio::io::stdin()
                .read_to_string(&mut s)
                .await
                .map_err(io_err)?;
            Ok(s)
        } else {
            tokio::fs::read_to_string(&self.path).await.map_err(io_err)
        }
    }
}

#[async_trait]
impl ConversationSource for FileSource {
    async fn fetch(&self) -> Result<Vec<RawMessageEvent>, SourceError> {
        let text = self.read().await?;
        let value: serde_json::Value = serde_json::from_str(&text)?;
        let events = conversation_from_response(value)?;
        log::debug!(
            "source: read {} events from {}",
            events.len(),
            self.path.display()
        );
        Ok(events)
    }
}

/// Events that were already fetched by the caller (e.g. posted to the gateway).
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    events: Vec<RawMessageEvent>,
}

impl StaticSource {
    pub fn new(events: Vec<RawMessageEvent>) -> Self {
        Self { events }
    }
}

#[async_trait]
impl ConversationSource for StaticSource {
    async fn fetch(&self) -> Result<Vec<RawMessageEvent>, SourceError> {
        Ok(self.events.clone())
    }
}
