//! End-to-end generation: fetch → normalize → build prompt → chat completion → editor HTML.
//!
//! Every call fetches the conversation again and threads it through explicitly; nothing is kept
//! between calls, so a reply is always built from the conversation as it is now.

use crate::conversation::{normalize, Normalized, RawMessageEvent};
use crate::llm::{format_for_editor, ChatTransport, LlmError};
use crate::prompt::{build_prompt, PromptKind, PromptRequest};
use crate::source::{ConversationSource, SourceError};

#[derive(Debug, thiserror::Error)]
pub enum AssistError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("inserting reply: {0}")]
    Insert(String),
}

/// Normalized conversation and the request built from it. No network involved.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub normalized: Normalized,
    pub request: PromptRequest,
}

/// Reply ready for the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistReply {
    pub kind: PromptKind,
    /// Model output with newlines turned into `<br>`.
    pub html: String,
    /// Model output as returned.
    pub raw: String,
}

/// Receives the final HTML (the ticket editor, stdout, an HTTP response).
pub trait EditorSink {
    fn insert(&self, html: &str) -> Result<(), String>;
}

/// Writes replies to stdout, one per line.
pub struct StdoutSink;

impl EditorSink for StdoutSink {
    fn insert(&self, html: &str) -> Result<(), String> {
        println!("{}", html);
        Ok(())
    }
}

/// Normalize events and build the request for `kind`. `model` overrides the default model when
/// set and non-blank.
pub fn prepare(kind: PromptKind, events: Vec<RawMessageEvent>, model: Option<&str>) -> Prepared {
    let normalized = normalize(events);
    let mut request = build_prompt(kind, &normalized.messages);
    if let Some(model) = model {
        request = request.with_model(model);
    }
    Prepared {
        normalized,
        request,
    }
}

/// Fetch the conversation, send the prompt, and return editor HTML. Transport errors are
/// returned as-is; there is no retry and no partial result.
pub async fn generate_reply(
    kind: PromptKind,
    source: &dyn ConversationSource,
    transport: &dyn ChatTransport,
    model: Option<&str>,
) -> Result<AssistReply, AssistError> {
    let events = source.fetch().await?;
    let prepared = prepare(kind, events, model);
    log::info!(
        "assist: generating {} from {} messages",
        kind,
        prepared.normalized.messages.len()
    );
    let raw = transport.complete(&prepared.request).await?;
    Ok(AssistReply {
        kind,
        html: format_for_editor(&raw),
        raw,
    })
}

/// [`generate_reply`], then hand the HTML to `sink`.
pub async fn generate_and_insert(
    kind: PromptKind,
    source: &dyn ConversationSource,
    transport: &dyn ChatTransport,
    model: Option<&str>,
    sink: &dyn EditorSink,
) -> Result<AssistReply, AssistError> {
    let reply = generate_reply(kind, source, transport, model).await?;
    sink.insert(&reply.html).map_err(AssistError::Insert)?;
    Ok(reply)
}
