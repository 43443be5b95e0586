//! Chat-completion transport.
//!
//! Sends a [`PromptRequest`](crate::prompt::PromptRequest) to an OpenAI-compatible
//! `/chat/completions` endpoint and returns the first choice's text.

mod openai;

pub use openai::{format_for_editor, ChatTransport, LlmError, OpenAiClient, DEFAULT_BASE_URL};
