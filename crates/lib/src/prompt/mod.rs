//! Prompt building: a transcript plus a kind-specific system instruction, as a chat-completion
//! request body.

mod templates;

use crate::conversation::CanonicalMessage;
use crate::transcript::format_transcript;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Model used when configuration does not override it.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const MAX_TOKENS: u32 = 1024;

/// One of the three supported generation modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptKind {
    Escalation,
    Summarize,
    Handoff,
}

impl PromptKind {
    pub const ALL: [PromptKind; 3] = [
        PromptKind::Escalation,
        PromptKind::Summarize,
        PromptKind::Handoff,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PromptKind::Escalation => "escalation",
            PromptKind::Summarize => "summarize",
            PromptKind::Handoff => "handoff",
        }
    }

    /// System instruction sent ahead of the transcript.
    pub fn instructions(self) -> &'static str {
        match self {
            PromptKind::Escalation => templates::ESCALATION,
            PromptKind::Summarize => templates::SUMMARIZE,
            PromptKind::Handoff => templates::HANDOFF,
        }
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptKind {
    type Err = PromptError;

    /// Exact, case-sensitive match on the lowercase names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PromptKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or(PromptError::NoPromptType)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PromptError {
    /// Kind was missing or not one of escalation, summarize, handoff.
    #[error("No prompt type provided.")]
    NoPromptType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

/// Chat-completion request body. Serializes to the OpenAI `/chat/completions` JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub model: String,
    pub messages: Vec<PromptMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl PromptRequest {
    fn new(system: &str, transcript: String) -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            messages: vec![
                PromptMessage {
                    role: PromptRole::System,
                    content: system.to_string(),
                },
                PromptMessage {
                    role: PromptRole::User,
                    content: transcript,
                },
            ],
            temperature: 0.0,
            max_tokens: MAX_TOKENS,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }

    /// Replace the model name; empty or blank names keep the current model.
    pub fn with_model(mut self, model: &str) -> Self {
        let model = model.trim();
        if !model.is_empty() {
            self.model = model.to_string();
        }
        self
    }

    /// The transcript carried in the `user` message.
    pub fn transcript(&self) -> &str {
        self.messages
            .iter()
            .find(|m| m.role == PromptRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }
}

/// Build the request for a recognized kind.
pub fn build_prompt(kind: PromptKind, messages: &[CanonicalMessage]) -> PromptRequest {
    let transcript = format_transcript(messages);
    log::debug!(
        "prompt: built {} request ({} messages, {} transcript bytes)",
        kind,
        messages.len(),
        transcript.len()
    );
    PromptRequest::new(kind.instructions(), transcript)
}

/// Build from an optional kind name as received from a caller (UI button, HTTP path, CLI flag).
pub fn build_prompt_for(
    kind: Option<&str>,
    messages: &[CanonicalMessage],
) -> Result<PromptRequest, PromptError> {
    let kind: PromptKind = kind.ok_or(PromptError::NoPromptType)?.parse()?;
    Ok(build_prompt(kind, messages))
}
