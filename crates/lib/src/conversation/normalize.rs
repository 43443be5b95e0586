//! Conversation normalization: filter raw events, clean survivors, derive UI comments.

use crate::conversation::event::{AuthorRole, CanonicalMessage, ContentType, RawMessageEvent};
use crate::conversation::markup::strip_markup;
use serde::{Deserialize, Serialize};

/// Presence notices the platform emits when someone enters or leaves a live chat.
const PRESENCE_NOTICES: [&str; 2] = ["Joined", "Left"];

/// UI-facing comment derived 1:1 from a canonical message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub is_end_user: bool,
    pub is_public: bool,
    pub author_id: Option<serde_json::Value>,
    /// May be empty when the message was markup only.
    pub plain_text: String,
    pub timestamp: String,
}

/// Output of [`normalize`]: both lists are in input order and have the same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Normalized {
    pub messages: Vec<CanonicalMessage>,
    pub comments: Vec<Comment>,
}

/// Filter, clean, and derive comments. Order-preserving; no sorting or deduplication.
pub fn normalize(events: Vec<RawMessageEvent>) -> Normalized {
    let total = events.len();
    let messages: Vec<CanonicalMessage> = events
        .into_iter()
        .filter(keep_event)
        .map(clean_event)
        .collect();
    let comments = messages.iter().map(to_comment).collect();
    log::debug!(
        "normalize: kept {} of {} events ({} dropped)",
        messages.len(),
        total,
        total - messages.len()
    );
    Normalized { messages, comments }
}

/// True when an event belongs in the conversation.
///
/// The author must have a role other than system/trigger. The event must carry text that is not
/// a presence notice, or carry no text but have an `attachments` key (an empty list counts).
pub fn keep_event(event: &RawMessageEvent) -> bool {
    let Some(role) = event.author.role.as_ref() else {
        return false;
    };
    if role.as_str().is_empty() || role.is_automated() {
        return false;
    }
    match event.message.content.as_deref() {
        Some(text) if !text.is_empty() => !PRESENCE_NOTICES.contains(&text),
        _ => event.attachments.is_some(),
    }
}

fn clean_event(mut event: RawMessageEvent) -> CanonicalMessage {
    let has_text = event
        .message
        .content
        .as_deref()
        .is_some_and(|c| !c.is_empty());
    if !has_text {
        let first_name = event
            .attachments
            .as_deref()
            .and_then(|a| a.first())
            .and_then(|first| first.filename.as_deref());
        let synthesized = match first_name {
            Some(filename) => format!(
                "{} added a file named {} to this ticket.",
                event.author.name, filename
            ),
            None => format!("{} added a file to this ticket.", event.author.name),
        };
        event.message.content = Some(synthesized);
    }
    if event.message.content_type == ContentType::TextHtml {
        event.message.content = event.message.content.as_deref().map(strip_markup);
    }
    CanonicalMessage::from_cleaned(event)
}

fn to_comment(message: &CanonicalMessage) -> Comment {
    let author = message.author();
    Comment {
        is_end_user: author.role.as_ref().is_some_and(|r| matches!(r, AuthorRole::User)),
        is_public: !message.channel().is_internal(),
        author_id: author.id.clone(),
        plain_text: strip_markup(message.content()),
        timestamp: message.timestamp().to_string(),
    }
}
