//! Wire types for one helpdesk conversation event (`ticket.conversation` list item).

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Channel name the platform uses for private notes.
pub const INTERNAL_CHANNEL: &str = "internal";

/// Missing and `null` both read as the field's default. Events are never rejected for an
/// absent or null field; odd values surface later as empty text.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One inbound conversation event as sent by the helpdesk platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMessageEvent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: Author,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: MessageBody,
    #[serde(default, deserialize_with = "null_as_default")]
    pub channel: Channel,
    /// `None` when the key is absent; `Some(vec![])` when present but empty. The filter
    /// treats these differently.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
    /// RFC 3339 instant, kept verbatim.
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    /// Platform user id; number or string depending on the platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub role: Option<AuthorRole>,
}

/// Who authored an event. Unknown role strings are kept as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AuthorRole {
    User,
    Agent,
    System,
    Trigger,
    Bot,
    Other(String),
}

impl AuthorRole {
    pub fn as_str(&self) -> &str {
        match self {
            AuthorRole::User => "user",
            AuthorRole::Agent => "agent",
            AuthorRole::System => "system",
            AuthorRole::Trigger => "trigger",
            AuthorRole::Bot => "bot",
            AuthorRole::Other(s) => s.as_str(),
        }
    }

    /// System and trigger events are platform noise, never part of the conversation.
    pub fn is_automated(&self) -> bool {
        matches!(self, AuthorRole::System | AuthorRole::Trigger)
    }
}

impl From<String> for AuthorRole {
    fn from(s: String) -> Self {
        match s.as_str() {
            "user" => AuthorRole::User,
            "agent" => AuthorRole::Agent,
            "system" => AuthorRole::System,
            "trigger" => AuthorRole::Trigger,
            "bot" => AuthorRole::Bot,
            _ => AuthorRole::Other(s),
        }
    }
}

impl From<AuthorRole> for String {
    fn from(role: AuthorRole) -> Self {
        match role {
            AuthorRole::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AuthorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBody {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content_type: ContentType,
}

/// MIME type of `message.content`. Anything other than `text/html` is treated as plain text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentType {
    #[default]
    TextPlain,
    TextHtml,
}

impl From<String> for ContentType {
    fn from(s: String) -> Self {
        if s.trim().eq_ignore_ascii_case("text/html") {
            ContentType::TextHtml
        } else {
            ContentType::TextPlain
        }
    }
}

impl From<ContentType> for String {
    fn from(ct: ContentType) -> Self {
        match ct {
            ContentType::TextPlain => "text/plain".to_string(),
            ContentType::TextHtml => "text/html".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

impl Channel {
    pub fn is_internal(&self) -> bool {
        self.name == INTERNAL_CHANNEL
    }
}

/// File attached to an event. Unknown platform fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// A raw event after cleaning: content is always set and free of HTML markup.
///
/// Only produced by [`normalize`](super::normalize); serializes exactly like the event it wraps.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CanonicalMessage(RawMessageEvent);

impl CanonicalMessage {
    /// Wrap an already-cleaned event. `event.message.content` must be `Some`.
    pub(crate) fn from_cleaned(event: RawMessageEvent) -> Self {
        debug_assert!(event.message.content.is_some());
        Self(event)
    }

    pub fn author(&self) -> &Author {
        &self.0.author
    }

    pub fn channel(&self) -> &Channel {
        &self.0.channel
    }

    pub fn attachments(&self) -> &[Attachment] {
        self.0.attachments.as_deref().unwrap_or(&[])
    }

    pub fn timestamp(&self) -> &str {
        &self.0.timestamp
    }

    pub fn content_type(&self) -> &ContentType {
        &self.0.message.content_type
    }

    /// Cleaned message text. May be empty when the original was markup only.
    pub fn content(&self) -> &str {
        self.0.message.content.as_deref().unwrap_or("")
    }

    pub fn as_event(&self) -> &RawMessageEvent {
        &self.0
    }

    pub fn into_event(self) -> RawMessageEvent {
        self.0
    }
}
