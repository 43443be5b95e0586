//! Transcript rendering: canonical messages as one timestamped text block for prompt embedding.

use crate::conversation::CanonicalMessage;
use chrono::{DateTime, Local, TimeZone};

/// Transcript used when there is nothing to render.
pub const NO_CONVERSATION_DATA: &str = "No conversation data available.";

/// Human-readable date-time, similar to a browser's `toLocaleString()`.
const TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Render messages as `[{time}] {name} ({role}): {content}` lines, in input order.
///
/// Times are shown in the local time zone. Messages with empty content are skipped.
pub fn format_transcript(messages: &[CanonicalMessage]) -> String {
    format_transcript_in(messages, &Local)
}

/// Same as [`format_transcript`] with an explicit time zone.
pub fn format_transcript_in<Tz>(messages: &[CanonicalMessage], tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if messages.is_empty() {
        return NO_CONVERSATION_DATA.to_string();
    }
    let mut out = String::new();
    for entry in messages {
        let content = entry.content();
        if content.is_empty() {
            log::debug!("transcript: skipping entry with no content at {}", entry.timestamp());
            continue;
        }
        let author = entry.author();
        let role = author.role.as_ref().map(|r| r.as_str()).unwrap_or("unknown");
        out.push_str(&format!(
            "[{}] {} ({}): {}\n",
            format_timestamp(entry.timestamp(), tz),
            author.name,
            role,
            content
        ));
    }
    out
}

/// Parse an RFC 3339 instant and render it in `tz`. Unparseable input is returned verbatim.
pub fn format_timestamp<Tz>(timestamp: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match DateTime::parse_from_rfc3339(timestamp.trim()) {
        Ok(dt) => dt.with_timezone(tz).format(TIMESTAMP_FORMAT).to_string(),
        Err(e) => {
            log::debug!("transcript: unparseable timestamp {:?}: {}", timestamp, e);
            timestamp.to_string()
        }
    }
}
