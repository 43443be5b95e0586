//! Ticket conversation: raw helpdesk events and their normalized form.
//!
//! Raw events come from the helpdesk platform as-is. Normalization drops noise (system and
//! trigger events, join/leave notices), synthesizes text for attachment-only events, and strips
//! HTML so the result can be rendered into a transcript.

mod event;
mod markup;
mod normalize;

pub use event::{
    Attachment, Author, AuthorRole, CanonicalMessage, Channel, ContentType, MessageBody,
    RawMessageEvent, INTERNAL_CHANNEL,
};
pub use markup::strip_markup;
pub use normalize::{keep_event, normalize, Comment, Normalized};
