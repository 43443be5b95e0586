//! HTML stripping for message content.

use regex::Regex;
use std::sync::OnceLock;

fn tag_re() -> &'static Regex {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    TAG_RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid tag regex"))
}

/// Remove `<...>` tags and turn `&nbsp;` into a space. Other entities are left alone.
///
/// Idempotent: the output contains no `<x>` tags and no `&nbsp;`, so a second pass is a no-op.
pub fn strip_markup(html: &str) -> String {
    let without_tags = tag_re().replace_all(html, "");
    without_tags.replace("&nbsp;", " ")
}
