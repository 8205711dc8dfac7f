use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

const ELLIPSIS: char = '…';
const UNKNOWN_ERROR: &str = "unknown error";

static BOT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"bot\d+:[A-Za-z0-9_-]+").unwrap());

/// Masks Bot API tokens, which appear inside request URLs.
pub fn redact_bot_tokens(text: &str) -> Cow<'_, str> {
    BOT_TOKEN.replace_all(text, "bot[REDACTED]")
}

/// Produces the user-facing excerpt of an error: bot tokens redacted, at most
/// `max_chars` characters, never empty.
pub fn error_excerpt(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    let source = if trimmed.is_empty() {
        UNKNOWN_ERROR
    } else {
        trimmed
    };
    let redacted = redact_bot_tokens(source);
    let max_chars = max_chars.max(1);

    if redacted.chars().count() <= max_chars {
        return redacted.into_owned();
    }

    let mut excerpt: String = redacted.chars().take(max_chars - 1).collect();
    excerpt.push(ELLIPSIS);
    excerpt
}

