use regex::Regex;
use std::sync::LazyLock;

use crate::application::services::redact_bot_tokens;

const MAX_VISIBLE_CHARS: usize = 120;

static SECRET_PATTERNS: LazyLock<[(Regex, &'static str); 2]> = LazyLock::new(|| {
    [
        (
            Regex::new(r"(?i)(token|api_key|password|secret)=[^\s&]+").unwrap(),
            "$1=[REDACTED]",
        ),
        (Regex::new(r"Bearer \S+").unwrap(), "Bearer [REDACTED]"),
    ]
});

/// Prepares user-supplied text (queries, upstream errors) for logging.
pub fn sanitize_for_log(text: &str) -> String {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let mut redacted = redact_bot_tokens(trimmed).into_owned();
    for (pattern, replacement) in SECRET_PATTERNS.iter() {
        redacted = pattern.replace_all(&redacted, *replacement).into_owned();
    }

    let total = redacted.chars().count();
    if total > MAX_VISIBLE_CHARS {
        let visible: String = redacted.chars().take(MAX_VISIBLE_CHARS).collect();
        format!("{}... ({} chars total)", visible, total)
    } else {
        redacted
    }
}
