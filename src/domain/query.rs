use std::fmt;

const DIRECT_LOCATOR_SCHEMES: [&str; 2] = ["http://", "https://"];
const SEARCH_DIRECTIVE_PREFIX: &str = "ytsearch1:";

/// User-supplied track query: either a direct locator or free search text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Returns `None` for empty or whitespace-only input.
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_direct_locator(&self) -> bool {
        DIRECT_LOCATOR_SCHEMES.iter().any(|scheme| {
            self.0
                .get(..scheme.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
        })
    }

    /// The string handed to the extractor: the locator itself, or a
    /// single-result search directive wrapping the text.
    pub fn extraction_target(&self) -> String {
        if self.is_direct_locator() {
            self.0.clone()
        } else {
            format!("{}{}", SEARCH_DIRECTIVE_PREFIX, self.0)
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
