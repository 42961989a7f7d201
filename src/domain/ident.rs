//! Record identifiers: integers and text, never coerced into each other

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a stored record.
///
/// Integer and text identifiers are distinct identities even when they look
/// alike: `Int(2)` and `Text("2")` never compare equal and never collide in
/// an index. Serialized untagged, so datasets carry plain JSON numbers and
/// strings and the variant is recovered from the JSON type alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Int(i64),
    Text(String),
}

impl ItemId {
    /// Parse a command-line argument into an identifier.
    ///
    /// Bare integers become `Int`. A value wrapped in single or double quotes
    /// becomes `Text` with the quotes stripped, which is how a caller
    /// addresses a text identifier that looks numeric (`'"2"'`). Anything
    /// else becomes `Text` verbatim.
    pub fn parse_arg(raw: &str) -> Self {
        if let Ok(n) = raw.parse::<i64>() {
            return ItemId::Int(n);
        }

        let trimmed = raw.trim();
        for quote in ['"', '\''] {
            if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
                return ItemId::Text(trimmed[1..trimmed.len() - 1].to_string());
            }
        }

        ItemId::Text(raw.to_string())
    }

    /// Mint a fresh random text identifier.
    pub fn generate() -> Self {
        ItemId::Text(Uuid::new_v4().to_string())
    }
}

/// Integers print bare, text prints double-quoted, so `2` and `"2"` never
/// render identically. `parse_arg` inverts this form.
impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Int(n) => write!(f, "{}", n),
            ItemId::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        ItemId::Int(n)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId::Text(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId::Text(s)
    }
}
