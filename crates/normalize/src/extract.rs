use serde_json::{json, Map, Value};

/// Upper bound on `{` positions tried before giving up on a string.
const MAX_CANDIDATES: usize = 32;

/// Outcome of pulling a structured result out of a free-text field.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// A JSON object was found; it is handled as if it had arrived directly.
    Parsed(Map<String, Value>),
    /// Nothing parseable was found. Carries the original text.
    Degraded(String),
}

impl Extraction {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }

    /// Degraded text becomes `{status: "error", verification_result: <text>}`.
    pub fn into_value(self) -> Value {
        match self {
            Self::Parsed(object) => Value::Object(object),
            Self::Degraded(text) => json!({
                "status": "error",
                "verification_result": text,
            }),
        }
    }
}

/// Finds the first balanced `{ … }` in `text` that parses as a JSON object.
///
/// Braces are counted rather than matched with a pattern, so nested objects and braces
/// inside string literals are handled. A candidate that balances but does not parse is
/// skipped whole. Never fails: no candidate means `Degraded`.
pub fn extract_embedded(text: &str) -> Extraction {
    let mut from = 0;
    for _ in 0..MAX_CANDIDATES {
        let Some(offset) = text[from..].find('{') else {
            break;
        };
        let start = from + offset;
        // An unclosed candidate swallows every later brace.
        let Some(end) = balanced_end(text, start) else {
            break;
        };
        if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(&text[start..end]) {
            return Extraction::Parsed(object);
        }
        // Fragments nested inside a malformed object are never tried on their own.
        from = end;
    }
    Extraction::Degraded(text.to_owned())
}

/// Byte index one past the `}` closing the `{` at `start`, if it closes.
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, byte) in text.as_bytes()[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if *byte == b'\\' {
                escaped = true;
            } else if *byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset + 1);
                }
            }
            _ => {}
        }
    }
    None
}
