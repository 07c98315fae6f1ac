use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::EmptyIdentifierPolicy;
use crate::error::{Result, TranslateError};

static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new("[^A-Za-z0-9]+").expect("separator regex is valid"));

/// `get-user/{id}` -> `getUserId`
///
/// Splits on runs of anything outside `[A-Za-z0-9]` and camel-cases the
/// segments. The first segment is kept as written.
pub fn sanitize_identifier(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for (idx, segment) in SEPARATORS.split(raw).filter(|s| !s.is_empty()).enumerate() {
        if idx == 0 {
            out.push_str(segment);
            continue;
        }
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Sanitizes and applies the empty-identifier policy.
pub fn identifier(raw: &str, policy: &EmptyIdentifierPolicy) -> Result<String> {
    let name = sanitize_identifier(raw);
    if !name.is_empty() {
        return Ok(name);
    }
    match policy {
        EmptyIdentifierPolicy::Fail => Err(TranslateError::EmptyIdentifier { raw: raw.to_string() }),
        EmptyIdentifierPolicy::Placeholder(placeholder) => {
            tracing::warn!("\"{raw}\" has no usable characters, using \"{placeholder}\"");
            Ok(placeholder.clone())
        }
    }
}
