//! Last-resort field extraction for engine output that looks like JSON but
//! does not parse as JSON (truncated, mis-escaped, or prose-wrapped).
//!
//! Each field is tried against an ordered table of independent extractor
//! strategies; the first hit wins. Keeping the strategies as a table keeps
//! the fallback priority auditable and testable in isolation.

use regex::Regex;
use tracing::trace;

use crate::models::content::normalize_hashtags;

type FieldExtractor = fn(&str, &str) -> Option<String>;

/// Strategy table, in priority order: quoted string value, escaped/empty
/// marker, bare unquoted token.
const FIELD_STRATEGIES: &[(&str, FieldExtractor)] = &[
    ("quoted", extract_quoted),
    ("escaped_empty", extract_escaped_empty),
    ("bare", extract_bare),
];

/// Extract a single scalar field, returning an empty string when no
/// strategy matches.
pub fn extract_field(field: &str, content: &str) -> String {
    for (name, strategy) in FIELD_STRATEGIES {
        if let Some(value) = strategy(field, content) {
            trace!(field, strategy = name, "field extracted");
            return value;
        }
    }
    String::new()
}

/// `"field": "value"` — possibly unterminated at end of input. Escaped
/// characters inside the value (`\"`, `\n`) do not close it.
fn extract_quoted(field: &str, content: &str) -> Option<String> {
    let pattern = format!(
        r#"(?s)"{}"\s*:\s*"((?:[^"\\]|\\.)+?)(?:"|$)"#,
        regex::escape(field)
    );
    let re = Regex::new(&pattern).ok()?;
    let captured = re.captures(content)?.get(1)?.as_str().trim();
    Some(captured.replace("\\\"", "\"").replace("\\n", "\n"))
}

/// `"field": \` or `"field": "` with nothing usable behind it — an escaped
/// or empty value, extracted as the empty string.
fn extract_escaped_empty(field: &str, content: &str) -> Option<String> {
    let pattern = format!(r#""{}"\s*:\s*\\?\s*"?\s*(?:,|\}}|$)"#, regex::escape(field));
    let re = Regex::new(&pattern).ok()?;
    re.is_match(content).then(String::new)
}

/// `"field": value` — unquoted token up to the next delimiter.
fn extract_bare(field: &str, content: &str) -> Option<String> {
    let pattern = format!(r#""{}"\s*:\s*([^,\}}\]"]+)"#, regex::escape(field));
    let re = Regex::new(&pattern).ok()?;
    let captured = re.captures(content)?.get(1)?.as_str().trim();
    if captured.is_empty() {
        None
    } else {
        Some(captured.to_string())
    }
}

/// Extract the hashtag list. Fallback order: bracketed list of quoted
/// tokens, else a single quoted delimited string split on whitespace, else
/// empty.
pub fn extract_hashtags(content: &str) -> Vec<String> {
    if let Some(items) = extract_hashtag_array(content) {
        return items;
    }
    if let Some(delimited) = extract_quoted("hashtags", content) {
        if !delimited.is_empty() {
            return normalize_hashtags(delimited.split_whitespace());
        }
    }
    Vec::new()
}

fn extract_hashtag_array(content: &str) -> Option<Vec<String>> {
    static ARRAY: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    static ITEM: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    let array = ARRAY.get_or_init(|| {
        Regex::new(r#"(?s)"hashtags"\s*:\s*\[\s*((?:"[^"]*"(?:\s*,\s*)?)*)\s*\]"#)
            .expect("static pattern")
    });
    let item = ITEM.get_or_init(|| Regex::new(r#""([^"]*)""#).expect("static pattern"));

    let body = array.captures(content)?.get(1)?.as_str();
    let tags = item
        .captures_iter(body)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string());
    Some(normalize_hashtags(tags))
}
