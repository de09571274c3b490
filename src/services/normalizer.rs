//! Response normalization: turn an arbitrarily shaped engine payload into a
//! [`ContentRecord`].
//!
//! The engine returns objects, arrays or bare text, and the text itself may
//! be dialect-marked prose, inline JSON, a fenced JSON block, or JSON-like
//! wreckage. Normalization walks a fallback ladder and never raises: when
//! something unexpected happens the original payload is echoed back raw and
//! the caller decides what to do with it.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::models::content::{normalize_hashtags, ContentRecord};
use crate::parser::{self, extract};

/// Outcome of normalization: a structured record, or the unparsed payload
/// echoed back when normalization itself misbehaved. Callers must validate
/// required fields before use either way.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Record(ContentRecord),
    Raw(Value),
}

impl Normalized {
    pub fn into_record(self) -> Option<ContentRecord> {
        match self {
            Normalized::Record(record) => Some(record),
            Normalized::Raw(_) => None,
        }
    }
}

/// Normalize a raw webhook/job response payload. Side-effect-free apart
/// from tracing.
pub fn normalize(payload: &Value) -> Normalized {
    match normalize_inner(payload) {
        Ok(record) => Normalized::Record(record),
        Err(err) => {
            warn!(error = %err, "normalization failed, echoing raw payload");
            Normalized::Raw(payload.clone())
        }
    }
}

fn normalize_inner(payload: &Value) -> Result<ContentRecord, serde_json::Error> {
    // A sequence payload stands for its first element.
    let element = match payload {
        Value::Array(items) => match items.first() {
            Some(first) => first,
            None => return Ok(ContentRecord::default()),
        },
        other => other,
    };

    let content = element
        .get("output")
        .and_then(Value::as_str)
        .or_else(|| element.get("content").and_then(Value::as_str));
    let content = match content {
        Some(text) if !text.trim().is_empty() => text,
        _ => {
            // Direct-data fallback: when no usable text is present, a `data`
            // object is already field-shaped, no dialect detection involved.
            if let Some(data) = element.get("data").filter(|d| d.is_object()) {
                return serde_json::from_value(data.clone());
            }
            return Ok(ContentRecord::default());
        }
    };

    if parser::has_markers(content) {
        let dialect = parser::detect(content);
        debug!(%dialect, len = content.len(), "parsing dialect-marked output");
        return Ok(parser::parse(dialect, content));
    }

    if let Some(record) = parse_inline_json(content) {
        return Ok(reconcile(record));
    }

    if looks_structured(content) {
        return Ok(extract_record(content));
    }

    // Permissive fallback: unmarked prose goes through the social parser,
    // which yields an empty record rather than an error.
    Ok(parser::parse(parser::Dialect::Social, content))
}

/// Whole-text JSON, tolerating the engine's occasional literal `json{...}`
/// prefix.
fn parse_inline_json(content: &str) -> Option<ContentRecord> {
    let trimmed = content.trim();
    let candidate = trimmed
        .strip_prefix("json")
        .map(str::trim_start)
        .filter(|c| c.starts_with('{'))
        .unwrap_or(trimmed);
    if !candidate.starts_with('{') {
        return None;
    }
    serde_json::from_str(candidate).ok()
}

/// Heuristic gate for the per-field extraction ladder: quoted keys with
/// colons suggest broken JSON rather than prose.
fn looks_structured(content: &str) -> bool {
    content.contains('"') && content.contains(':')
}

/// Field-by-field recovery: a fenced ```json block is mined first, then the
/// extractor strategy table fills whatever is still missing, then the two
/// cross-field fallbacks reconcile blog fields.
fn extract_record(content: &str) -> ContentRecord {
    let mut record = ContentRecord::default();
    let mut hashtags_found = false;

    if let Some(block) = fenced_json_block(content) {
        if let Ok(parsed) = serde_json::from_str::<Value>(&block) {
            for (field, slot) in [
                ("headline", &mut record.headline),
                ("caption", &mut record.caption),
                ("blog_title", &mut record.blog_title),
                ("blog_content", &mut record.blog_content),
            ] {
                if let Some(value) = parsed.get(field).and_then(Value::as_str) {
                    *slot = value.to_string();
                }
            }
            match parsed.get("hashtags") {
                Some(Value::String(text)) => {
                    record.hashtags = normalize_hashtags(text.split_whitespace());
                    hashtags_found = true;
                }
                Some(Value::Array(items)) => {
                    record.hashtags =
                        normalize_hashtags(items.iter().filter_map(Value::as_str));
                    hashtags_found = true;
                }
                _ => {}
            }
        }
    }

    if record.headline.is_empty() {
        record.headline = extract::extract_field("headline", content);
    }
    if record.caption.is_empty() {
        record.caption = extract::extract_field("caption", content);
    }
    if record.blog_title.is_empty() {
        record.blog_title = extract::extract_field("blog_title", content);
    }
    if record.blog_content.is_empty() {
        record.blog_content = extract::extract_field("blog_content", content);
    }
    if !hashtags_found {
        record.hashtags = extract::extract_hashtags(content);
    }

    reconcile(record)
}

/// The only implicit cross-field fallbacks: a titled post with no body
/// borrows the caption, a body with no title borrows the headline. All
/// other fields default independently.
fn reconcile(mut record: ContentRecord) -> ContentRecord {
    if !record.blog_title.is_empty()
        && record.blog_content.is_empty()
        && !record.caption.is_empty()
    {
        record.blog_content = record.caption.clone();
    }
    if record.blog_title.is_empty() && !record.headline.is_empty() {
        record.blog_title = record.headline.clone();
    }
    record
}

fn fenced_json_block(content: &str) -> Option<String> {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE
        .get_or_init(|| Regex::new(r"(?s)```json\s*\n(.+?)\n```").expect("static pattern"));
    fence
        .captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}
