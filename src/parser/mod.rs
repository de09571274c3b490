//! Format parsers for the two recognized engine output dialects.
//!
//! Parsing is pure and never fails: unrecognized or partially broken input
//! degrades to a best-effort partial record, worst case an empty one.

pub mod article;
pub mod extract;
mod sections;
pub mod social;

use strum::Display;
use tracing::warn;

use crate::models::content::ContentRecord;

/// One of the two recognized raw-text output shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Dialect {
    Social,
    LongForm,
}

/// True when the text carries either dialect's structural markers.
pub fn has_markers(content: &str) -> bool {
    has_long_form_markers(content) || has_social_markers(content)
}

fn has_long_form_markers(content: &str) -> bool {
    content.contains("[제목]") && content.contains("[본문]")
}

fn has_social_markers(content: &str) -> bool {
    content.contains("[후킹문구]") && content.contains("[캡션]")
}

/// Classify raw text by its structural markers.
///
/// Deterministic priority: title+body markers decide long-form before
/// hook+caption decide social; text with neither marker set falls back to
/// social (permissive default). Input carrying both marker sets is parsed
/// as long-form and flagged for review.
pub fn detect(content: &str) -> Dialect {
    let long_form = has_long_form_markers(content);
    let social = has_social_markers(content);

    if long_form && social {
        warn!("response carries both dialect marker sets, parsing as long-form");
    }

    if long_form {
        Dialect::LongForm
    } else {
        Dialect::Social
    }
}

/// Parse raw text under the given dialect into a normalized record.
pub fn parse(dialect: Dialect, raw_text: &str) -> ContentRecord {
    match dialect {
        Dialect::Social => social::parse(raw_text),
        Dialect::LongForm => article::parse(raw_text),
    }
}
