//! Social-caption dialect: `[후킹문구]` hook, `[캡션]` caption body,
//! `[해시태그]` hashtag list, optional trailing footnote block.

use crate::models::content::{split_hashtag_block, ContentRecord};
use crate::parser::sections;

/// Parse social-dialect text. Each section is optional; missing sections
/// default to empty. The caption is mirrored into the blog fields so a
/// social-only result still renders on the blog surface.
pub fn parse(content: &str) -> ContentRecord {
    let mut record = ContentRecord::default();

    if let Some(hook) = sections::section(content, "후킹문구") {
        record.headline = hook;
    }

    if let Some(caption) = sections::section(content, "캡션") {
        record.blog_content = caption.clone();
        record.caption = caption;
        record.blog_title = record.headline.clone();
    }

    if let Some(note) = sections::footnote(content) {
        sections::append_footnote(&mut record.caption, &note);
        sections::append_footnote(&mut record.blog_content, &note);
    }

    if let Some(tags) = sections::section(content, "해시태그") {
        record.hashtags = split_hashtag_block(&tags);
    }

    record
}
