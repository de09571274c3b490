//! Long-form article dialect: `[제목]` title, optional `[3줄 요약]` summary,
//! `[본문]` body, optional `[태그]` tag list, optional trailing footnote.

use crate::models::content::{split_hashtag_block, ContentRecord};
use crate::parser::sections;

/// Parse long-form dialect text. The title maps to `blog_title` only —
/// `headline` stays empty, a blog post has no hook. Summary and body are
/// joined with a blank line and mirrored into `caption` for the social
/// surface.
pub fn parse(content: &str) -> ContentRecord {
    let mut record = ContentRecord::default();

    if let Some(title) = sections::section(content, "제목") {
        record.blog_title = title;
    }

    let mut body_parts = Vec::new();
    if let Some(summary) = sections::section(content, "3줄 요약") {
        body_parts.push(summary);
    }
    if let Some(body) = sections::section(content, "본문") {
        body_parts.push(body);
    }
    if !body_parts.is_empty() {
        let body = body_parts.join("\n\n");
        record.caption = body.clone();
        record.blog_content = body;
    }

    if let Some(tags) = sections::section(content, "태그") {
        record.hashtags = split_hashtag_block(&tags);
    }

    if let Some(note) = sections::footnote(content) {
        sections::append_footnote(&mut record.blog_content, &note);
        sections::append_footnote(&mut record.caption, &note);
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_article_text() {
        let text = "[제목]\nSpring skin care\n[3줄 요약]\nShort summary\n[본문]\nLong body text\n[태그]\n#skin #care";
        let record = parse(text);
        assert_eq!(record.blog_title, "Spring skin care");
        assert_eq!(record.blog_content, "Short summary\n\nLong body text");
        assert_eq!(record.caption, record.blog_content);
        assert_eq!(record.hashtags, vec!["#skin", "#care"]);
    }

    #[test]
    fn test_headline_always_empty() {
        let text = "[제목]\nTitle\n[본문]\nBody";
        let record = parse(text);
        assert_eq!(record.headline, "");
    }

    #[test]
    fn test_body_without_summary() {
        let text = "[제목]\nTitle\n[본문]\nJust the body";
        let record = parse(text);
        assert_eq!(record.blog_content, "Just the body");
    }

    #[test]
    fn test_missing_tag_section_is_empty() {
        let text = "[제목]\nTitle\n[본문]\nBody";
        assert!(parse(text).hashtags.is_empty());
    }

    #[test]
    fn test_footnote_excluded_from_body_then_appended() {
        let text = "[제목]\nTitle\n[본문]\nBody text\n------\n※ medical disclaimer";
        let record = parse(text);
        assert_eq!(record.blog_content, "Body text\n\n※ medical disclaimer");
        assert_eq!(record.blog_content.matches("※ medical disclaimer").count(), 1);
    }
}
