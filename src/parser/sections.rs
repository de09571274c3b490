//! Shared section scanning for the bracketed-header output dialects.
//!
//! Engine output marks sections with literal bracketed headers on their own
//! line (`[후킹문구]`, `[캡션]`, `[제목]`, ...). A section body runs until the
//! next bracketed header line, the footnote separator, or a blank line
//! followed by a `※` disclosure line. The boundary set is the union of what
//! the two historical webhook clients accepted.

/// Separator line introducing the trailing footnote block.
const FOOTNOTE_SEPARATOR: &str = "------";

/// Extract the trimmed body of the section introduced by `[header]`.
/// Returns `None` when the marker is absent or the body is empty.
pub(crate) fn section(content: &str, header: &str) -> Option<String> {
    let marker = format!("[{header}]");
    let start = content.find(&marker)? + marker.len();
    let rest = &content[start..];
    // Body starts on the line after the marker.
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => return None,
    };
    let body = &body[..section_end(body)];
    let body = body.trim();
    if body.is_empty() {
        None
    } else {
        Some(body.to_string())
    }
}

/// Byte offset where a section body ends.
fn section_end(body: &str) -> usize {
    for (idx, _) in body.match_indices('\n') {
        let following = &body[idx + 1..];
        let line = following.lines().next().unwrap_or("");
        if line.starts_with('[') || line.starts_with(FOOTNOTE_SEPARATOR) {
            return idx;
        }
        // Blank line immediately followed by a disclosure line also closes
        // the section (some engine revisions omit the dash separator).
        if line.is_empty() && following.trim_start_matches(['\n', '\r']).starts_with('※') {
            return idx;
        }
    }
    body.len()
}

/// Extract the trailing footnote block: everything after the dash separator
/// line, provided it starts with the `※` disclosure prefix.
pub(crate) fn footnote(content: &str) -> Option<String> {
    let sep = content.find(FOOTNOTE_SEPARATOR)?;
    let after = &content[sep..];
    let body = match after.find('\n') {
        Some(idx) => after[idx + 1..].trim(),
        None => return None,
    };
    if body.starts_with('※') {
        Some(body.to_string())
    } else {
        None
    }
}

/// Append the footnote to `target` with a blank-line separator, unless the
/// footnote's anchor (its first non-empty line) is already present verbatim —
/// some engine revisions inline the disclosure themselves, and appending
/// again would duplicate it. Empty targets are left alone.
pub(crate) fn append_footnote(target: &mut String, footnote: &str) {
    if target.is_empty() {
        return;
    }
    let anchor = footnote
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or(footnote)
        .trim();
    if !anchor.is_empty() && target.contains(anchor) {
        return;
    }
    target.push_str("\n\n");
    target.push_str(footnote);
}
