use serde::{Deserialize, Deserializer, Serialize};

/// Normalized unit of generated marketing copy.
///
/// A record carrying only social fields mirrors its caption into
/// `blog_content` and its headline into `blog_title`; a record carrying only
/// blog fields leaves `headline` empty (a blog post has no hook). Once placed
/// in the version ledger a record is never mutated in place — the
/// modification flow always produces a new one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default, deserialize_with = "hashtags_seq_or_string")]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub blog_title: String,
    #[serde(default)]
    pub blog_content: String,
}

impl ContentRecord {
    pub fn is_empty(&self) -> bool {
        self.headline.is_empty()
            && self.caption.is_empty()
            && self.hashtags.is_empty()
            && self.blog_title.is_empty()
            && self.blog_content.is_empty()
    }

    /// Check the fields a generation result must carry before it may enter
    /// the version ledger.
    pub fn validate_required(&self) -> Result<(), MissingFieldError> {
        if self.caption.trim().is_empty() && self.blog_content.trim().is_empty() {
            return Err(MissingFieldError {
                field: "caption".to_string(),
            });
        }
        Ok(())
    }
}

/// A generation result arrived without a field the UI cannot render without.
#[derive(Debug, thiserror::Error)]
#[error("Generation result is missing required field `{field}`")]
pub struct MissingFieldError {
    pub field: String,
}

/// Normalize a list of tag tokens: trim, prefix `#` where missing, drop
/// empties, drop duplicates while preserving first-seen order.
pub fn normalize_hashtags<I, S>(tokens: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: Vec<String> = Vec::new();
    for token in tokens {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() || trimmed == "#" {
            continue;
        }
        let tag = if trimmed.starts_with('#') {
            trimmed.to_string()
        } else {
            format!("#{trimmed}")
        };
        if !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    seen
}

/// Split a hashtag section body on line breaks and whitespace, keeping only
/// tokens that already carry a `#` prefix, deduplicated in first-seen order.
pub fn split_hashtag_block(text: &str) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for token in text.split_whitespace() {
        if token.len() > 1 && token.starts_with('#') && !seen.iter().any(|t| t == token) {
            seen.push(token.to_string());
        }
    }
    seen
}

/// Engine responses deliver `hashtags` either as a JSON array or as a single
/// whitespace-delimited string. Accept both.
fn hashtags_seq_or_string<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SeqOrString {
        Seq(Vec<String>),
        Delimited(String),
    }

    Ok(match SeqOrString::deserialize(deserializer)? {
        SeqOrString::Seq(tags) => normalize_hashtags(tags),
        SeqOrString::Delimited(text) => normalize_hashtags(text.split_whitespace()),
    })
}
