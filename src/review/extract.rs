//! Pulling a JSON analysis out of free-form model output.
//!
//! Models wrap structured replies in Markdown fences more often than not, and
//! sometimes add prose around them. Extraction and parsing are kept apart so each
//! step can be tested on its own.

use serde::de::Error as _;
use serde::Deserialize;
use serde_json::Value;

use crate::models::ReviewAnalysis;

const FENCE: &str = "```";

/// Interior of the first fenced block opened with ```` ```{tag} ````, or of the
/// first fenced block of any kind when no tagged one exists.
///
/// The interior runs to the next closing fence, or to the end of the text when
/// the block is never closed. Returns `None` when `text` holds no fence at all.
pub fn extract_fenced_block<'a>(text: &'a str, tag: &str) -> Option<&'a str> {
    let tagged = format!("{FENCE}{tag}");
    block_after(text, &tagged).or_else(|| block_after(text, FENCE))
}

fn block_after<'a>(text: &'a str, opening: &str) -> Option<&'a str> {
    let start = text.find(opening)? + opening.len();
    let rest = &text[start..];
    let end = rest.find(FENCE).unwrap_or(rest.len());
    Some(rest[..end].trim())
}

/// The text to hand to the JSON parser: a `json` block, any block, or everything.
pub fn extract_json_payload(content: &str) -> &str {
    extract_fenced_block(content, "json").unwrap_or(content)
}

#[derive(Deserialize)]
struct RawAnalysis {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    keywords: Option<RawKeywords>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawKeywords {
    List(Vec<String>),
    /// "a, b, c" - the prompt mentions comma separation, some replies follow it.
    Joined(String),
}

impl RawKeywords {
    fn into_vec(self) -> Vec<String> {
        match self {
            RawKeywords::List(list) => list,
            RawKeywords::Joined(joined) => joined
                .split([',', '，', '、'])
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}

/// Parse a `{"summary": ..., "keywords": [...]}` object.
///
/// Missing or null keys default to an empty summary and no keywords.
pub fn parse_analysis(payload: &str) -> serde_json::Result<ReviewAnalysis> {
    let value: Value = serde_json::from_str(payload)?;
    if !value.is_object() {
        return Err(serde_json::Error::custom("expected a JSON object"));
    }
    let raw = RawAnalysis::deserialize(value)?;
    Ok(ReviewAnalysis {
        summary: raw.summary.unwrap_or_default(),
        keywords: raw.keywords.map(RawKeywords::into_vec).unwrap_or_default(),
    })
}
