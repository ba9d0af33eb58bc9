//! Review analysis through a chat-completion provider.
//!
//! Model output is unreliable in format, so every failure bottoms out in a local
//! keyword scan and [`ReviewAnalysisClient::analyze_review`] always returns a
//! value.

mod client;
mod extract;
mod keywords;
mod prompt;

pub use client::ReviewAnalysisClient;
pub use extract::{extract_fenced_block, extract_json_payload, parse_analysis};
pub use keywords::{
    local_keyword_fallback, FALLBACK_KEYWORD, MAX_FALLBACK_KEYWORDS, SAFETY_VOCABULARY,
};
pub use prompt::build_prompt;
