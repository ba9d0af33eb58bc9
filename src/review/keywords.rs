//! Vocabulary scan used when the model cannot be reached or understood.

/// Safety terms in priority order: safety, danger, lighting, surveillance,
/// public order, women, nighttime, traffic, convenience, emergency, police
/// report, community, atmosphere, order.
pub const SAFETY_VOCABULARY: [&str; 14] = [
    "安全", "危险", "照明", "监控", "治安", "女性", "夜间", "交通", "便利", "紧急", "报警", "社区",
    "氛围", "秩序",
];

/// Returned alone when no vocabulary term occurs ("safety review").
pub const FALLBACK_KEYWORD: &str = "安全评价";

pub const MAX_FALLBACK_KEYWORDS: usize = 10;

/// Vocabulary terms occurring in `text`, in vocabulary order. Never empty.
pub fn local_keyword_fallback(text: &str) -> Vec<String> {
    let found: Vec<String> = SAFETY_VOCABULARY
        .iter()
        .filter(|term| text.contains(*term))
        .take(MAX_FALLBACK_KEYWORDS)
        .map(|term| term.to_string())
        .collect();

    if found.is_empty() {
        vec![FALLBACK_KEYWORD.to_string()]
    } else {
        found
    }
}
