//! Prompt sent to the completion provider.

/// Instructions for a safety-focused summary (nighttime safety, community
/// atmosphere, public order, transit convenience, emergency response; at most
/// 100 characters), 2-6 keywords, and a strict JSON reply.
const PROMPT_TEMPLATE: &str = r#"请分析以下关于居住安全性的评价文本，完成以下任务：

1. 提取并凝练总结与安全相关的关键点（重点关注：夜间安全、社区氛围、公共秩序、交通便利、危机应对等方面）
2. 提取2-6个关键词（用逗号分隔）
3. 关键词尽量凝练简洁

评价文本：
{review}

请以JSON格式返回结果，格式如下：
{
    "summary": "凝练总结的关键点（100字以内）",
    "keywords": ["关键词1", "关键词2", "关键词3", ...]
}"#;

pub fn build_prompt(review: &str) -> String {
    PROMPT_TEMPLATE.replacen("{review}", review, 1)
}
