//! 题目搜索
//!
//! 在已读取的题目列表上做不区分大小写的子串匹配

use crate::models::Question;

/// 题目是否匹配搜索词（标题 / 描述 / 答案）
pub fn matches_query(question: &Question, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    [&question.title, &question.description, &question.answer]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// 过滤题目列表，空搜索词返回全部，保持原有顺序
pub fn filter_questions(questions: Vec<Question>, query: &str) -> Vec<Question> {
    questions
        .into_iter()
        .filter(|q| matches_query(q, query))
        .collect()
}
