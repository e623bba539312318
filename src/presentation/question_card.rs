//! 题目卡片显示
//!
//! 折叠时只显示标题和描述，展开后显示渲染后的答案

use colored::Colorize;

use crate::models::Question;
use crate::presentation::styles::{category_badge, difficulty_badge};
use crate::services::answer_renderer::{render_answer, AnswerBlock};

/// 列表为空时的提示
pub const EMPTY_LIST_MESSAGE: &str = "No questions found matching your criteria.";

const INDENT: &str = "    ";

/// 渲染单个题目卡片
pub fn render_question_card(question: &Question, expanded: bool) -> String {
    let mut output = format!(
        "{} {}  {}\n{}\n{}\n",
        difficulty_badge(&question.difficulty),
        category_badge(&question.category_name),
        format!("#{}", question.id).dimmed(),
        question.title.bold(),
        question.display_description()
    );

    if !expanded {
        output.push_str(&format!("{}\n", "▸ Show Answer".cyan()));
        return output;
    }

    output.push_str(&format!("{}\n", "▾ Hide Answer".cyan()));
    let blocks = render_answer(&question.answer, question.code_example.as_deref());
    let example_index = question
        .code_example
        .as_deref()
        .filter(|c| !c.is_empty())
        .map(|_| blocks.len().saturating_sub(1));

    for (index, block) in blocks.iter().enumerate() {
        if Some(index) == example_index {
            output.push_str(&format!("{}{}\n", INDENT, "Code Example:".bold()));
        }
        output.push_str(&render_block(block));
    }
    output
}

fn render_block(block: &AnswerBlock) -> String {
    match block {
        AnswerBlock::Paragraph { text } => format!("{}{}\n", INDENT, text),
        AnswerBlock::Code { language, code } => {
            let mut out = format!(
                "{}{}\n",
                INDENT,
                format!("┌─ {}", language.as_deref().unwrap_or("code")).dimmed()
            );
            for line in code.lines() {
                out.push_str(&format!("{}{} {}\n", INDENT, "│".dimmed(), line.green()));
            }
            out.push_str(&format!("{}{}\n", INDENT, "└─".dimmed()));
            out
        }
    }
}

/// 渲染题目列表，空列表显示提示语
pub fn render_question_list(questions: &[Question], expanded: bool) -> String {
    if questions.is_empty() {
        return format!("{}\n", EMPTY_LIST_MESSAGE);
    }
    questions
        .iter()
        .map(|q| render_question_card(q, expanded))
        .collect::<Vec<_>>()
        .join("\n")
}
