//! 管理页题目表格

use colored::Colorize;

use crate::models::Question;
use crate::presentation::styles::difficulty_color;
use crate::utils::logging::truncate_text;

const TITLE_WIDTH: usize = 48;

/// 渲染题目表格：标题 / 分类 / 难度 / ID
pub fn render_admin_table(questions: &[Question]) -> String {
    let title_width = questions
        .iter()
        .map(|q| truncate_text(&q.title, TITLE_WIDTH).chars().count())
        .chain(std::iter::once("Title".len()))
        .max()
        .unwrap_or(0);
    let category_width = questions
        .iter()
        .map(|q| q.category_name.chars().count())
        .chain(std::iter::once("Category".len()))
        .max()
        .unwrap_or(0);

    let header = format!(
        "{:<tw$}  {:<cw$}  {:<10}  {}",
        "Title",
        "Category",
        "Difficulty",
        "ID",
        tw = title_width,
        cw = category_width
    );
    let mut output = format!("{}\n{}\n", header.bold(), "─".repeat(header.chars().count()));

    for q in questions {
        let difficulty = format!("{:<10}", q.difficulty.as_str());
        output.push_str(&format!(
            "{:<tw$}  {:<cw$}  {}  {}\n",
            truncate_text(&q.title, TITLE_WIDTH),
            q.category_name,
            difficulty.color(difficulty_color(&q.difficulty)),
            q.id.dimmed(),
            tw = title_width,
            cw = category_width
        ));
    }
    output
}
