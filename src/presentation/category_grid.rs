//! 分类列表显示

use colored::Colorize;

use crate::models::CategoryWithCount;
use crate::presentation::styles::category_style;

/// 渲染分类列表
///
/// 每个分类一行：选中标记、图标、名称、题目数量、logo 地址
pub fn render_category_grid(categories: &[CategoryWithCount], selected: Option<&str>) -> String {
    let width = categories
        .iter()
        .map(|c| c.category.name.chars().count())
        .max()
        .unwrap_or(0);

    let mut output = String::new();
    for entry in categories {
        let category = &entry.category;
        let style = category_style(&category.name);
        let is_selected = selected == Some(category.id.as_str());

        let pointer = if is_selected { "▶" } else { " " };
        let padded = format!("{:<width$}", category.name, width = width);
        let name = if is_selected {
            padded.color(style.color).bold().underline()
        } else {
            padded.color(style.color)
        };

        output.push_str(&format!(
            "{} {:>2} {}  {}",
            pointer,
            style.marker,
            name,
            question_count(entry.question_count)
        ));
        if let Some(logo) = &category.logo_url {
            output.push_str(&format!("  {}", logo.dimmed()));
        }
        output.push('\n');
    }
    output
}

fn question_count(count: usize) -> String {
    match count {
        1 => "1 question".to_string(),
        n => format!("{} questions", n),
    }
}
