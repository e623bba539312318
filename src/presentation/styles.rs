//! 终端配色表
//!
//! 分类名称 → 颜色的查找表，未知分类使用默认配色

use colored::{Color, ColoredString, Colorize};
use phf::phf_map;

use crate::models::Difficulty;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStyle {
    pub color: Color,
    /// 标记符号，无颜色输出时用于区分分类
    pub marker: &'static str,
}

const DEFAULT_STYLE: CategoryStyle = CategoryStyle {
    color: Color::White,
    marker: "·",
};

static CATEGORY_STYLES: phf::Map<&'static str, CategoryStyle> = phf_map! {
    "JavaScript" => CategoryStyle { color: Color::Yellow, marker: "JS" },
    "TypeScript" => CategoryStyle { color: Color::Blue, marker: "TS" },
    "React" => CategoryStyle { color: Color::Cyan, marker: "⚛" },
    "Redux" => CategoryStyle { color: Color::Magenta, marker: "◆" },
    "Next.js" => CategoryStyle { color: Color::BrightBlack, marker: "▲" },
    "HTML" => CategoryStyle { color: Color::TrueColor { r: 234, g: 88, b: 12 }, marker: "<>" },
    "CSS" => CategoryStyle { color: Color::BrightMagenta, marker: "#" },
};

/// 分类配色（名称区分大小写）
pub fn category_style(name: &str) -> CategoryStyle {
    CATEGORY_STYLES.get(name).copied().unwrap_or(DEFAULT_STYLE)
}

pub fn difficulty_color(difficulty: &Difficulty) -> Color {
    match difficulty {
        Difficulty::Easy => Color::Green,
        Difficulty::Medium => Color::Yellow,
        Difficulty::Hard => Color::Red,
        Difficulty::Other(_) => Color::White,
    }
}

/// 难度标签 `[Easy]`
pub fn difficulty_badge(difficulty: &Difficulty) -> ColoredString {
    format!("[{}]", difficulty)
        .color(difficulty_color(difficulty))
        .bold()
}

/// 分类标签 `[React]`
pub fn category_badge(name: &str) -> ColoredString {
    format!("[{}]", name).color(category_style(name).color)
}
