//! 导入行上下文
//!
//! 封装"我正在处理 CSV 的第几行、哪道题"这一信息

use std::fmt::Display;

use crate::utils::logging::truncate_text;

/// 导入行上下文
#[derive(Debug, Clone)]
pub struct RowCtx {
    /// CSV 行号（表头为第 1 行）
    pub line: usize,

    /// 题目标题
    pub title: String,
}

impl RowCtx {
    pub fn new(line: usize, title: impl Into<String>) -> Self {
        Self {
            line,
            title: title.into(),
        }
    }
}

impl Display for RowCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[行 {} 题目 '{}']",
            self.line,
            truncate_text(&self.title, 30)
        )
    }
}
