//! 答案渲染 - 业务能力层
//!
//! 把存储的答案文本拆成可显示的块：段落 / 代码块。
//! 纯函数，同样的输入总是得到同样的输出。

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// 显示块
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerBlock {
    /// 一行非空文本
    Paragraph { text: String },
    /// 代码块，语言标记只用于显示
    Code {
        language: Option<String>,
        code: String,
    },
}

impl AnswerBlock {
    pub fn paragraph(text: impl Into<String>) -> Self {
        AnswerBlock::Paragraph { text: text.into() }
    }

    pub fn code(language: Option<&str>, code: impl Into<String>) -> Self {
        AnswerBlock::Code {
            language: language.map(str::to_string),
            code: code.into(),
        }
    }
}

/// 三个反引号包围的片段（非贪婪，可跨行）
fn fence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)```.*?```").expect("fence pattern is valid"))
}

/// 代码块内部结构：可选语言标记 + 换行 + 代码
fn fence_body_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)\A```(\w+)?\n(.*?)```").expect("fence body pattern is valid")
    })
}

/// 渲染答案
///
/// # 参数
/// - `answer`: 答案文本，可包含 ```` ```lang ```` 代码块
/// - `code_example`: 单独存储的代码示例，非空时作为最后一个代码块追加（无语言标记）
///
/// # 规则
/// - 代码块之外的文本按换行拆分，每个非空行（去除首尾空白）是一个段落
/// - 代码块内容去除首尾空白
/// - 开头标记后没有换行的代码块不产生任何块
/// - 没有结束标记的代码块不会被识别，按普通文本处理
/// - `\r\n` 换行按 `\n` 处理
pub fn render_answer(answer: &str, code_example: Option<&str>) -> Vec<AnswerBlock> {
    let answer = answer.replace("\r\n", "\n");
    let answer = answer.as_str();
    let mut blocks = Vec::new();
    let mut cursor = 0;

    for fence in fence_pattern().find_iter(answer) {
        push_paragraphs(&mut blocks, &answer[cursor..fence.start()]);
        if let Some(block) = parse_fence(fence.as_str()) {
            blocks.push(block);
        }
        cursor = fence.end();
    }
    push_paragraphs(&mut blocks, &answer[cursor..]);

    if let Some(code) = code_example.filter(|c| !c.is_empty()) {
        blocks.push(AnswerBlock::code(None, code.replace("\r\n", "\n").trim()));
    }

    blocks
}

fn push_paragraphs(blocks: &mut Vec<AnswerBlock>, text: &str) {
    blocks.extend(
        text.split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(AnswerBlock::paragraph),
    );
}

fn parse_fence(fence: &str) -> Option<AnswerBlock> {
    let caps = fence_body_pattern().captures(fence)?;
    let language = caps.get(1).map(|m| m.as_str());
    let code = caps.get(2).map_or("", |m| m.as_str()).trim();
    Some(AnswerBlock::code(language, code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_lines_become_paragraphs() {
        let blocks = render_answer("first\n\n  second  \n\t\nthird", None);
        assert_eq!(
            blocks,
            vec![
                AnswerBlock::paragraph("first"),
                AnswerBlock::paragraph("second"),
                AnswerBlock::paragraph("third"),
            ]
        );
    }

    #[test]
    fn test_fenced_block_with_language() {
        let blocks = render_answer("A\n\n```js\nconsole.log(1)\n```\n\nB", None);
        assert_eq!(
            blocks,
            vec![
                AnswerBlock::paragraph("A"),
                AnswerBlock::code(Some("js"), "console.log(1)"),
                AnswerBlock::paragraph("B"),
            ]
        );
    }

    #[test]
    fn test_crlf_answer_keeps_code_block() {
        let blocks = render_answer(
            "Intro\r\n```js\r\nconst a = 1;\r\nconsole.log(a)\r\n```\r\nOutro",
            Some("let b = 2;\r\nb\r\n"),
        );
        assert_eq!(
            blocks,
            vec![
                AnswerBlock::paragraph("Intro"),
                AnswerBlock::code(Some("js"), "const a = 1;\nconsole.log(a)"),
                AnswerBlock::paragraph("Outro"),
                AnswerBlock::code(None, "let b = 2;\nb"),
            ]
        );
    }

    #[test]
    fn test_fence_without_language() {
        let blocks = render_answer("```\nlet x = 1;\n\nlet y = 2;\n```", None);
        assert_eq!(blocks, vec![AnswerBlock::code(None, "let x = 1;\n\nlet y = 2;")]);
    }

    #[test]
    fn test_code_example_is_appended_last() {
        let blocks = render_answer("```ts\ntype A = string;\n```\ntext", Some("  fn main() {}\n"));
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[2], AnswerBlock::code(None, "fn main() {}"));
    }

    #[test]
    fn test_code_example_with_empty_answer() {
        let blocks = render_answer("", Some("x"));
        assert_eq!(blocks, vec![AnswerBlock::code(None, "x")]);
    }

    #[test]
    fn test_empty_inputs_yield_nothing() {
        assert!(render_answer("", None).is_empty());
        assert!(render_answer("", Some("")).is_empty());
    }

    #[test]
    fn test_unterminated_fence_is_plain_text() {
        let blocks = render_answer("intro\n```py\nprint(1)", None);
        assert_eq!(
            blocks,
            vec![
                AnswerBlock::paragraph("intro"),
                AnswerBlock::paragraph("```py"),
                AnswerBlock::paragraph("print(1)"),
            ]
        );
    }

    #[test]
    fn test_inline_fence_without_newline_is_dropped() {
        let blocks = render_answer("before ```inline``` after", None);
        assert_eq!(
            blocks,
            vec![AnswerBlock::paragraph("before"), AnswerBlock::paragraph("after")]
        );
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let answer = "Intro\n```rust\nfn a() {}\n```\nOutro";
        assert_eq!(render_answer(answer, Some("b")), render_answer(answer, Some("b")));
    }
}
