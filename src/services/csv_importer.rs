//! CSV 导入解析 - 业务能力层
//!
//! 只负责"解析 + 生成写入请求"，不提交、不关心流程。
//! 提交由 `workflow::ImportFlow` 完成。

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

use crate::error::ImportError;
use crate::models::{CategoryLookup, Difficulty, NewQuestion};

/// 可识别的列名
pub const COLUMNS: [&str; 6] = [
    "title",
    "description",
    "answer",
    "category",
    "difficulty",
    "code_example",
];

/// CSV 解析方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CsvDialect {
    /// 按逗号直接拆分，不支持引号转义（字段内的逗号会导致列错位）
    #[default]
    Naive,
    /// 支持双引号包围的字段
    Quoted,
}

/// 一行数据（列名 → 值）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    /// 文件中的行号（表头为第 1 行）
    pub line: usize,
    fields: HashMap<String, String>,
}

impl CsvRow {
    pub fn new(line: usize, fields: HashMap<String, String>) -> Self {
        Self { line, fields }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// 标题，缺失时为空字符串（仅用于提示信息）
    pub fn title(&self) -> &str {
        self.get("title").unwrap_or_default()
    }
}

/// 跳过某一行的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowWarning {
    /// 分类名称不在分类表中
    UnknownCategory {
        line: usize,
        title: String,
        category: String,
    },
    /// 必填列缺失
    MissingField {
        line: usize,
        title: String,
        field: &'static str,
    },
}

impl RowWarning {
    pub fn line(&self) -> usize {
        match self {
            RowWarning::UnknownCategory { line, .. } | RowWarning::MissingField { line, .. } => {
                *line
            }
        }
    }

    pub fn title(&self) -> &str {
        match self {
            RowWarning::UnknownCategory { title, .. } | RowWarning::MissingField { title, .. } => {
                title
            }
        }
    }
}

impl fmt::Display for RowWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowWarning::UnknownCategory {
                title, category, ..
            } => write!(f, "分类 '{}' 不存在 (题目: '{}')", category, title),
            RowWarning::MissingField { title, field, .. } => {
                write!(f, "缺少必填列 '{}' (题目: '{}')", field, title)
            }
        }
    }
}

/// 待提交的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRow {
    pub line: usize,
    pub request: NewQuestion,
}

/// 导入计划：按文件顺序的写入请求 + 被跳过的行
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportPlan {
    pub requests: Vec<PlannedRow>,
    pub warnings: Vec<RowWarning>,
}

/// 解析 CSV 文本
///
/// 第一行是表头；空行被忽略；值和列名都去除首尾空白。
/// 值少于列数时缺少的列视为不存在，多余的值被忽略。
pub fn parse_csv(text: &str, dialect: CsvDialect) -> Result<Vec<CsvRow>, ImportError> {
    let rows = match dialect {
        CsvDialect::Naive => parse_naive(text),
        CsvDialect::Quoted => parse_quoted(text)?,
    };
    debug!("CSV 解析完成: {} 行数据 ({:?})", rows.len(), dialect);
    Ok(rows)
}

fn parse_naive(text: &str) -> Vec<CsvRow> {
    let mut lines = text.split('\n');
    let headers: Vec<&str> = match lines.next() {
        Some(header) => header.split(',').map(str::trim).collect(),
        None => return Vec::new(),
    };

    lines
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            let values = line.split(',').map(str::trim);
            let fields = headers
                .iter()
                .zip(values)
                .map(|(h, v)| (h.to_string(), v.to_string()))
                .collect();
            // 表头是第 1 行
            CsvRow::new(index + 2, fields)
        })
        .collect()
}

fn quoted_reader(text: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes())
}

fn parse_quoted(text: &str) -> Result<Vec<CsvRow>, ImportError> {
    let mut reader = quoted_reader(text);
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|v| v.is_empty()) {
            continue;
        }
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or_default();
        let fields = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        rows.push(CsvRow::new(line, fields));
    }
    Ok(rows)
}

/// 生成导入计划
///
/// 分类按名称精确匹配（区分大小写）；无法解析的行生成警告并跳过。
/// 难度原样保留，不在三种已知难度内时只记录警告日志。
pub fn plan_import(rows: &[CsvRow], lookup: &CategoryLookup) -> ImportPlan {
    let mut plan = ImportPlan::default();

    for row in rows {
        let title = row.title().to_string();
        let category = row.get("category").unwrap_or_default();

        let Some(category_id) = lookup.resolve(category) else {
            let warning = RowWarning::UnknownCategory {
                line: row.line,
                title,
                category: category.to_string(),
            };
            warn!("[行 {}] ⚠️ {}", row.line, warning);
            plan.warnings.push(warning);
            continue;
        };

        if let Some(field) = ["title", "answer", "difficulty"]
            .into_iter()
            .find(|f| row.get(f).is_none())
        {
            let warning = RowWarning::MissingField {
                line: row.line,
                title,
                field,
            };
            warn!("[行 {}] ⚠️ {}", row.line, warning);
            plan.warnings.push(warning);
            continue;
        }

        let difficulty = Difficulty::parse(row.get("difficulty").unwrap_or_default());
        if !difficulty.is_recognized() {
            warn!(
                "[行 {}] 难度 '{}' 不是 Easy/Medium/Hard，原样提交",
                row.line, difficulty
            );
        }

        let request = NewQuestion {
            title,
            description: row.get("description").unwrap_or_default().to_string(),
            answer: row.get("answer").unwrap_or_default().to_string(),
            category_id: category_id.to_string(),
            difficulty,
            tags: vec![category.to_string()],
            code_example: row
                .get("code_example")
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        };
        plan.requests.push(PlannedRow {
            line: row.line,
            request,
        });
    }

    plan
}

/// 表头中无法识别的列（仅用于提示），表头按指定格式解析
pub fn unknown_columns(text: &str, dialect: CsvDialect) -> Result<Vec<String>, ImportError> {
    let headers: Vec<String> = match dialect {
        CsvDialect::Naive => text
            .split('\n')
            .next()
            .map(|header| header.split(',').map(|h| h.trim().to_string()).collect())
            .unwrap_or_default(),
        CsvDialect::Quoted => quoted_reader(text)
            .headers()?
            .iter()
            .map(str::to_string)
            .collect(),
    };

    Ok(headers
        .into_iter()
        .filter(|h| !h.is_empty() && !COLUMNS.contains(&h.as_str()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn lookup() -> CategoryLookup {
        CategoryLookup::from_categories(&[
            Category {
                id: "c-js".to_string(),
                name: "JavaScript".to_string(),
                logo_url: None,
            },
            Category {
                id: "c-css".to_string(),
                name: "CSS".to_string(),
                logo_url: None,
            },
        ])
    }

    const HEADER: &str = "title,description,answer,category,difficulty";

    #[test]
    fn test_naive_parse_trims_and_skips_blank_lines() {
        let text = format!("{} \r\n Closures , What is it? , A fn ,JavaScript, Easy\r\n\r\n   \n", HEADER);
        let rows = parse_csv(&text, CsvDialect::Naive).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].get("title"), Some("Closures"));
        assert_eq!(rows[0].get("difficulty"), Some("Easy"));
        assert_eq!(rows[0].get("code_example"), None);
    }

    #[test]
    fn test_naive_parse_misaligns_on_embedded_comma() {
        let text = format!("{}\nT,\"a, b\",ans,CSS,Hard", HEADER);
        let rows = parse_csv(&text, CsvDialect::Naive).unwrap();

        assert_eq!(rows[0].get("description"), Some("\"a"));
        assert_eq!(rows[0].get("category"), Some("ans"));
    }

    #[test]
    fn test_quoted_parse_keeps_embedded_comma() {
        let text = format!("{}\nT,\"a, b\",ans,CSS,Hard\n", HEADER);
        let rows = parse_csv(&text, CsvDialect::Quoted).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("description"), Some("a, b"));
        assert_eq!(rows[0].get("category"), Some("CSS"));
    }

    #[test]
    fn test_empty_text_has_no_rows() {
        assert!(parse_csv("", CsvDialect::Naive).unwrap().is_empty());
        assert!(parse_csv(HEADER, CsvDialect::Naive).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_category_yields_one_warning() {
        let text = format!("{}\nFlexbox,desc,ans,Tailwind,Easy", HEADER);
        let rows = parse_csv(&text, CsvDialect::Naive).unwrap();
        let plan = plan_import(&rows, &lookup());

        assert!(plan.requests.is_empty());
        assert_eq!(
            plan.warnings,
            vec![RowWarning::UnknownCategory {
                line: 2,
                title: "Flexbox".to_string(),
                category: "Tailwind".to_string(),
            }]
        );
        let message = plan.warnings[0].to_string();
        assert!(message.contains("Flexbox") && message.contains("Tailwind"));
    }

    #[test]
    fn test_category_match_is_case_sensitive() {
        let text = format!("{}\nT,d,a,css,Easy", HEADER);
        let rows = parse_csv(&text, CsvDialect::Naive).unwrap();
        let plan = plan_import(&rows, &lookup());
        assert_eq!(plan.warnings.len(), 1);
    }

    #[test]
    fn test_request_fields() {
        let text = "title,description,answer,category,difficulty,code_example\n\
                    Hoisting,Explain,Declarations move up,JavaScript,Insane,\n\
                    Box model,Explain,Content padding border,CSS,Medium,div { }";
        let rows = parse_csv(text, CsvDialect::Naive).unwrap();
        let plan = plan_import(&rows, &lookup());

        assert!(plan.warnings.is_empty());
        let first = &plan.requests[0].request;
        assert_eq!(first.category_id, "c-js");
        assert_eq!(first.tags, vec!["JavaScript".to_string()]);
        assert_eq!(first.difficulty, Difficulty::Other("Insane".to_string()));
        assert_eq!(first.code_example, None);

        let second = &plan.requests[1];
        assert_eq!(second.line, 3);
        assert_eq!(second.request.code_example.as_deref(), Some("div { }"));
    }

    #[test]
    fn test_missing_answer_column_is_skipped() {
        let text = "title,category,difficulty\nT,CSS,Easy";
        let rows = parse_csv(text, CsvDialect::Naive).unwrap();
        let plan = plan_import(&rows, &lookup());

        assert!(plan.requests.is_empty());
        assert!(matches!(
            plan.warnings[0],
            RowWarning::MissingField { field: "answer", .. }
        ));
    }

    #[test]
    fn test_unknown_columns() {
        let text = "title,answer,points,category\n";
        assert_eq!(
            unknown_columns(text, CsvDialect::Naive).unwrap(),
            vec!["points".to_string()]
        );
    }

    #[test]
    fn test_quoted_header_columns_are_recognized() {
        let text = "\"title\",\"description\",\"answer\",\"category\",\"difficulty\",\"notes, internal\"\n\
                    Closures,d,a,JavaScript,Easy,x\n";
        assert_eq!(
            unknown_columns(text, CsvDialect::Quoted).unwrap(),
            vec!["notes, internal".to_string()]
        );
    }
}
