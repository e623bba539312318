use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::category::CategoryNameRef;

/// 题目难度
///
/// 已知取值为 Easy / Medium / Hard，其余取值原样保留在 `Other` 中
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Other(String),
}

impl Difficulty {
    /// 从文本解析难度（区分大小写，与后端存储一致）
    pub fn parse(value: &str) -> Self {
        match value {
            "Easy" => Difficulty::Easy,
            "Medium" => Difficulty::Medium,
            "Hard" => Difficulty::Hard,
            other => Difficulty::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Other(value) => value,
        }
    }

    /// 是否属于三种已知难度之一
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Difficulty::Other(_))
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Easy
    }
}

impl From<String> for Difficulty {
    fn from(value: String) -> Self {
        Difficulty::parse(&value)
    }
}

impl From<Difficulty> for String {
    fn from(value: Difficulty) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 题目（读取投影，已解析分类名称）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub title: String,
    /// 存储的原始描述，可能为空；显示用 [`Question::display_description`]
    pub description: String,
    pub answer: String,
    pub category_id: String,
    pub category_name: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_example: Option<String>,
}

impl Question {
    /// 显示用描述，描述为空时使用标题
    pub fn display_description(&self) -> &str {
        if self.description.is_empty() {
            &self.title
        } else {
            &self.description
        }
    }
}

/// 未关联到分类名称时使用的显示名称
pub const FALLBACK_CATEGORY_NAME: &str = "General";

/// `questions` 表的一行（含 `categories(name)` 关联查询结果）
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub category_id: Option<String>,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub code_example: Option<String>,
    #[serde(default)]
    pub categories: Option<CategoryNameRef>,
}

impl QuestionRecord {
    /// 转换为读取投影
    ///
    /// - 描述保持存储值（`null` 视为空），显示时再回退到标题
    /// - 分类名称缺失时使用 `General`
    pub fn into_question(self) -> Question {
        let category_name = self
            .categories
            .and_then(|c| c.name)
            .unwrap_or_else(|| FALLBACK_CATEGORY_NAME.to_string());

        Question {
            id: self.id,
            title: self.title,
            description: self.description.unwrap_or_default(),
            answer: self.answer.unwrap_or_default(),
            category_id: self.category_id.unwrap_or_default(),
            category_name,
            difficulty: self.difficulty,
            tags: self.tags.unwrap_or_default(),
            code_example: self.code_example.filter(|c| !c.is_empty()),
        }
    }
}

/// 新建/更新题目的请求体
///
/// `code_example` 为 `None` 时序列化为 `null`，不会写入空字符串
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewQuestion {
    pub title: String,
    pub description: String,
    pub answer: String,
    pub category_id: String,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    pub code_example: Option<String>,
}

// 后端主键可能是 uuid 字符串，也可能是自增整数
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer id")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

pub(crate) fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "deserialize_id")] String);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|Wrapper(id)| id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_difficulty_passes_unknown_values_through() {
        assert_eq!(Difficulty::parse("Hard"), Difficulty::Hard);
        let odd = Difficulty::parse("Extreme");
        assert!(!odd.is_recognized());
        assert_eq!(odd.as_str(), "Extreme");
        assert_eq!(serde_json::to_value(&odd).unwrap(), json!("Extreme"));
    }

    #[test]
    fn test_record_with_join_and_integer_ids() {
        let record: QuestionRecord = serde_json::from_value(json!({
            "id": 7,
            "title": "What is a closure?",
            "description": null,
            "answer": "A function with captured scope.",
            "category_id": 3,
            "difficulty": "Medium",
            "tags": ["JavaScript"],
            "code_example": "",
            "categories": { "name": "JavaScript" }
        }))
        .unwrap();

        let question = record.into_question();
        assert_eq!(question.id, "7");
        assert_eq!(question.category_id, "3");
        assert_eq!(question.description, "");
        assert_eq!(question.display_description(), "What is a closure?");
        assert_eq!(question.category_name, "JavaScript");
        assert_eq!(question.code_example, None);
    }

    #[test]
    fn test_record_without_category_name_falls_back() {
        let record: QuestionRecord = serde_json::from_value(json!({
            "id": "a1",
            "title": "t",
            "description": "d",
            "answer": "a",
            "category_id": "c1",
            "difficulty": "Easy",
            "categories": null
        }))
        .unwrap();

        assert_eq!(record.into_question().category_name, FALLBACK_CATEGORY_NAME);
    }

    #[test]
    fn test_new_question_serializes_missing_code_example_as_null() {
        let request = NewQuestion {
            title: "t".to_string(),
            description: "d".to_string(),
            answer: "a".to_string(),
            category_id: "c1".to_string(),
            difficulty: Difficulty::Easy,
            tags: vec!["React".to_string()],
            code_example: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["code_example"], serde_json::Value::Null);
        assert_eq!(value["difficulty"], json!("Easy"));
    }
}
