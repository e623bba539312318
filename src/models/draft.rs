//! 表单草稿
//!
//! 一次新建/编辑会话的临时编辑缓冲，提交或取消后丢弃

use crate::error::MutationError;
use crate::models::category::CategoryLookup;
use crate::models::question::{Difficulty, NewQuestion, Question};

/// 题目草稿（不含 ID）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionDraft {
    pub title: String,
    pub description: String,
    pub answer: String,
    /// 分类显示名称
    pub category: String,
    pub difficulty: Difficulty,
    pub code_example: Option<String>,
}

impl QuestionDraft {
    /// 以已有题目为初始值开始编辑
    ///
    /// 使用存储的原始值，不带显示用的回退值
    pub fn from_question(question: &Question) -> Self {
        Self {
            title: question.title.clone(),
            description: question.description.clone(),
            answer: question.answer.clone(),
            category: question.category_name.clone(),
            difficulty: question.difficulty.clone(),
            code_example: question.code_example.clone(),
        }
    }

    /// 检查必填字段
    pub fn validate(&self) -> Result<(), MutationError> {
        let required = [
            ("title", &self.title),
            ("description", &self.description),
            ("category", &self.category),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(MutationError::MissingField { field });
            }
        }
        Ok(())
    }

    /// 校验并解析分类，生成写入请求
    ///
    /// 草稿中的分类必须是已存在的分类，这里不会新建分类
    pub fn into_request(self, lookup: &CategoryLookup) -> Result<NewQuestion, MutationError> {
        self.validate()?;

        let category_id = lookup
            .resolve(&self.category)
            .ok_or_else(|| MutationError::UnknownCategory {
                name: self.category.clone(),
            })?
            .to_string();

        Ok(NewQuestion {
            title: self.title,
            description: self.description,
            answer: self.answer,
            category_id,
            difficulty: self.difficulty,
            tags: vec![self.category],
            code_example: self.code_example.filter(|c| !c.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::category::Category;
    use crate::models::question::QuestionRecord;
    use serde_json::json;

    fn lookup() -> CategoryLookup {
        CategoryLookup::from_categories(&[Category {
            id: "c-react".to_string(),
            name: "React".to_string(),
            logo_url: None,
        }])
    }

    fn draft() -> QuestionDraft {
        QuestionDraft {
            title: "What is JSX?".to_string(),
            description: "Explain JSX.".to_string(),
            answer: "Syntax sugar for createElement.".to_string(),
            category: "React".to_string(),
            difficulty: Difficulty::Medium,
            code_example: Some("   ".to_string()),
        }
    }

    #[test]
    fn test_into_request_resolves_category() {
        let request = draft().into_request(&lookup()).unwrap();
        assert_eq!(request.category_id, "c-react");
        assert_eq!(request.tags, vec!["React".to_string()]);
        assert_eq!(request.code_example, None);
    }

    #[test]
    fn test_missing_title_is_rejected_before_lookup() {
        let mut d = draft();
        d.title = "  ".to_string();
        let err = d.into_request(&lookup()).unwrap_err();
        assert!(matches!(err, MutationError::MissingField { field: "title" }));
    }

    #[test]
    fn test_new_category_name_is_not_created() {
        let mut d = draft();
        d.category = "Svelte".to_string();
        let err = d.into_request(&lookup()).unwrap_err();
        assert!(matches!(err, MutationError::UnknownCategory { ref name } if name == "Svelte"));
    }

    fn stored(description: &str) -> Question {
        let record: QuestionRecord = serde_json::from_value(json!({
            "id": "q-9",
            "title": "Closures",
            "description": description,
            "answer": "A function with captured scope.",
            "category_id": "c-react",
            "difficulty": "Easy",
            "tags": ["React"],
            "code_example": "const f = () => x;",
            "categories": { "name": "React" }
        }))
        .unwrap();
        record.into_question()
    }

    #[test]
    fn test_edit_keeps_untouched_fields() {
        let question = stored("Explain closures.");
        let mut d = QuestionDraft::from_question(&question);
        d.difficulty = Difficulty::Hard;

        let request = d.into_request(&lookup()).unwrap();
        assert_eq!(request.difficulty, Difficulty::Hard);
        assert_eq!(request.title, question.title);
        assert_eq!(request.description, "Explain closures.");
        assert_eq!(request.answer, question.answer);
        assert_eq!(request.category_id, question.category_id);
        assert_eq!(request.code_example, question.code_example);
    }

    #[test]
    fn test_edit_does_not_fill_empty_description_with_title() {
        let question = stored("");
        assert_eq!(question.display_description(), "Closures");

        let mut d = QuestionDraft::from_question(&question);
        assert_eq!(d.description, "");
        d.difficulty = Difficulty::Hard;

        let err = d.into_request(&lookup()).unwrap_err();
        assert!(matches!(err, MutationError::MissingField { field: "description" }));
    }
}
