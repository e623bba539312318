//! 内存后端 - 基础设施层
//!
//! 在进程内模拟托管存储：非空/外键约束、行级写权限、登录

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

use crate::error::BackendError;
use crate::infrastructure::backend::CatalogBackend;
use crate::models::{Category, NewQuestion, Question, Session};

#[derive(Debug, Clone)]
struct StoredQuestion {
    id: String,
    request: NewQuestion,
}

#[derive(Debug, Default)]
struct MemoryState {
    categories: Vec<Category>,
    questions: Vec<StoredQuestion>,
    accounts: HashMap<String, String>,
    rejected_titles: HashSet<String>,
    offline: bool,
    next_id: u64,
}

/// 内存后端
///
/// 题目按插入顺序返回
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    state: RwLock<MemoryState>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用给定分类创建
    pub fn with_categories(categories: Vec<Category>) -> Self {
        Self {
            state: RwLock::new(MemoryState {
                categories,
                ..Default::default()
            }),
        }
    }

    /// 注册可登录的账号
    pub async fn add_account(&self, email: impl Into<String>, password: impl Into<String>) {
        self.state
            .write()
            .await
            .accounts
            .insert(email.into(), password.into());
    }

    /// 之后标题为 `title` 的写入都会被后端拒绝（模拟检查约束）
    pub async fn reject_title(&self, title: impl Into<String>) {
        self.state.write().await.rejected_titles.insert(title.into());
    }

    /// 切换离线状态，离线时所有调用返回请求失败
    pub async fn set_offline(&self, offline: bool) {
        self.state.write().await.offline = offline;
    }

    /// 当前题目数量
    pub async fn question_count(&self) -> usize {
        self.state.read().await.questions.len()
    }
}

impl MemoryState {
    fn ensure_online(&self, endpoint: &str) -> Result<(), BackendError> {
        if self.offline {
            return Err(BackendError::request_failed(
                endpoint,
                std::io::Error::new(std::io::ErrorKind::NotConnected, "backend offline"),
            ));
        }
        Ok(())
    }

    fn ensure_session(&self, endpoint: &str, session: &Session) -> Result<(), BackendError> {
        if session.access_token.is_empty() {
            return Err(BackendError::Unauthorized {
                endpoint: endpoint.to_string(),
                message: "missing access token".to_string(),
            });
        }
        Ok(())
    }

    fn check_constraints(&self, question: &NewQuestion) -> Result<(), BackendError> {
        if question.title.is_empty() {
            return Err(BackendError::ConstraintViolation {
                code: "23502".to_string(),
                message: "null value in column \"title\" violates not-null constraint"
                    .to_string(),
            });
        }
        if !self.categories.iter().any(|c| c.id == question.category_id) {
            return Err(BackendError::ConstraintViolation {
                code: "23503".to_string(),
                message: format!(
                    "insert or update on table \"questions\" violates foreign key constraint (category_id={})",
                    question.category_id
                ),
            });
        }
        if self.rejected_titles.contains(&question.title) {
            return Err(BackendError::ConstraintViolation {
                code: "23514".to_string(),
                message: format!("row rejected by check constraint (title={})", question.title),
            });
        }
        Ok(())
    }

    fn project(&self, stored: &StoredQuestion) -> Question {
        let category_name = self
            .categories
            .iter()
            .find(|c| c.id == stored.request.category_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| crate::models::question::FALLBACK_CATEGORY_NAME.to_string());
        let request = &stored.request;

        Question {
            id: stored.id.clone(),
            title: request.title.clone(),
            description: request.description.clone(),
            answer: request.answer.clone(),
            category_id: request.category_id.clone(),
            category_name,
            difficulty: request.difficulty.clone(),
            tags: request.tags.clone(),
            code_example: request.code_example.clone(),
        }
    }
}

#[async_trait]
impl CatalogBackend for InMemoryBackend {
    async fn fetch_categories(&self) -> Result<Vec<Category>, BackendError> {
        let state = self.state.read().await;
        state.ensure_online("categories")?;
        Ok(state.categories.clone())
    }

    async fn fetch_question_category_ids(&self) -> Result<Vec<String>, BackendError> {
        let state = self.state.read().await;
        state.ensure_online("questions")?;
        Ok(state
            .questions
            .iter()
            .map(|q| q.request.category_id.clone())
            .collect())
    }

    async fn fetch_questions(
        &self,
        category_id: Option<&str>,
    ) -> Result<Vec<Question>, BackendError> {
        let state = self.state.read().await;
        state.ensure_online("questions")?;
        Ok(state
            .questions
            .iter()
            .filter(|q| category_id.map_or(true, |id| q.request.category_id == id))
            .map(|q| state.project(q))
            .collect())
    }

    async fn fetch_question(&self, id: &str) -> Result<Option<Question>, BackendError> {
        let state = self.state.read().await;
        state.ensure_online("questions")?;
        Ok(state
            .questions
            .iter()
            .find(|q| q.id == id)
            .map(|q| state.project(q)))
    }

    async fn insert_question(
        &self,
        session: &Session,
        question: &NewQuestion,
    ) -> Result<Question, BackendError> {
        let mut state = self.state.write().await;
        state.ensure_online("questions")?;
        state.ensure_session("questions", session)?;
        state.check_constraints(question)?;

        state.next_id += 1;
        let stored = StoredQuestion {
            id: format!("q-{}", state.next_id),
            request: question.clone(),
        };
        let projected = state.project(&stored);
        state.questions.push(stored);
        Ok(projected)
    }

    async fn update_question(
        &self,
        session: &Session,
        id: &str,
        question: &NewQuestion,
    ) -> Result<Question, BackendError> {
        let mut state = self.state.write().await;
        state.ensure_online("questions")?;
        state.ensure_session("questions", session)?;
        state.check_constraints(question)?;

        let index = state
            .questions
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| BackendError::NotFound {
                table: "questions".to_string(),
                id: id.to_string(),
            })?;
        state.questions[index].request = question.clone();
        Ok(state.project(&state.questions[index]))
    }

    async fn delete_question(&self, session: &Session, id: &str) -> Result<(), BackendError> {
        let mut state = self.state.write().await;
        state.ensure_online("questions")?;
        state.ensure_session("questions", session)?;

        let before = state.questions.len();
        state.questions.retain(|q| q.id != id);
        if state.questions.len() == before {
            return Err(BackendError::NotFound {
                table: "questions".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let state = self.state.read().await;
        state.ensure_online("auth/v1/token")?;
        match state.accounts.get(email) {
            Some(expected) if expected == password => {
                Ok(Session::new(format!("memory-token-{}", email), email))
            }
            _ => Err(BackendError::Unauthorized {
                endpoint: "auth/v1/token".to_string(),
                message: "Invalid login credentials".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;

    fn backend() -> InMemoryBackend {
        InMemoryBackend::with_categories(vec![Category {
            id: "c1".to_string(),
            name: "CSS".to_string(),
            logo_url: None,
        }])
    }

    fn request(title: &str, category_id: &str) -> NewQuestion {
        NewQuestion {
            title: title.to_string(),
            description: String::new(),
            answer: "answer".to_string(),
            category_id: category_id.to_string(),
            difficulty: Difficulty::Easy,
            tags: vec![],
            code_example: None,
        }
    }

    #[tokio::test]
    async fn test_insert_enforces_foreign_key() {
        let backend = backend();
        let session = Session::new("token", "admin@example.com");

        let err = backend
            .insert_question(&session, &request("t", "missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::ConstraintViolation { ref code, .. } if code == "23503"));

        let inserted = backend
            .insert_question(&session, &request("t", "c1"))
            .await
            .unwrap();
        assert_eq!(inserted.category_name, "CSS");
        assert_eq!(inserted.description, "");
        assert_eq!(inserted.display_description(), "t");
    }

    #[tokio::test]
    async fn test_writes_need_a_token() {
        let backend = backend();
        let err = backend
            .insert_question(&Session::new("", "x@example.com"), &request("t", "c1"))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_not_found() {
        let backend = backend();
        let err = backend
            .delete_question(&Session::new("token", "a@example.com"), "q-99")
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_sign_in_checks_password() {
        let backend = backend();
        backend.add_account("admin@example.com", "secret").await;

        assert!(backend.sign_in("admin@example.com", "wrong").await.is_err());
        let session = backend.sign_in("admin@example.com", "secret").await.unwrap();
        assert_eq!(session.email, "admin@example.com");
    }
}
