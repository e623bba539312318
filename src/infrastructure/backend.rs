//! 后端接口 - 基础设施层
//!
//! 托管关系型存储 + 认证服务的最小能力集合

use async_trait::async_trait;

use crate::error::BackendError;
use crate::models::{Category, NewQuestion, Question, Session};

/// 题库后端
///
/// 职责：
/// - 读 `categories` / `questions` 两张表
/// - 以会话身份写 `questions` 表（行级权限由后端判定）
/// - 邮箱密码登录
/// - 不做缓存，不做校验，不认识 CSV
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    /// 所有分类
    async fn fetch_categories(&self) -> Result<Vec<Category>, BackendError>;

    /// 每道题目的分类 ID（用于统计数量）
    async fn fetch_question_category_ids(&self) -> Result<Vec<String>, BackendError>;

    /// 题目列表，`category_id` 为 `Some` 时只返回该分类的题目
    async fn fetch_questions(&self, category_id: Option<&str>)
        -> Result<Vec<Question>, BackendError>;

    /// 单个题目
    async fn fetch_question(&self, id: &str) -> Result<Option<Question>, BackendError>;

    /// 新建题目，返回后端生成 ID 后的题目
    async fn insert_question(
        &self,
        session: &Session,
        question: &NewQuestion,
    ) -> Result<Question, BackendError>;

    /// 更新题目
    async fn update_question(
        &self,
        session: &Session,
        id: &str,
        question: &NewQuestion,
    ) -> Result<Question, BackendError>;

    /// 删除题目
    async fn delete_question(&self, session: &Session, id: &str) -> Result<(), BackendError>;

    /// 邮箱密码登录
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError>;
}
