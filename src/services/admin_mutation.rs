/// 题目写入服务（管理员）
///
/// 负责新建、更新、删除题目。调用前检查管理员身份，
/// 成功后由调用方负责让查询缓存失效。
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::MutationError;
use crate::infrastructure::CatalogBackend;
use crate::models::{AuthContext, CategoryLookup, NewQuestion, Question, QuestionDraft, Session};

/// 提交草稿的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(Question),
    Updated(Question),
}

impl SubmitOutcome {
    pub fn question(&self) -> &Question {
        match self {
            SubmitOutcome::Created(q) | SubmitOutcome::Updated(q) => q,
        }
    }
}

/// 题目写入服务
pub struct AdminService<B: CatalogBackend> {
    backend: Arc<B>,
}

impl<B: CatalogBackend> Clone for AdminService<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: CatalogBackend> AdminService<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    fn require_admin<'a>(&self, auth: &'a AuthContext) -> Result<&'a Session, MutationError> {
        auth.admin_session().ok_or_else(|| {
            warn!("⚠️ 拒绝写入: 当前身份为{}", auth.describe());
            MutationError::Unauthorized
        })
    }

    /// 新建题目
    pub async fn create_question(
        &self,
        auth: &AuthContext,
        question: &NewQuestion,
    ) -> Result<Question, MutationError> {
        let session = self.require_admin(auth)?;
        let created = self.backend.insert_question(session, question).await?;
        info!("✓ 已新建题目 {}: {}", created.id, created.title);
        Ok(created)
    }

    /// 更新题目（整行覆盖）
    pub async fn update_question(
        &self,
        auth: &AuthContext,
        id: &str,
        question: &NewQuestion,
    ) -> Result<Question, MutationError> {
        let session = self.require_admin(auth)?;
        let updated = self.backend.update_question(session, id, question).await?;
        info!("✓ 已更新题目 {}: {}", updated.id, updated.title);
        Ok(updated)
    }

    /// 删除题目，不做二次确认
    pub async fn delete_question(&self, auth: &AuthContext, id: &str) -> Result<(), MutationError> {
        let session = self.require_admin(auth)?;
        self.backend.delete_question(session, id).await?;
        info!("✓ 已删除题目 {}", id);
        Ok(())
    }

    /// 提交表单草稿
    ///
    /// # 参数
    /// - `draft`: 表单内容，分类为显示名称
    /// - `lookup`: 分类名称查找表
    /// - `editing`: 正在编辑的题目 ID，`None` 表示新建
    ///
    /// # 返回
    /// 新建或更新后的题目。缺少必填字段或分类不存在时不会访问后端。
    pub async fn submit_draft(
        &self,
        auth: &AuthContext,
        draft: QuestionDraft,
        lookup: &CategoryLookup,
        editing: Option<&str>,
    ) -> Result<SubmitOutcome, MutationError> {
        self.require_admin(auth)?;
        let request = draft.into_request(lookup)?;

        match editing {
            Some(id) => self
                .update_question(auth, id, &request)
                .await
                .map(SubmitOutcome::Updated),
            None => self
                .create_question(auth, &request)
                .await
                .map(SubmitOutcome::Created),
        }
    }
}
