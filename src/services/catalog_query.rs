/// 题库查询服务
///
/// 负责分类（含题目数量）和题目列表的读取，结果写入查询缓存
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::BackendError;
use crate::infrastructure::{CatalogBackend, QueryCache};
use crate::models::category::count_questions;
use crate::models::{CategoryLookup, CategoryWithCount, Question};

/// 题库查询服务
pub struct CatalogQuery<B: CatalogBackend> {
    backend: Arc<B>,
    cache: Arc<QueryCache>,
}

impl<B: CatalogBackend> Clone for CatalogQuery<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<B: CatalogBackend> CatalogQuery<B> {
    pub fn new(backend: Arc<B>, cache: Arc<QueryCache>) -> Self {
        Self { backend, cache }
    }

    /// 读取所有分类，数量按题目的分类 ID 现场统计
    pub async fn list_categories(&self) -> Result<Vec<CategoryWithCount>, BackendError> {
        let categories = self.backend.fetch_categories().await?;
        let category_ids = self.backend.fetch_question_category_ids().await?;
        let result = count_questions(categories, &category_ids);

        debug!(
            "读取分类: {} 个分类, {} 道题目",
            result.len(),
            category_ids.len()
        );
        self.cache.store_categories(result.clone()).await;
        Ok(result)
    }

    /// 读取题目列表
    ///
    /// # 参数
    /// - `category_id`: 分类筛选，`None` 返回全部题目
    pub async fn list_questions(
        &self,
        category_id: Option<&str>,
    ) -> Result<Vec<Question>, BackendError> {
        let questions = self.backend.fetch_questions(category_id).await?;
        debug!(
            "读取题目: {} 道 (分类: {})",
            questions.len(),
            category_id.unwrap_or("全部")
        );
        self.cache
            .store_questions(category_id, questions.clone())
            .await;
        Ok(questions)
    }

    /// 缓存中的分类，失效后重新读取
    pub async fn cached_categories(&self) -> Result<Vec<CategoryWithCount>, BackendError> {
        match self.cache.categories().await {
            Some(categories) => Ok(categories),
            None => self.list_categories().await,
        }
    }

    /// 缓存中的题目列表，失效后重新读取
    pub async fn cached_questions(
        &self,
        category_id: Option<&str>,
    ) -> Result<Vec<Question>, BackendError> {
        match self.cache.questions(category_id).await {
            Some(questions) => Ok(questions),
            None => self.list_questions(category_id).await,
        }
    }

    /// 单个题目
    pub async fn get_question(&self, id: &str) -> Result<Option<Question>, BackendError> {
        self.backend.fetch_question(id).await
    }

    /// 分类名称 → ID 查找表（每次都重新读取）
    pub async fn category_lookup(&self) -> Result<CategoryLookup, BackendError> {
        let categories = self.backend.fetch_categories().await?;
        Ok(CategoryLookup::from_categories(&categories))
    }

    /// 题目写入成功后调用
    pub async fn invalidate(&self) {
        info!("🔄 题目已变更，刷新查询缓存");
        self.cache.invalidate_questions().await;
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }
}
