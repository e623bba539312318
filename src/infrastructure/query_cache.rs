//! 查询缓存 - 基础设施层
//!
//! 缓存最近一次读取结果，写入成功后由调用方失效，下一次读取重新访问后端。
//! 两次失效之间读到旧数据是允许的。

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

use crate::models::{CategoryWithCount, Question};

#[derive(Debug, Default)]
struct CacheState {
    categories: Option<Vec<CategoryWithCount>>,
    /// 键为分类筛选条件（None 表示全部）
    questions: HashMap<Option<String>, Vec<Question>>,
}

/// 查询缓存
#[derive(Debug, Default)]
pub struct QueryCache {
    state: Mutex<CacheState>,
    invalidations: AtomicUsize,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn categories(&self) -> Option<Vec<CategoryWithCount>> {
        self.state.lock().await.categories.clone()
    }

    pub async fn store_categories(&self, categories: Vec<CategoryWithCount>) {
        self.state.lock().await.categories = Some(categories);
    }

    pub async fn questions(&self, category_id: Option<&str>) -> Option<Vec<Question>> {
        self.state
            .lock()
            .await
            .questions
            .get(&category_id.map(str::to_string))
            .cloned()
    }

    pub async fn store_questions(&self, category_id: Option<&str>, questions: Vec<Question>) {
        self.state
            .lock()
            .await
            .questions
            .insert(category_id.map(str::to_string), questions);
    }

    /// 题目发生变化后调用
    ///
    /// 分类数量由题目统计得来，所以分类缓存一并失效
    pub async fn invalidate_questions(&self) {
        let mut state = self.state.lock().await;
        state.questions.clear();
        state.categories = None;
        let count = self.invalidations.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("查询缓存已失效 (第 {} 次)", count);
    }

    /// 累计失效次数
    pub fn invalidation_count(&self) -> usize {
        self.invalidations.load(Ordering::SeqCst)
    }
}
