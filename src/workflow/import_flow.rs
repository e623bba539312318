//! CSV 导入流程 - 流程层
//!
//! 核心职责：定义"一个 CSV 文件"的完整导入流程
//!
//! 流程顺序：
//! 1. 解析 CSV → 读取分类表 → 生成导入计划
//! 2. 按文件顺序逐行提交，等待上一行完成再提交下一行
//! 3. 单行失败只记录，不中断后续行
//! 4. 全部结束后让查询缓存失效一次

use tracing::{error, info, warn};

use crate::error::ImportError;
use crate::infrastructure::CatalogBackend;
use crate::models::AuthContext;
use crate::services::csv_importer::{
    parse_csv, plan_import, unknown_columns, CsvDialect, ImportPlan, RowWarning,
};
use crate::services::{AdminService, CatalogQuery, ImportLogWriter};
use crate::workflow::row_ctx::RowCtx;

/// 单行导入结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// 写入成功
    Inserted {
        line: usize,
        title: String,
        id: String,
    },
    /// 提交前被跳过（分类不存在、缺少必填列）
    Skipped { warning: RowWarning },
    /// 后端拒绝或请求失败
    Failed {
        line: usize,
        title: String,
        reason: String,
    },
}

impl RowOutcome {
    pub fn line(&self) -> usize {
        match self {
            RowOutcome::Inserted { line, .. } | RowOutcome::Failed { line, .. } => *line,
            RowOutcome::Skipped { warning } => warning.line(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            RowOutcome::Inserted { title, .. } | RowOutcome::Failed { title, .. } => title,
            RowOutcome::Skipped { warning } => warning.title(),
        }
    }
}

/// 导入报告：每一行都有独立的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// 按行号排序
    pub outcomes: Vec<RowOutcome>,
}

impl ImportReport {
    pub fn inserted(&self) -> usize {
        self.count(|o| matches!(o, RowOutcome::Inserted { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, RowOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, RowOutcome::Failed { .. }))
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    fn count(&self, pred: impl Fn(&RowOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

/// CSV 导入流程
///
/// - 编排解析、计划、提交、失效
/// - 不持有文件，只接收文本
/// - 只依赖业务能力（services）
pub struct ImportFlow<B: CatalogBackend> {
    query: CatalogQuery<B>,
    admin: AdminService<B>,
    log_writer: Option<ImportLogWriter>,
}

impl<B: CatalogBackend> ImportFlow<B> {
    pub fn new(query: CatalogQuery<B>, admin: AdminService<B>) -> Self {
        Self {
            query,
            admin,
            log_writer: None,
        }
    }

    /// 跳过和失败的行同时写入日志文件
    pub fn with_log_writer(mut self, writer: ImportLogWriter) -> Self {
        self.log_writer = Some(writer);
        self
    }

    /// 导入 CSV 文本
    ///
    /// # 返回
    /// 每一行的结果。只有权限不足、解析失败、分类表读取失败时返回错误，
    /// 这些情况下不会提交任何一行。
    pub async fn run(
        &self,
        auth: &AuthContext,
        text: &str,
        dialect: CsvDialect,
    ) -> Result<ImportReport, ImportError> {
        if !auth.is_admin() {
            warn!("⚠️ 拒绝导入: 当前身份为{}", auth.describe());
            return Err(ImportError::Unauthorized);
        }

        let rows = parse_csv(text, dialect)?;
        info!("📄 CSV 共 {} 行数据", rows.len());
        let ignored = unknown_columns(text, dialect)?;
        if !ignored.is_empty() {
            warn!("⚠️ 忽略无法识别的列: {}", ignored.join(", "));
        }

        let lookup = self
            .query
            .category_lookup()
            .await
            .map_err(ImportError::CategoryLookup)?;
        info!("✓ 已读取 {} 个分类", lookup.len());

        let plan = plan_import(&rows, &lookup);
        Ok(self.run_plan(auth, plan).await)
    }

    /// 执行导入计划
    pub async fn run_plan(&self, auth: &AuthContext, plan: ImportPlan) -> ImportReport {
        let mut outcomes = Vec::with_capacity(plan.requests.len() + plan.warnings.len());

        for warning in plan.warnings {
            self.write_log(warning.line(), warning.title(), &warning.to_string())
                .await;
            outcomes.push(RowOutcome::Skipped { warning });
        }

        info!("📤 开始提交 {} 道题目", plan.requests.len());
        for row in plan.requests {
            let ctx = RowCtx::new(row.line, row.request.title.clone());

            match self.admin.create_question(auth, &row.request).await {
                Ok(question) => {
                    info!("{} ✓ 已导入 (ID: {})", ctx, question.id);
                    outcomes.push(RowOutcome::Inserted {
                        line: ctx.line,
                        title: ctx.title,
                        id: question.id,
                    });
                }
                Err(e) => {
                    error!("{} ❌ 导入失败: {}", ctx, e);
                    let reason = e.to_string();
                    self.write_log(ctx.line, &ctx.title, &reason).await;
                    outcomes.push(RowOutcome::Failed {
                        line: ctx.line,
                        title: ctx.title,
                        reason,
                    });
                }
            }
        }

        self.query.invalidate().await;

        outcomes.sort_by_key(RowOutcome::line);
        ImportReport { outcomes }
    }

    async fn write_log(&self, line: usize, title: &str, reason: &str) {
        if let Some(writer) = &self.log_writer {
            if let Err(e) = writer.write(line, title, reason).await {
                warn!("⚠️ 写入导入日志失败 ({}): {}", writer.path(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{InMemoryBackend, QueryCache};
    use crate::models::{Category, Session};
    use std::sync::Arc;

    fn flow() -> (Arc<InMemoryBackend>, Arc<QueryCache>, ImportFlow<InMemoryBackend>) {
        let backend = Arc::new(InMemoryBackend::with_categories(vec![
            Category {
                id: "1".to_string(),
                name: "HTML".to_string(),
                logo_url: None,
            },
            Category {
                id: "2".to_string(),
                name: "Redux".to_string(),
                logo_url: None,
            },
        ]));
        let cache = Arc::new(QueryCache::new());
        let query = CatalogQuery::new(Arc::clone(&backend), Arc::clone(&cache));
        let admin = AdminService::new(Arc::clone(&backend));
        (backend, cache, ImportFlow::new(query, admin))
    }

    fn admin() -> AuthContext {
        AuthContext::Admin(Session::new("token", "admin@example.com"))
    }

    const CSV: &str = "title,description,answer,category,difficulty\n\
                       Semantic tags,d,a,HTML,Easy\n\
                       Reducers,d,a,Redux,Medium\n\
                       Signals,d,a,Solid,Hard\n\
                       Middleware,d,a,Redux,Hard\n";

    #[tokio::test]
    async fn test_unknown_category_row_is_skipped() {
        let (backend, cache, flow) = flow();
        let report = flow.run(&admin(), CSV, CsvDialect::Naive).await.unwrap();

        assert_eq!(report.inserted(), 3);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failed(), 0);
        assert_eq!(backend.question_count().await, 3);
        assert_eq!(cache.invalidation_count(), 1);

        let lines: Vec<usize> = report.outcomes.iter().map(RowOutcome::line).collect();
        assert_eq!(lines, vec![2, 3, 4, 5]);
        assert!(matches!(report.outcomes[2], RowOutcome::Skipped { .. }));
    }

    #[tokio::test]
    async fn test_failed_row_does_not_stop_batch() {
        let (backend, cache, flow) = flow();
        backend.reject_title("Reducers").await;

        let report = flow.run(&admin(), CSV, CsvDialect::Naive).await.unwrap();

        assert_eq!(report.inserted(), 2);
        assert_eq!(report.failed(), 1);
        assert!(matches!(
            &report.outcomes[1],
            RowOutcome::Failed { title, .. } if title == "Reducers"
        ));
        assert_eq!(report.outcomes[3].title(), "Middleware");
        assert_eq!(cache.invalidation_count(), 1);
    }

    #[tokio::test]
    async fn test_non_admin_imports_nothing() {
        let (backend, cache, flow) = flow();
        let err = flow
            .run(&AuthContext::Anonymous, CSV, CsvDialect::Naive)
            .await
            .unwrap_err();

        assert!(matches!(err, ImportError::Unauthorized));
        assert_eq!(backend.question_count().await, 0);
        assert_eq!(cache.invalidation_count(), 0);
    }

    #[tokio::test]
    async fn test_category_fetch_failure_aborts() {
        let (backend, _, flow) = flow();
        backend.set_offline(true).await;

        let err = flow.run(&admin(), CSV, CsvDialect::Naive).await.unwrap_err();
        assert!(matches!(err, ImportError::CategoryLookup(_)));
    }
}
