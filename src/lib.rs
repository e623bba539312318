//! # Question Catalog
//!
//! 面试题库的浏览与管理工具
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 后端接口和查询缓存，只暴露能力
//! - `CatalogBackend` - 托管存储的最小能力集合（读表、写表、登录）
//! - `InMemoryBackend` - 进程内实现，用于测试和演示
//! - `QueryCache` - 读取结果缓存，写入后失效
//! - `clients/SupabaseClient` - 托管存储的 REST 实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `CatalogQuery` - 分类（含数量）和题目读取
//! - `AdminService` - 新建 / 更新 / 删除题目
//! - `AuthService` - 登录和管理员判定
//! - `csv_importer` - CSV 解析和导入计划
//! - `answer_renderer` - 答案文本 → 段落 / 代码块
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个 CSV 文件"的完整导入流程
//! - `RowCtx` - 上下文封装（行号 + 标题）
//! - `ImportFlow` - 逐行提交，逐行报告，最后失效一次
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 应用生命周期和命令分发
//!
//! 展示层 `presentation/` 只负责把结果渲染成终端文本。
//!
//! ## 模块结构

pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod presentation;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use infrastructure::{CatalogBackend, InMemoryBackend, QueryCache};
pub use models::{AuthContext, Category, Difficulty, NewQuestion, Question, QuestionDraft};
pub use orchestrator::App;
pub use services::{render_answer, AnswerBlock};
pub use workflow::{ImportFlow, ImportReport, RowOutcome};
