//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责应用生命周期和命令调度，是整个系统的"指挥中心"。
//!
//! ### `app` - 应用主结构
//! - 创建后端客户端、建立会话（token / 邮箱密码 / 匿名）
//! - 把命令分发给查询、写入、导入流程
//! - 写入成功后让查询缓存失效
//! - 输出导入统计信息
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (处理一条命令)
//!     ↓
//! workflow::ImportFlow (处理一个 CSV 文件)
//!     ↓
//! services (能力层：query / admin / auth / csv / render)
//!     ↓
//! infrastructure (基础设施：CatalogBackend、QueryCache)
//! ```
//!
//! ## 设计原则
//!
//! 1. **向下依赖**：编排层 → workflow → services → infrastructure
//! 2. **无业务逻辑**：只做调度和输出，不做校验和解析

pub mod app;

pub use app::App;
