//! 导入日志写入 - 业务能力层
//!
//! 只负责把被跳过或失败的行追加到日志文件，不关心流程

use std::io;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// 导入日志写入服务
///
/// 职责：
/// - 每次追加一行，记录行号、题目和原因
/// - 文件不存在时自动创建
pub struct ImportLogWriter {
    log_file_path: String,
}

impl ImportLogWriter {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            log_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.log_file_path
    }

    /// 追加一条记录
    ///
    /// # 参数
    /// - `line`: CSV 行号
    /// - `title`: 题目标题
    /// - `reason`: 跳过或失败的原因
    pub async fn write(&self, line: usize, title: &str, reason: &str) -> io::Result<()> {
        debug!("写入导入日志: 行 {} | {}", line, title);

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file_path)
            .await?;

        let entry = format!("行 {} | 题目: {} | 原因: {}\n", line, title, reason);
        file.write_all(entry.as_bytes()).await?;
        file.flush().await
    }
}
