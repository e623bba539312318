use crate::error::ImportError;
use std::path::Path;
use tokio::fs;

/// 读取待导入的 CSV 文件内容
///
/// 文件扩展名不是 `.csv` 时只记录警告，仍按 CSV 处理
pub async fn load_csv_file(csv_file_path: &Path) -> Result<String, ImportError> {
    if csv_file_path.extension().and_then(|s| s.to_str()) != Some("csv") {
        tracing::warn!("文件扩展名不是 .csv: {}", csv_file_path.display());
    }

    let content = read_text(csv_file_path).await?;

    tracing::info!(
        "正在加载: {} ({} 行)",
        csv_file_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy(),
        content.lines().count()
    );

    Ok(content)
}

/// 读取文本文件（答案、代码示例等长文本）
pub async fn load_text_file(path: &Path) -> Result<String, ImportError> {
    read_text(path).await
}

async fn read_text(path: &Path) -> Result<String, ImportError> {
    fs::read_to_string(path)
        .await
        .map_err(|source| ImportError::ReadFailed {
            path: path.display().to_string(),
            source,
        })
}
