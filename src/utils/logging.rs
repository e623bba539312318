/// 日志工具模块
///
/// 提供日志初始化、日志文件头、统计输出的辅助函数
use std::fs;
use std::io;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::workflow::ImportReport;

/// 初始化 tracing 输出
///
/// 设置了 `RUST_LOG` 时以其为准，否则按 `-v` 次数决定级别
///
/// # 参数
/// - `verbosity`: 0 = info, 1 = debug, 2+ = trace
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbosity {
            0 => "warn,question_catalog=info",
            1 => "warn,question_catalog=debug",
            _ => "trace",
        })
    });

    // 测试中可能被重复调用
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
/// - `title`: 标题（如导入的文件名）
pub fn init_log_file(log_file_path: &str, title: &str) -> io::Result<()> {
    let log_header = format!(
        "{}\n题库导入日志 - {} - {}\n{}\n\n",
        "=".repeat(60),
        title,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)
}

/// 记录程序启动信息
///
/// # 参数
/// - `backend_url`: 后端地址
/// - `identity`: 当前身份描述
pub fn log_startup(backend_url: &str, identity: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 题库管理工具启动");
    info!("🌐 后端: {}", backend_url);
    info!("👤 身份: {}", identity);
    info!("{}", "=".repeat(60));
}

/// 打印导入统计信息
///
/// # 参数
/// - `report`: 导入报告
/// - `log_file_path`: 日志文件路径
pub fn print_import_stats(report: &ImportReport, log_file_path: &str) {
    info!("{}", "=".repeat(60));
    info!("📊 导入完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", report.inserted(), report.total());
    info!("⚠️ 跳过: {}", report.skipped());
    info!("❌ 失败: {}", report.failed());
    info!("{}", "=".repeat(60));
    if report.skipped() + report.failed() > 0 {
        info!("跳过和失败的行已记录至: {}", log_file_path);
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
