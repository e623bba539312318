use anyhow::{Context, Result};
use clap::Parser;

use question_catalog::cli::Cli;
use question_catalog::utils::logging;
use question_catalog::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::load(cli.config.as_deref()).context("加载配置失败")?;

    // 初始化日志
    let verbosity = cli.verbose.max(u8::from(config.verbose_logging));
    logging::init(verbosity);

    // 初始化并执行命令
    let mut app = App::initialize(config).await?;
    let output = app.run(cli.command).await?;
    print!("{}", output);

    Ok(())
}
