// src/main.rs

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use std::{env, sync::Arc};
use tt_dl::{cli::Cli, logging, run_from_cli, symbols};

#[tokio::main]
async fn main() {
    // 为 Windows 终端启用 ANSI 颜色支持。
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }

    let bin_name = env::var("CARGO_BIN_NAME").unwrap_or_else(|_| "tt-dl".to_string());

    let after_help = format!(
        "示例:\n  # 使用默认配置启动 (http://127.0.0.1:5000)\n  {bin}\n\n  # 对局域网开放并更换端口\n  {bin} --bind 0.0.0.0 -p 8080\n\n  # 只使用指定的解析服务，并按顺序尝试\n  {bin} --services cobalt,tikwm\n\n  # 导出默认配置\n  {bin} --print-config > config.json",
        bin = bin_name
    );

    let cmd = Cli::command().after_help(after_help);
    let args = match Cli::from_arg_matches(&cmd.get_matches()) {
        Ok(args) => Arc::new(args),
        Err(e) => e.exit(),
    };

    logging::init_logger(args.log_level, args.log_file.as_deref());

    if let Err(e) = run_from_cli(args).await {
        eprintln!("\n{} {}", *symbols::ERROR, format!("程序执行出错: {}", e).red());
        std::process::exit(1);
    }
}
