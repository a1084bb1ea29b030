// src/cli.rs

use clap::{Parser, ValueEnum, crate_version};
use std::path::PathBuf;

/// 定义日志输出级别
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug, Clone, Default)]
#[command(
    version = crate_version!(),
    about,
    long_about = None,
    disable_help_flag = true,
    disable_version_flag = true,
)]
pub struct Cli {
    // --- 服务选项 (Server) ---
    /// 监听地址 (默认 127.0.0.1)
    #[arg(long, value_name = "ADDR", help_heading = "Server")]
    pub bind: Option<String>,
    /// 监听端口 (默认 5000)
    #[arg(short, long, value_parser = clap::value_parser!(u16), help_heading = "Server")]
    pub port: Option<u16>,
    /// 指定配置文件路径 (默认 ~/.tt-dl/config.json)
    #[arg(short, long, value_name = "FILE", help_heading = "Server")]
    pub config: Option<PathBuf>,
    /// 仅启用列出的解析服务，并按给定顺序尝试 (例如 'tikwm,cobalt')
    #[arg(long, value_name = "LIST", value_delimiter = ',', help_heading = "Server")]
    pub services: Option<Vec<String>>,
    /// 打印默认配置 (JSON) 并退出
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Server")]
    pub print_config: bool,

    // --- 通用选项 (General) ---
    /// 显示此帮助信息并退出
    #[arg(short = 'h', long, action = clap::ArgAction::Help, global = true, help_heading = "General")]
    _help: Option<bool>,
    /// 显示版本信息并退出
    #[arg(short = 'V', long, action = clap::ArgAction::Version, global = true, help_heading = "General")]
    _version: Option<bool>,
    /// 设置日志输出级别
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true, help_heading = "General")]
    pub log_level: LogLevel,
    /// 额外将日志写入指定文件
    #[arg(long, value_name = "FILE", global = true, help_heading = "General")]
    pub log_file: Option<PathBuf>,
}
