// src/logging.rs

use crate::cli::LogLevel;
use fern::colors::{Color, ColoredLevelConfig};
use std::path::Path;

/// 初始化日志系统：输出到 stderr，指定 `--log-file` 时额外写入文件
pub fn init_logger(level: LogLevel, log_file: Option<&Path>) {
    if level == LogLevel::Off {
        return;
    }

    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Cyan)
        .trace(Color::BrightBlack);

    let console = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{}] [{:<5}] [{}:{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                colors.color(record.level()),
                record.target(),
                record.line().unwrap_or(0),
                message
            ))
        })
        .chain(std::io::stderr());

    let mut dispatch = fern::Dispatch::new()
        .level(level.into())
        // 依赖库的调试输出过于冗长
        .level_for("hyper_util", log::LevelFilter::Warn)
        .level_for("reqwest_retry", log::LevelFilter::Warn)
        .chain(console);

    if let Some(path) = log_file {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if let Err(e) = std::fs::create_dir_all(dir) {
                eprintln!("警告: 无法创建日志目录 {:?}: {}", dir, e);
            }
        }
        match fern::log_file(path) {
            Ok(file) => {
                dispatch = dispatch.chain(
                    fern::Dispatch::new()
                        .format(|out, message, record| {
                            out.finish(format_args!(
                                "[{}] [{:<5}] [{}:{}] - {}",
                                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                                record.level(),
                                record.target(),
                                record.line().unwrap_or(0),
                                message
                            ))
                        })
                        .chain(file),
                );
            }
            Err(e) => eprintln!("警告: 无法打开日志文件 {:?}: {}。日志将只输出到终端。", path, e),
        }
    }

    if let Err(e) = dispatch.apply() {
        eprintln!("警告: 日志系统初始化失败: {}", e);
    }
}
