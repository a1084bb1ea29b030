// src/config/file.rs

use crate::{
    cli::Cli,
    config::{ExternalConfig, ServerConfig},
    constants,
    error::{AppError, AppResult},
};
use anyhow::{Context, anyhow};
use log::{debug, info};
use std::{
    fs,
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
};

pub(super) fn get_config_path() -> AppResult<PathBuf> {
    let path = dirs::home_dir()
        .ok_or_else(|| AppError::Other(anyhow!("无法获取用户主目录")))?
        .join(constants::CONFIG_DIR_NAME)
        .join(constants::CONFIG_FILE_NAME);
    Ok(path)
}

/// 读取用户显式指定的配置文件，文件必须存在
pub(crate) fn load_external_config(path: &Path) -> AppResult<ExternalConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("读取配置文件 '{}' 失败", path.display()))?;
    let config: ExternalConfig = serde_json::from_str(&content)
        .with_context(|| format!("解析配置文件 '{}' 失败", path.display()))?;
    info!("已加载配置文件: {}", path.display());
    Ok(config)
}

pub(crate) fn load_or_create_external_config() -> AppResult<ExternalConfig> {
    let config_path = get_config_path()?;
    if config_path.is_file() {
        load_external_config(&config_path)
    } else {
        info!("配置文件 {:?} 不存在，将创建默认配置。", config_path);
        let config = ExternalConfig::default_app_config();

        if let Some(dir) = config_path.parent() {
            fs::create_dir_all(dir)?;
        }

        let json_content = serde_json::to_string_pretty(&config)?;
        fs::write(&config_path, json_content)?;

        Ok(config)
    }
}

/// 按 命令行参数 > 环境变量 > 配置文件 > 默认值 的顺序确定监听地址。
/// 返回地址及其来源描述。
pub fn resolve_bind_addr(args: &Cli, server: &ServerConfig) -> AppResult<(SocketAddr, String)> {
    let (host, host_source) = if let Some(bind) = args.bind.as_deref().filter(|b| !b.is_empty()) {
        (bind.to_string(), "命令行参数")
    } else if let Some(bind) = env_value(constants::env::BIND) {
        (bind, "环境变量")
    } else if let Some(bind) = server.bind.clone().filter(|b| !b.is_empty()) {
        (bind, "配置文件")
    } else {
        (constants::DEFAULT_BIND.to_string(), "默认值")
    };

    let (port, port_source) = if let Some(port) = args.port {
        (port, "命令行参数")
    } else if let Some(raw) = env_value(constants::env::PORT) {
        let port = raw.parse::<u16>().map_err(|_| {
            AppError::Config(format!("环境变量 {} 的值 '{}' 不是有效端口", constants::env::PORT, raw))
        })?;
        (port, "环境变量")
    } else if let Some(port) = server.port {
        (port, "配置文件")
    } else {
        (constants::DEFAULT_PORT, "默认值")
    };

    let ip: IpAddr = host
        .parse()
        .map_err(|_| AppError::Config(format!("无效的监听地址 '{}'", host)))?;
    debug!("监听地址: {} ({}), 端口: {} ({})", host, host_source, port, port_source);
    Ok((
        SocketAddr::new(ip, port),
        format!("地址: {} / 端口: {}", host_source, port_source),
    ))
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
