// src/config.rs

pub mod file;

use crate::{
    cli::Cli,
    constants::{self, services},
    error::{AppError, AppResult},
};
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{collections::BTreeMap, net::SocketAddr, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    pub bind: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub connect_timeout_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub download_timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub max_redirects: Option<usize>,
    pub max_download_mb: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    pub allowed_hosts: Vec<String>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            allowed_hosts: constants::link::DEFAULT_ALLOWED_HOSTS
                .iter()
                .map(|h| h.to_string())
                .collect(),
        }
    }
}

/// 解析服务的实现方式，直接从 JSON 文件中反序列化
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
pub enum ServiceKind {
    /// 通用的 "请求 + 正则提取" 服务
    #[default]
    Scrape,
    /// cobalt 风格的 JSON API
    Cobalt,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestMethod {
    #[default]
    Get,
    PostForm,
    PostJson,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub kind: ServiceKind,
    pub endpoint: String,
    #[serde(default)]
    pub method: RequestMethod,
    #[serde(default = "default_url_param")]
    pub url_param: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,
}

// --- 为上面的 serde default 添加辅助函数 ---
fn default_enabled() -> bool {
    true
}

fn default_url_param() -> String {
    "url".to_string()
}

impl ServiceConfig {
    /// 一个以 GET 方式请求、用正则提取的最小服务配置
    pub fn scrape(name: &str, endpoint: &str, patterns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            enabled: true,
            kind: ServiceKind::Scrape,
            endpoint: endpoint.to_string(),
            method: RequestMethod::Get,
            url_param: default_url_param(),
            params: BTreeMap::new(),
            headers: BTreeMap::new(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            media_template: None,
            referer: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub link: LinkConfig,
    pub services: Vec<ServiceConfig>,
}

impl ExternalConfig {
    pub fn default_app_config() -> Self {
        let tikwm = ServiceConfig {
            params: BTreeMap::from([("hd".into(), Value::from("1"))]),
            ..ServiceConfig::scrape(
                services::TIKWM,
                "https://www.tikwm.com/api/",
                &[r#""hdplay"\s*:\s*"([^"]+)""#, r#""play"\s*:\s*"([^"]+)""#],
            )
        };

        let cobalt = ServiceConfig {
            kind: ServiceKind::Cobalt,
            method: RequestMethod::PostJson,
            params: BTreeMap::from([
                ("vQuality".into(), Value::from(services::COBALT_QUALITY)),
                ("isNoWatermark".into(), Value::from(true)),
            ]),
            ..ServiceConfig::scrape(services::COBALT, "https://api.cobalt.tools/api/json", &[])
        };

        let tikmate = ServiceConfig {
            method: RequestMethod::PostForm,
            media_template: Some("https://tikmate.app/download/{token}/{id}.mp4".into()),
            ..ServiceConfig::scrape(
                services::TIKMATE,
                "https://api.tikmate.app/api/lookup",
                &[r#"(?s)"token"\s*:\s*"(?P<token>[^"]+)".*?"id"\s*:\s*"(?P<id>[^"]+)""#],
            )
        };

        let ssstik = ServiceConfig {
            method: RequestMethod::PostForm,
            url_param: "id".into(),
            params: BTreeMap::from([
                ("locale".into(), Value::from("en")),
                ("tt".into(), Value::from("0")),
            ]),
            headers: BTreeMap::from([("HX-Request".into(), "true".into())]),
            referer: Some("https://ssstik.io/".into()),
            ..ServiceConfig::scrape(
                services::SSSTIK,
                "https://ssstik.io/abc?url=dl",
                &[r#"href="(https?://[^"]+)"[^>]*without_watermark"#],
            )
        };

        // 为 NetworkConfig 提供一组稳健的默认值
        let network_config = NetworkConfig {
            connect_timeout_secs: Some(10),
            timeout_secs: Some(20),
            download_timeout_secs: Some(300),
            max_retries: Some(1),
            max_redirects: Some(10),
            max_download_mb: Some(512),
        };

        Self {
            server: ServerConfig {
                bind: Some(constants::DEFAULT_BIND.into()),
                port: Some(constants::DEFAULT_PORT),
            },
            network: network_config,
            link: LinkConfig::default(),
            services: vec![tikwm, cobalt, tikmate, ssstik],
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub download_timeout: Duration,
    pub max_retries: u32,
    pub max_redirects: usize,
    pub max_download_bytes: Option<u64>,
    pub allowed_hosts: Vec<String>,
    pub services: Vec<ServiceConfig>,
}

impl AppConfig {
    pub fn new(args: &Cli) -> AppResult<Self> {
        let external_config = match &args.config {
            Some(path) => file::load_external_config(path)?,
            None => file::load_or_create_external_config()?,
        };
        Self::from_external(external_config, args)
    }

    /// 将配置文件内容与命令行参数合并为最终配置
    pub fn from_external(external_config: ExternalConfig, args: &Cli) -> AppResult<Self> {
        let (bind_addr, source) = file::resolve_bind_addr(args, &external_config.server)?;
        debug!("监听地址 {} 来自 {}", bind_addr, source);

        let services = select_services(external_config.services, args.services.as_deref())?;
        let network = external_config.network;
        let max_download_bytes = match network.max_download_mb.filter(|mb| *mb > 0) {
            Some(mb) => Some(mb.checked_mul(1024 * 1024).ok_or_else(|| {
                AppError::Config(format!("max_download_mb 过大: {}", mb))
            })?),
            None => None,
        };

        Ok(Self {
            bind_addr,
            user_agent: constants::USER_AGENT.into(),
            connect_timeout: Duration::from_secs(network.connect_timeout_secs.unwrap_or(10)),
            timeout: Duration::from_secs(network.timeout_secs.unwrap_or(20)),
            download_timeout: Duration::from_secs(network.download_timeout_secs.unwrap_or(300)),
            max_retries: network.max_retries.unwrap_or(1),
            max_redirects: network.max_redirects.unwrap_or(10),
            max_download_bytes,
            allowed_hosts: external_config
                .link
                .allowed_hosts
                .into_iter()
                .map(|h| h.trim().trim_start_matches('.').to_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
            services,
        })
    }
}

/// 过滤掉禁用的服务；若指定了 `--services`，则按其顺序重新排列
fn select_services(
    all: Vec<ServiceConfig>,
    only: Option<&[String]>,
) -> AppResult<Vec<ServiceConfig>> {
    let selected = match only {
        None => all.into_iter().filter(|s| s.enabled).collect::<Vec<_>>(),
        Some(names) => names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(|name| {
                all.iter()
                    .find(|s| s.name == name)
                    .cloned()
                    .map(|mut s| {
                        s.enabled = true;
                        s
                    })
                    .ok_or_else(|| {
                        let valid = all.iter().map(|s| s.name.as_str()).join(", ");
                        AppError::Config(format!("未知的解析服务 '{}'。有效选项: {}", name, valid))
                    })
            })
            .collect::<AppResult<Vec<_>>>()?,
    };

    if selected.is_empty() {
        return Err(AppError::Config("没有可用的解析服务".into()));
    }
    Ok(selected)
}

#[cfg(any(test, feature = "testing"))]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            user_agent: "test-agent/1.0".to_string(),
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(15),
            download_timeout: Duration::from_secs(30),
            max_retries: 0,
            max_redirects: 5,
            max_download_bytes: None,
            allowed_hosts: vec!["tiktok.com".to_string(), "127.0.0.1".to_string()],
            services: Vec::new(),
        }
    }
}
