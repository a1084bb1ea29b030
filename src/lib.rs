// src/lib.rs

pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod downloader;
pub mod error;
pub mod extractor;
pub mod logging;
pub mod models;
pub mod normalizer;
pub mod server;
pub mod symbols;
pub mod ui;
pub mod utils;

use crate::{
    cli::Cli,
    client::RobustClient,
    config::{AppConfig, ExternalConfig},
    downloader::WatermarkFreeResolver,
    error::AppResult,
};
use log::{debug, info};
use std::sync::Arc;

/// 每个请求共享的服务状态
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub http_client: Arc<RobustClient>,
    pub resolver: Arc<WatermarkFreeResolver>,
}

impl AppContext {
    pub fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        let http_client = Arc::new(RobustClient::new(config.clone())?);
        let resolver = Arc::new(WatermarkFreeResolver::from_config(&config)?);
        Ok(Self {
            config,
            http_client,
            resolver,
        })
    }
}

/// 库的公共入口点，由 `main.rs` 调用
pub async fn run_from_cli(args: Arc<Cli>) -> AppResult<()> {
    debug!("CLI 参数: {:?}", args);
    if args.print_config {
        println!(
            "{}",
            serde_json::to_string_pretty(&ExternalConfig::default_app_config())?
        );
        return Ok(());
    }

    let config = Arc::new(AppConfig::new(&args)?);
    debug!("加载的应用配置: {:?}", config);

    let context = AppContext::new(config.clone())?;
    let listener = server::bind(config.bind_addr).await?;
    let addr = listener.local_addr()?;
    ui::print_banner(&config, addr);
    println!("{} 在浏览器中打开上述地址，粘贴 TikTok 分享链接即可下载。", *symbols::INFO);
    info!("共 {} 个解析服务可用", config.services.len());

    server::serve(listener, context).await?;
    println!("\n{} 服务已停止。", *symbols::OK);
    Ok(())
}
