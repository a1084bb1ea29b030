// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::Arc;
use tt_dl::{
    AppContext,
    client::RobustClient,
    config::{AppConfig, RequestMethod, ServiceConfig, ServiceKind},
    server,
};

/// 一个以 GET 请求 `{base}{path}`、从 JSON 的 `play` 字段取链接的服务
pub fn json_service(name: &str, base: &str, path: &str) -> ServiceConfig {
    ServiceConfig::scrape(
        name,
        &format!("{}{}", base, path),
        &[r#""play"\s*:\s*"([^"]+)""#],
    )
}

pub fn cobalt_service(name: &str, base: &str, path: &str) -> ServiceConfig {
    let mut service = ServiceConfig::scrape(name, &format!("{}{}", base, path), &[]);
    service.kind = ServiceKind::Cobalt;
    service.method = RequestMethod::PostJson;
    service
}

pub fn config_with(services: Vec<ServiceConfig>) -> AppConfig {
    let mut config = AppConfig::default();
    config.services = services;
    config
}

pub fn client_for(config: &AppConfig) -> RobustClient {
    RobustClient::new(Arc::new(config.clone())).expect("Failed to create client")
}

/// 在随机端口上启动服务，返回其基础地址
pub async fn spawn_app(config: AppConfig) -> String {
    let context = AppContext::new(Arc::new(config)).expect("Failed to build context");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, server::router(context)).await.unwrap();
    });
    format!("http://{}", addr)
}
