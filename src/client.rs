// src/client.rs

use crate::{config::AppConfig, error::*, utils};
use log::{debug, warn};
use reqwest::{Response, StatusCode, header, redirect};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::sync::Arc;
use url::Url;

#[derive(Clone)]
pub struct RobustClient {
    pub client: ClientWithMiddleware,
    download_client: reqwest::Client,
    config: Arc<AppConfig>,
}

impl RobustClient {
    pub fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(
            reqwest::Client::builder()
                .user_agent(config.user_agent.clone())
                .connect_timeout(config.connect_timeout)
                .timeout(config.timeout)
                .redirect(redirect::Policy::limited(config.max_redirects))
                .build()?,
        )
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build();

        // 媒体文件可能较大，使用单独的、超时更长的客户端
        let download_client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout)
            .timeout(config.download_timeout)
            .redirect(redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self {
            client,
            download_client,
            config,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[cfg(any(test, feature = "testing"))]
    pub async fn get<T: reqwest::IntoUrl>(&self, url: T) -> AppResult<Response> {
        self.send(self.client.get(url)).await
    }

    /// 发送请求，并将 429 与其他非 2xx 状态转换为对应的错误
    pub async fn send(&self, request: RequestBuilder) -> AppResult<Response> {
        let res = request.send().await?;
        check_status(res)
    }

    /// 跟随重定向，返回最终落地的 URL。
    /// 只关心地址本身，不读取响应体，也不检查最终的状态码。
    pub async fn resolve_redirects(&self, url: &Url) -> AppResult<Url> {
        let res = self.client.get(url.clone()).send().await?;
        let final_url = res.url().clone();
        if res.status().is_client_error() || res.status().is_server_error() {
            warn!(
                "跟随重定向后 '{}' 返回状态 {}，仍使用该地址",
                final_url,
                res.status()
            );
        }
        debug!("重定向解析: {} -> {}", url, final_url);
        Ok(final_url)
    }

    /// 以流的方式获取媒体文件
    pub async fn fetch_media(&self, url: &Url, referer: Option<&str>) -> AppResult<Response> {
        let mut request = self.download_client.get(url.clone());
        if let Some(referer) = referer {
            request = request.header(header::REFERER, referer);
        }
        debug!(
            "开始获取媒体: {}",
            utils::truncate_text(url.as_str(), crate::constants::LOG_TRUNCATE_LENGTH)
        );
        let res = request.send().await?;
        check_status(res)
    }
}

fn check_status(res: Response) -> AppResult<Response> {
    let status = res.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(AppError::RateLimited(res.url().to_string()));
    }
    if !status.is_success() {
        return Err(AppError::UpstreamStatus {
            url: res.url().to_string(),
            status,
        });
    }
    Ok(res)
}
