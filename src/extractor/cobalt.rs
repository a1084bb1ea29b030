// src/extractor/cobalt.rs

use super::{MediaExtractor, utils};
use crate::{
    client::RobustClient,
    config::{ServiceConfig, ServiceKind},
    constants,
    error::*,
};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header;
use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

#[derive(Deserialize, Debug, Clone)]
pub struct CobaltPickerItem {
    pub url: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CobaltResponse {
    pub status: String,
    pub url: Option<String>,
    pub text: Option<String>,
    #[serde(default)]
    pub picker: Vec<CobaltPickerItem>,
}

/// cobalt 风格的 JSON API：提交 `{url, vQuality, isNoWatermark}`，响应中的 `status` 决定结果
pub struct CobaltExtractor {
    service: ServiceConfig,
}

impl CobaltExtractor {
    pub fn new(service: ServiceConfig) -> Self {
        Self { service }
    }

    fn request_body(&self, video_url: &Url) -> Value {
        let mut body = Map::new();
        body.insert(self.service.url_param.clone(), Value::from(video_url.as_str()));
        body.insert("vQuality".into(), Value::from(constants::services::COBALT_QUALITY));
        body.insert("isNoWatermark".into(), Value::from(true));
        // 配置中的参数可以覆盖上面的默认值
        body.extend(self.service.params.clone());
        Value::Object(body)
    }

    /// 将解析后的响应转换为媒体链接
    pub fn media_url_from_response(&self, response: CobaltResponse, base: &Url) -> AppResult<Url> {
        let candidate = match response.status.as_str() {
            "stream" | "redirect" | "tunnel" | "success" => response.url,
            "picker" => {
                debug!("服务 '{}' 返回 picker，共 {} 项，取第一项", self.service.name, response.picker.len());
                response.picker.into_iter().find_map(|item| item.url)
            }
            "error" => {
                return Err(AppError::ServiceError {
                    service: self.service.name.clone(),
                    message: response.text.unwrap_or_else(|| "未知错误".to_string()),
                });
            }
            other => {
                warn!("服务 '{}' 返回未知状态 '{}'", self.service.name, other);
                response.url
            }
        };

        candidate
            .and_then(|c| utils::resolve_media_url(&c, base))
            .ok_or_else(|| AppError::ExtractionFailed {
                service: self.service.name.clone(),
                reason: format!("响应状态为 '{}'，但没有可用的链接", response.status),
            })
    }
}

#[async_trait]
impl MediaExtractor for CobaltExtractor {
    fn name(&self) -> &str {
        &self.service.name
    }

    fn kind(&self) -> ServiceKind {
        ServiceKind::Cobalt
    }

    fn referer(&self) -> Option<&str> {
        self.service.referer.as_deref()
    }

    async fn extract_media_url(&self, video_url: &Url, client: &RobustClient) -> AppResult<Url> {
        let mut request = client
            .client
            .post(&self.service.endpoint)
            .header(header::ACCEPT, "application/json")
            .json(&self.request_body(video_url));
        for (key, value) in &self.service.headers {
            request = request.header(key.as_str(), value.as_str());
        }

        // cobalt 在出错时同样返回 JSON (状态码 4xx)，因此不经过 client.send 的状态检查
        let res = request.send().await?;
        let status = res.status();
        let base = res.url().clone();
        let text = res.text().await?;
        let response: CobaltResponse = serde_json::from_str(&text).map_err(|source| {
            if status.is_success() {
                AppError::ApiParseFailed {
                    url: base.to_string(),
                    source,
                }
            } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                AppError::RateLimited(base.to_string())
            } else {
                AppError::UpstreamStatus {
                    url: base.to_string(),
                    status,
                }
            }
        })?;
        debug!("服务 '{}' 响应状态: {} ({})", self.service.name, response.status, status);
        self.media_url_from_response(response, &base)
    }
}
