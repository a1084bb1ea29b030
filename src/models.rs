// src/models.rs

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use url::Url;

/// 前端提交的表单或 JSON 请求体
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkPayload {
    #[serde(default, alias = "link")]
    pub url: Option<String>,
}

/// 经过规范化的 TikTok 视频页链接
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLink {
    pub original: String,
    pub url: Url,
    pub video_id: Option<String>,
}

/// 解析服务成功返回的无水印媒体
#[derive(Debug, Clone)]
pub struct ResolvedMedia {
    pub service: String,
    pub media_url: Url,
    pub source_url: Url,
    pub video_id: Option<String>,
    pub referer: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    HttpError,
    RateLimited,
    Timeout,
    ConnectionError,
    NetworkError,
    NoMatch,
    ServiceError,
    InvalidResponse,
    UnexpectedError,
}

impl From<&AppError> for AttemptStatus {
    fn from(error: &AppError) -> Self {
        match error {
            AppError::Network(_) | AppError::NetworkMiddleware(_) => match error.as_reqwest() {
                Some(err) if err.is_timeout() => AttemptStatus::Timeout,
                Some(err) if err.is_connect() => AttemptStatus::ConnectionError,
                Some(err) if err.is_status() => AttemptStatus::HttpError,
                Some(err) if err.is_decode() => AttemptStatus::InvalidResponse,
                _ => AttemptStatus::NetworkError,
            },
            AppError::UpstreamStatus { .. } => AttemptStatus::HttpError,
            AppError::RateLimited(_) => AttemptStatus::RateLimited,
            AppError::ExtractionFailed { .. } => AttemptStatus::NoMatch,
            AppError::ServiceError { .. } => AttemptStatus::ServiceError,
            AppError::Json(_) | AppError::ApiParseFailed { .. } | AppError::Url(_) => {
                AttemptStatus::InvalidResponse
            }
            _ => AttemptStatus::UnexpectedError,
        }
    }
}

/// 单个解析服务的一次失败尝试
#[derive(Debug, Clone, Serialize)]
pub struct ServiceAttempt {
    pub service: String,
    pub status: AttemptStatus,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolveResponse {
    pub status: &'static str,
    pub service: String,
    pub url: String,
    pub source_url: String,
    pub video_id: Option<String>,
}

impl From<&ResolvedMedia> for ResolveResponse {
    fn from(media: &ResolvedMedia) -> Self {
        Self {
            status: "success",
            service: media.service.clone(),
            url: media.media_url.to_string(),
            source_url: media.source_url.to_string(),
            video_id: media.video_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub name: String,
    pub kind: crate::config::ServiceKind,
}
