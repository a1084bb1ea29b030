// src/error.rs

use crate::models::ServiceAttempt;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::{error, warn};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("未提供链接，请在 'url' 字段中填写 TikTok 分享链接")]
    MissingLink,
    #[error("无效的链接: {0}")]
    InvalidLink(String),
    #[error("不支持的站点: '{0}'")]
    UnsupportedHost(String),
    #[error("网络请求失败: {0}")]
    Network(#[from] reqwest::Error),
    #[error("网络中间件错误: {0}")]
    NetworkMiddleware(#[from] reqwest_middleware::Error),
    #[error("上游 '{url}' 返回了错误状态: {status}")]
    UpstreamStatus {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("上游 '{0}' 请求过于频繁 (429)")]
    RateLimited(String),
    #[error("服务 '{service}' 未能提取到媒体链接: {reason}")]
    ExtractionFailed { service: String, reason: String },
    #[error("服务 '{service}' 返回错误: {message}")]
    ServiceError { service: String, message: String },
    #[error("所有解析服务均失败 (共尝试 {} 个)", .0.len())]
    AllServicesFailed(Vec<ServiceAttempt>),
    #[error("上游返回的不是媒体文件: {0}")]
    UnexpectedContent(String),
    #[error("媒体文件过大: {0} 字节")]
    PayloadTooLarge(u64),
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),
    #[error("无法解析来自 '{url}' 的API响应: {source}")]
    ApiParseFailed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("URL 解析错误: {0}")]
    Url(#[from] url::ParseError),
    #[error("配置错误: {0}")]
    Config(String),
    #[error("{0}")] // 只打印内部信息，不加任何前缀
    UserInputError(String),
    #[error("未知错误: {0}")]
    Other(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// 底层 reqwest 错误 (无论是否经过中间件)
    pub fn as_reqwest(&self) -> Option<&reqwest::Error> {
        match self {
            AppError::Network(err)
            | AppError::NetworkMiddleware(reqwest_middleware::Error::Reqwest(err)) => Some(err),
            _ => None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingLink
            | AppError::InvalidLink(_)
            | AppError::UnsupportedHost(_)
            | AppError::UserInputError(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Network(_) | AppError::NetworkMiddleware(_)
                if self.as_reqwest().is_some_and(|e| e.is_timeout()) =>
            {
                StatusCode::GATEWAY_TIMEOUT
            }
            AppError::Network(_)
            | AppError::NetworkMiddleware(_)
            | AppError::UpstreamStatus { .. }
            | AppError::RateLimited(_)
            | AppError::ExtractionFailed { .. }
            | AppError::ServiceError { .. }
            | AppError::AllServicesFailed(_)
            | AppError::UnexpectedContent(_)
            | AppError::ApiParseFailed { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("请求处理失败 ({}): {}", status, self);
        } else {
            warn!("请求被拒绝 ({}): {}", status, self);
        }

        let body = match &self {
            AppError::AllServicesFailed(attempts) => json!({
                "status": "error",
                "message": self.to_string(),
                "attempts": attempts,
            }),
            _ => json!({
                "status": "error",
                "message": self.to_string(),
            }),
        };
        (status, Json(body)).into_response()
    }
}
