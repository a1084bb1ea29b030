// src/server/input.rs

use crate::{error::AppError, models::LinkPayload};
use axum::{
    Form, Json, async_trait,
    extract::{FromRequest, Request},
    http::header,
};

/// 从表单或 JSON 请求体中读取 `url` 字段，并校验其非空
#[derive(Debug, Clone)]
pub struct LinkInput(pub String);

#[async_trait]
impl<S> FromRequest<S> for LinkInput
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.trim_start().to_lowercase().starts_with("application/json"));

        let payload = if is_json {
            let Json(payload) = Json::<LinkPayload>::from_request(req, state)
                .await
                .map_err(|e| AppError::UserInputError(format!("无法解析 JSON 请求体: {}", e.body_text())))?;
            payload
        } else {
            let Form(payload) = Form::<LinkPayload>::from_request(req, state)
                .await
                .map_err(|e| AppError::UserInputError(format!("无法解析表单: {}", e.body_text())))?;
            payload
        };

        payload
            .url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .map(LinkInput)
            .ok_or(AppError::MissingLink)
    }
}
