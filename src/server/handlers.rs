// src/server/handlers.rs

use super::LinkInput;
use crate::{
    AppContext, constants,
    downloader::MediaProxy,
    error::*,
    models::{ResolveResponse, ResolvedMedia, ServiceInfo},
    normalizer::LinkNormalizer,
};
use anyhow::anyhow;
use axum::{
    Json,
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use log::info;
use serde_json::{Value, json};

pub(super) async fn index() -> Html<&'static str> {
    Html(constants::INDEX_HTML)
}

pub(super) async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": clap::crate_name!(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub(super) async fn services(State(context): State<AppContext>) -> Json<Vec<ServiceInfo>> {
    Json(context.resolver.services())
}

/// 规范化链接并依次尝试各解析服务
async fn resolve_link(context: &AppContext, input: &str) -> AppResult<ResolvedMedia> {
    let link = LinkNormalizer::new(&context.http_client)
        .normalize(input)
        .await?;
    context.resolver.resolve(&link, &context.http_client).await
}

pub(super) async fn resolve(
    State(context): State<AppContext>,
    LinkInput(input): LinkInput,
) -> AppResult<Json<ResolveResponse>> {
    let media = resolve_link(&context, &input).await?;
    Ok(Json(ResolveResponse::from(&media)))
}

pub(super) async fn download(
    State(context): State<AppContext>,
    LinkInput(input): LinkInput,
) -> AppResult<Response> {
    let media = resolve_link(&context, &input).await?;
    let proxied = MediaProxy::new(&context.http_client).fetch(&media).await?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, header_value(&proxied.content_type)?);
    headers.insert(
        header::CONTENT_DISPOSITION,
        header_value(&format!("attachment; filename=\"{}\"", proxied.filename))?,
    );
    if let Some(len) = proxied.content_length {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    }
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));

    info!("向客户端发送 '{}' (来自服务 '{}')", proxied.filename, media.service);
    let limit = context.config.max_download_bytes;
    let body = Body::from_stream(proxied.into_stream(limit));
    Ok((StatusCode::OK, headers, body).into_response())
}

fn header_value(value: &str) -> AppResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| AppError::Other(anyhow!("无效的响应头 '{}': {}", value, e)))
}
