// src/downloader/proxy.rs

use crate::{client::RobustClient, constants, error::*, models::ResolvedMedia, utils};
use axum::body::Bytes;
use futures::{Stream, StreamExt};
use log::{debug, info, warn};
use reqwest::{Response, header};
use std::io;

/// 已在服务端建立连接、等待转发给浏览器的媒体响应
#[derive(Debug)]
pub struct ProxiedMedia {
    pub response: Response,
    pub filename: String,
    pub content_type: String,
    pub content_length: Option<u64>,
}

impl ProxiedMedia {
    /// 转为字节流；上游未声明长度时，在转发过程中累计并强制执行大小上限
    pub fn into_stream(self, limit: Option<u64>) -> impl Stream<Item = Result<Bytes, io::Error>> + Send {
        let filename = self.filename;
        let mut received: u64 = 0;
        self.response.bytes_stream().map(move |chunk| {
            let chunk = chunk.map_err(io::Error::other)?;
            received += chunk.len() as u64;
            match limit {
                Some(limit) if received > limit => {
                    warn!("'{}' 超过大小上限 {} 字节，中断转发", filename, limit);
                    Err(io::Error::other(AppError::PayloadTooLarge(received).to_string()))
                }
                _ => Ok(chunk),
            }
        })
    }
}

/// 在服务端拉取媒体文件，从而绕过浏览器的跨域限制
pub struct MediaProxy<'a> {
    client: &'a RobustClient,
}

impl<'a> MediaProxy<'a> {
    pub fn new(client: &'a RobustClient) -> Self {
        Self { client }
    }

    pub async fn fetch(&self, media: &ResolvedMedia) -> AppResult<ProxiedMedia> {
        let response = self
            .client
            .fetch_media(&media.media_url, media.referer.as_deref())
            .await?;

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| constants::DEFAULT_MEDIA_CONTENT_TYPE.to_string());
        check_content_type(&content_type)?;

        let content_length = response.content_length();
        if let (Some(len), Some(limit)) = (content_length, self.client.config().max_download_bytes) {
            if len > limit {
                return Err(AppError::PayloadTooLarge(len));
            }
        }

        let filename = utils::media_filename(media.video_id.as_deref(), &content_type);
        info!(
            "开始转发 '{}' (服务: {}, 类型: {}, 大小: {})",
            filename,
            media.service,
            content_type,
            content_length.map_or("未知".to_string(), |l| format!("{} 字节", l))
        );
        Ok(ProxiedMedia {
            response,
            filename,
            content_type,
            content_length,
        })
    }
}

/// 解析服务偶尔会返回网页或错误 JSON，而不是媒体文件
fn check_content_type(content_type: &str) -> AppResult<()> {
    let mime = content_type.split(';').next().unwrap_or_default().trim().to_lowercase();
    debug!("上游媒体类型: {}", mime);
    if mime.starts_with("text/") || mime == "application/json" || mime.ends_with("+json") {
        return Err(AppError::UnexpectedContent(mime));
    }
    Ok(())
}
