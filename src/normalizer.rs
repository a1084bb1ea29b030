// src/normalizer.rs

use crate::{client::RobustClient, error::*, models::NormalizedLink, utils};
use log::{debug, info, warn};
use url::Url;

/// 将用户输入 (分享文案、短链接、完整链接) 规范化为 TikTok 视频页链接
pub struct LinkNormalizer<'a> {
    client: &'a RobustClient,
    allowed_hosts: &'a [String],
}

impl<'a> LinkNormalizer<'a> {
    pub fn new(client: &'a RobustClient) -> Self {
        Self {
            client,
            allowed_hosts: &client.config().allowed_hosts,
        }
    }

    pub async fn normalize(&self, input: &str) -> AppResult<NormalizedLink> {
        let url = self.parse_input(input)?;

        if let Some(video_id) = utils::extract_video_id(url.path()) {
            debug!("链接已包含视频 ID {}，无需跟随重定向", video_id);
            return Ok(NormalizedLink {
                original: input.trim().to_string(),
                url: canonicalize(url),
                video_id: Some(video_id),
            });
        }

        let resolved = match self.client.resolve_redirects(&url).await {
            Ok(final_url) if self.is_allowed(&final_url) => final_url,
            Ok(final_url) => {
                warn!("短链接 '{}' 跳转到了不受支持的站点 '{}'，保留原链接", url, final_url);
                url
            }
            Err(e) => {
                warn!("解析短链接 '{}' 失败，保留原链接: {}", url, e);
                url
            }
        };

        let video_id = utils::extract_video_id(resolved.path());
        let url = canonicalize(resolved);
        info!("链接规范化完成: {} (视频 ID: {:?})", url, video_id);
        Ok(NormalizedLink {
            original: input.trim().to_string(),
            url,
            video_id,
        })
    }

    /// 解析并校验输入，不发起任何网络请求
    pub fn parse_input(&self, input: &str) -> AppResult<Url> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AppError::MissingLink);
        }

        let candidate = match utils::extract_first_url(trimmed) {
            Some(found) => found.to_string(),
            None if trimmed.contains("://") => trimmed.to_string(),
            None => format!("https://{}", trimmed),
        };

        let url = Url::parse(&candidate)
            .map_err(|e| AppError::InvalidLink(format!("'{}' ({})", trimmed, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::InvalidLink(format!("不支持的协议 '{}'", url.scheme())));
        }
        if !self.is_allowed(&url) {
            return Err(AppError::UnsupportedHost(
                url.host_str().unwrap_or_default().to_string(),
            ));
        }
        Ok(url)
    }

    fn is_allowed(&self, url: &Url) -> bool {
        url.host_str().is_some_and(|host| {
            self.allowed_hosts
                .iter()
                .any(|allowed| utils::host_matches(host, allowed))
        })
    }
}

/// 去掉查询参数与片段 (大多是分享追踪参数)
fn canonicalize(mut url: Url) -> Url {
    url.set_query(None);
    url.set_fragment(None);
    url
}
