// src/extractor/mod.rs

pub mod cobalt;
pub mod scrape;
mod utils;

use crate::{client::RobustClient, config::ServiceKind, error::*};
use async_trait::async_trait;
use url::Url;

/// 一个第三方去水印解析服务
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> ServiceKind;

    /// 服务下发的媒体链接若需要特定 Referer 才能访问，在此声明
    fn referer(&self) -> Option<&str> {
        None
    }

    async fn extract_media_url(&self, video_url: &Url, client: &RobustClient) -> AppResult<Url>;
}
