// src/downloader/job.rs

use crate::{
    client::RobustClient,
    error::*,
    extractor::MediaExtractor,
    models::{AttemptStatus, NormalizedLink, ResolvedMedia, ServiceAttempt, ServiceInfo},
};
use log::{info, warn};

/// 按固定顺序依次尝试各解析服务，第一个成功的结果即为最终结果。
pub struct WatermarkFreeResolver {
    extractors: Vec<Box<dyn MediaExtractor>>,
}

impl WatermarkFreeResolver {
    pub fn new(extractors: Vec<Box<dyn MediaExtractor>>) -> Self {
        Self { extractors }
    }

    pub fn services(&self) -> Vec<ServiceInfo> {
        self.extractors
            .iter()
            .map(|e| ServiceInfo {
                name: e.name().to_string(),
                kind: e.kind(),
            })
            .collect()
    }

    pub async fn resolve(
        &self,
        link: &NormalizedLink,
        client: &RobustClient,
    ) -> AppResult<ResolvedMedia> {
        info!("开始解析: {}", link.url);
        let mut attempts = Vec::with_capacity(self.extractors.len());

        for (i, extractor) in self.extractors.iter().enumerate() {
            let name = extractor.name();
            match extractor.extract_media_url(&link.url, client).await {
                Ok(media_url) => {
                    info!(
                        "服务 '{}' ({}/{}) 解析成功: {}",
                        name,
                        i + 1,
                        self.extractors.len(),
                        media_url
                    );
                    return Ok(ResolvedMedia {
                        service: name.to_string(),
                        media_url,
                        source_url: link.url.clone(),
                        video_id: link.video_id.clone(),
                        referer: extractor.referer().map(str::to_string),
                    });
                }
                Err(e) => {
                    let status = AttemptStatus::from(&e);
                    warn!("服务 '{}' 解析失败 ({:?}): {}", name, status, e);
                    attempts.push(ServiceAttempt {
                        service: name.to_string(),
                        status,
                        message: e.to_string(),
                    });
                }
            }
        }

        Err(AppError::AllServicesFailed(attempts))
    }
}
