// src/downloader/dispatcher.rs

use super::job::WatermarkFreeResolver;
use crate::{
    config::{AppConfig, ServiceConfig, ServiceKind},
    error::*,
    extractor::{MediaExtractor, cobalt::CobaltExtractor, scrape::ScrapeExtractor},
};
use itertools::Itertools;
use log::{debug, info};

/// 这部分 `impl` 负责根据配置创建有序的提取器列表。
impl WatermarkFreeResolver {
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let duplicated: Vec<_> = config
            .services
            .iter()
            .map(|s| s.name.as_str())
            .duplicates()
            .collect();
        if !duplicated.is_empty() {
            return Err(AppError::Config(format!(
                "解析服务名称重复: {}",
                duplicated.join(", ")
            )));
        }

        let extractors = config
            .services
            .iter()
            .filter(|s| s.enabled)
            .map(create_extractor)
            .collect::<AppResult<Vec<_>>>()?;

        if extractors.is_empty() {
            return Err(AppError::Config("没有可用的解析服务".into()));
        }
        info!(
            "已加载 {} 个解析服务: {}",
            extractors.len(),
            extractors.iter().map(|e| e.name()).collect::<Vec<_>>().join(" -> ")
        );
        Ok(Self::new(extractors))
    }
}

/// 根据服务类型创建具体的提取器实例。
pub(super) fn create_extractor(service: &ServiceConfig) -> AppResult<Box<dyn MediaExtractor>> {
    match service.kind {
        ServiceKind::Scrape => {
            debug!("创建 ScrapeExtractor '{}' ({:?} {})", service.name, service.method, service.endpoint);
            Ok(Box::new(ScrapeExtractor::new(service.clone())?))
        }
        ServiceKind::Cobalt => {
            debug!("创建 CobaltExtractor '{}' ({})", service.name, service.endpoint);
            Ok(Box::new(CobaltExtractor::new(service.clone())))
        }
    }
}
