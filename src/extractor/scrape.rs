// src/extractor/scrape.rs

use super::{MediaExtractor, utils};
use crate::{
    client::RobustClient,
    config::{RequestMethod, ServiceConfig, ServiceKind},
    error::*,
};
use async_trait::async_trait;
use log::{debug, trace};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use reqwest::header;
use reqwest_middleware::RequestBuilder;
use serde_json::{Map, Value};
use url::Url;

/// 通用解析服务：按配置的方式提交视频链接，再用正则从 HTML/JSON 响应中提取媒体链接
pub struct ScrapeExtractor {
    service: ServiceConfig,
    patterns: Vec<Regex>,
}

impl ScrapeExtractor {
    pub fn new(service: ServiceConfig) -> AppResult<Self> {
        if service.patterns.is_empty() {
            return Err(AppError::Config(format!(
                "解析服务 '{}' 未配置任何提取规则 (patterns)",
                service.name
            )));
        }
        let patterns = service
            .patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| {
                    AppError::Config(format!("解析服务 '{}' 的正则 '{}' 无效: {}", service.name, p, e))
                })
            })
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Self { service, patterns })
    }

    /// 按服务要求构造请求
    fn build_request(&self, video_url: &Url, client: &RobustClient) -> AppResult<RequestBuilder> {
        let video = video_url.as_str();
        let request = match self.service.method {
            RequestMethod::Get => client.client.get(self.build_get_url(video)?),
            RequestMethod::PostForm => {
                let mut form: Vec<(String, String)> =
                    vec![(self.service.url_param.clone(), video.to_string())];
                form.extend(
                    self.service
                        .params
                        .iter()
                        .map(|(k, v)| (k.clone(), param_to_string(v))),
                );
                client.client.post(&self.service.endpoint).form(&form)
            }
            RequestMethod::PostJson => {
                let mut body = Map::new();
                body.insert(self.service.url_param.clone(), Value::from(video));
                body.extend(self.service.params.clone());
                client
                    .client
                    .post(&self.service.endpoint)
                    .header(header::ACCEPT, "application/json")
                    .json(&Value::Object(body))
            }
        };
        Ok(self.apply_headers(request))
    }

    /// `{url}` 占位符会被替换为编码后的视频链接，没有占位符时追加到查询参数中
    fn build_get_url(&self, video: &str) -> AppResult<Url> {
        let endpoint = &self.service.endpoint;
        let mut url = if endpoint.contains("{url}") {
            let encoded = utf8_percent_encode(video, NON_ALPHANUMERIC).to_string();
            Url::parse(&endpoint.replace("{url}", &encoded))?
        } else {
            let mut url = Url::parse(endpoint)?;
            url.query_pairs_mut()
                .append_pair(&self.service.url_param, video);
            url
        };
        if !self.service.params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.service.params {
                pairs.append_pair(key, &param_to_string(value));
            }
        }
        Ok(url)
    }

    fn apply_headers(&self, mut request: RequestBuilder) -> RequestBuilder {
        for (key, value) in &self.service.headers {
            request = request.header(key.as_str(), value.as_str());
        }
        if let Some(referer) = &self.service.referer {
            request = request.header(header::REFERER, referer.as_str());
        }
        request
    }

    /// 依次尝试每条规则，返回第一个有效的媒体链接
    pub fn find_media_url(&self, body: &str, base: &Url) -> Option<Url> {
        let template = self.service.media_template.as_deref();
        self.patterns.iter().find_map(|re| {
            re.captures_iter(body).find_map(|caps| {
                let candidate = utils::candidate_from_captures(&caps, template)?;
                trace!("服务 '{}' 候选链接: {}", self.service.name, candidate);
                utils::resolve_media_url(&candidate, base)
            })
        })
    }
}

#[async_trait]
impl MediaExtractor for ScrapeExtractor {
    fn name(&self) -> &str {
        &self.service.name
    }

    fn kind(&self) -> ServiceKind {
        ServiceKind::Scrape
    }

    fn referer(&self) -> Option<&str> {
        self.service.referer.as_deref()
    }

    async fn extract_media_url(&self, video_url: &Url, client: &RobustClient) -> AppResult<Url> {
        let request = self.build_request(video_url, client)?;
        let res = client.send(request).await?;
        let base = res.url().clone();
        let body = res.text().await?;
        debug!(
            "服务 '{}' 响应 {} 字节，开始提取",
            self.service.name,
            body.len()
        );

        self.find_media_url(&body, &base)
            .ok_or_else(|| AppError::ExtractionFailed {
                service: self.service.name.clone(),
                reason: format!("{} 条提取规则均未匹配到有效链接", self.patterns.len()),
            })
    }
}

/// 表单与查询参数只接受字符串，非字符串的 JSON 值按其字面量输出
fn param_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
