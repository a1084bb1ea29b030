// src/extractor/utils.rs

use log::trace;
use regex::{Captures, Regex};
use std::sync::LazyLock;
use url::Url;

static TEMPLATE_FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

/// 从一次正则匹配中取出候选链接。
/// 有模板时用命名分组填充模板，否则取第 1 个分组 (没有分组时取整个匹配)。
pub fn candidate_from_captures(caps: &Captures, template: Option<&str>) -> Option<String> {
    match template {
        Some(template) => fill_template(template, caps),
        None => caps
            .get(1)
            .or_else(|| caps.get(0))
            .map(|m| m.as_str().to_string()),
    }
}

/// 模板中任何一个字段缺失都视为失败，避免拼出残缺的链接
fn fill_template(template: &str, caps: &Captures) -> Option<String> {
    let mut missing = false;
    let filled = TEMPLATE_FIELD_RE.replace_all(template, |field: &Captures| {
        match caps.name(&field[1]) {
            Some(m) => clean_candidate(m.as_str()),
            None => {
                missing = true;
                String::new()
            }
        }
    });
    if missing { None } else { Some(filled.into_owned()) }
}

/// 还原 JSON/HTML 中被转义的链接，例如 `https:\/\/a.com\/x?b=1&c=2` 或 `&amp;`
pub fn clean_candidate(raw: &str) -> String {
    let unescaped = if raw.contains('\\') {
        serde_json::from_str::<String>(&format!("\"{}\"", raw)).unwrap_or_else(|_| raw.replace("\\/", "/"))
    } else {
        raw.to_string()
    };
    unescaped.replace("&amp;", "&").trim().to_string()
}

/// 以服务端点为基准解析候选链接 (兼容相对路径)，只接受 http(s)
pub fn resolve_media_url(candidate: &str, base: &Url) -> Option<Url> {
    let cleaned = clean_candidate(candidate);
    if cleaned.is_empty() {
        return None;
    }
    let url = base.join(&cleaned).ok()?;
    if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() {
        Some(url)
    } else {
        trace!("丢弃非 http(s) 候选链接: {}", cleaned);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_candidate_unescapes_json_and_html() {
        assert_eq!(
            clean_candidate(r"https:\/\/cdn.example\/v.mp4?a=1&b=2"),
            "https://cdn.example/v.mp4?a=1&b=2"
        );
        assert_eq!(
            clean_candidate("https://cdn.example/v.mp4?a=1&amp;b=2"),
            "https://cdn.example/v.mp4?a=1&b=2"
        );
        assert_eq!(clean_candidate("  https://x.example/a  "), "https://x.example/a");
    }

    #[test]
    fn test_resolve_media_url_handles_relative_and_rejects_other_schemes() {
        let base = Url::parse("https://www.tikwm.com/api/").unwrap();
        assert_eq!(
            resolve_media_url("/video/media/play/1.mp4", &base).unwrap().as_str(),
            "https://www.tikwm.com/video/media/play/1.mp4"
        );
        assert_eq!(
            resolve_media_url("https://cdn.example/v.mp4", &base).unwrap().as_str(),
            "https://cdn.example/v.mp4"
        );
        assert!(resolve_media_url("javascript:alert(1)", &base).is_none());
        assert!(resolve_media_url("", &base).is_none());
    }

    #[test]
    fn test_candidate_from_captures_with_template() {
        let re = Regex::new(r#""token":"(?P<token>[^"]+)","id":"(?P<id>\d+)""#).unwrap();
        let caps = re.captures(r#"{"token":"abc","id":"42"}"#).unwrap();
        assert_eq!(
            candidate_from_captures(&caps, Some("https://dl.example/{token}/{id}.mp4")),
            Some("https://dl.example/abc/42.mp4".to_string())
        );
        assert_eq!(
            candidate_from_captures(&caps, Some("https://dl.example/{missing}.mp4")),
            None
        );
    }

    #[test]
    fn test_candidate_from_captures_without_groups_uses_whole_match() {
        let re = Regex::new(r"https://cdn\.example/\S+\.mp4").unwrap();
        let caps = re.captures("see https://cdn.example/a.mp4 now").unwrap();
        assert_eq!(
            candidate_from_captures(&caps, None),
            Some("https://cdn.example/a.mp4".to_string())
        );
    }
}
