// src/utils.rs

use crate::constants;
use regex::Regex;
use std::sync::LazyLock;

static SHARED_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[A-Za-z0-9\-._~:/?#@!$&*+,;=%]+").unwrap());
static VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(?:video|photo|v)/(\d+)").unwrap());
static ILLEGAL_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/*?:"<>|\x00-\x1f]"#).unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// 从分享文案中取出第一个 http(s) 链接，并去掉尾随的标点
pub fn extract_first_url(text: &str) -> Option<&str> {
    SHARED_URL_RE
        .find(text)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', '!', ')', '，', '。']))
}

/// 从视频页路径中提取数字 ID，例如 `/@user/video/7234567890123456789`
pub fn extract_video_id(path: &str) -> Option<String> {
    VIDEO_ID_RE
        .captures(path)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// `host` 与 `allowed` 相同，或是其子域名
pub fn host_matches(host: &str, allowed: &str) -> bool {
    let host = host.trim_end_matches('.').to_lowercase();
    host == allowed || host.ends_with(&format!(".{}", allowed))
}

pub fn extension_for_content_type(content_type: &str) -> &'static str {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    match mime.as_str() {
        "video/mp4" => "mp4",
        "video/webm" => "webm",
        "video/quicktime" => "mov",
        "audio/mpeg" => "mp3",
        "audio/mp4" | "audio/x-m4a" => "m4a",
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        _ => constants::DEFAULT_MEDIA_EXTENSION,
    }
}

/// 生成下载文件名: `tiktok_<id>.<ext>`，没有 ID 时退回默认名称
pub fn media_filename(video_id: Option<&str>, content_type: &str) -> String {
    let stem = match video_id {
        Some(id) if !id.is_empty() => format!("tiktok_{}", id),
        _ => constants::DEFAULT_FILENAME_STEM.to_string(),
    };
    sanitize_filename(&format!("{}.{}", stem, extension_for_content_type(content_type)))
}

/// 清理文件名，使其可以安全地放入 Content-Disposition 头
pub fn sanitize_filename(name: &str) -> String {
    let name = ILLEGAL_CHARS_RE.replace_all(name.trim(), " ");
    let name = WHITESPACE_RE.replace_all(&name, "_");
    let name: String = name
        .chars()
        .filter(|c| c.is_ascii_graphic())
        .collect::<String>()
        .trim_matches('.')
        .to_string();
    if name.is_empty() {
        return format!(
            "{}.{}",
            constants::DEFAULT_FILENAME_STEM,
            constants::DEFAULT_MEDIA_EXTENSION
        );
    }
    safe_truncate_utf8(&name, constants::MAX_FILENAME_BYTES).to_string()
}

fn safe_truncate_utf8(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes { return s; }
    let mut i = max_bytes;
    while i > 0 && !s.is_char_boundary(i) { i -= 1; }
    &s[..i]
}

pub fn truncate_text(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut end_pos = 0;
    for (i, c) in text.char_indices() {
        width += if c.is_ascii() { 1 } else { 2 };
        if width > max_width.saturating_sub(3) {
            end_pos = i;
            break;
        }
    }
    if end_pos == 0 { text.to_string() } else { format!("{}...", &text[..end_pos]) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_first_url() {
        // 测试分享文案
        assert_eq!(
            extract_first_url("看看这个 https://vm.tiktok.com/ZMabc123/ #fyp"),
            Some("https://vm.tiktok.com/ZMabc123/")
        );
        // 测试尾随标点
        assert_eq!(
            extract_first_url("链接: https://www.tiktok.com/@a/video/1."),
            Some("https://www.tiktok.com/@a/video/1")
        );
        // 测试紧跟在链接后面的中文文案
        assert_eq!(
            extract_first_url("复制打开 https://vm.tiktok.com/ZMabc/复制此链接"),
            Some("https://vm.tiktok.com/ZMabc/")
        );
        assert_eq!(
            extract_first_url("【TikTok】https://www.tiktok.com/@a/video/1?lang=en，快来看"),
            Some("https://www.tiktok.com/@a/video/1?lang=en")
        );
        assert_eq!(
            extract_first_url(r#"<a href="https://vm.tiktok.com/ZMx/">"#),
            Some("https://vm.tiktok.com/ZMx/")
        );
        // 测试无链接
        assert_eq!(extract_first_url("vm.tiktok.com/ZMabc"), None);
    }

    #[test]
    fn test_extract_video_id() {
        assert_eq!(
            extract_video_id("/@someone/video/7234567890123456789"),
            Some("7234567890123456789".to_string())
        );
        assert_eq!(extract_video_id("/@someone/photo/42"), Some("42".to_string()));
        assert_eq!(extract_video_id("/v/123456.html"), Some("123456".to_string()));
        assert_eq!(extract_video_id("/t/ZTRabc/"), None);
    }

    #[test]
    fn test_host_matches() {
        assert!(host_matches("tiktok.com", "tiktok.com"));
        assert!(host_matches("vm.tiktok.com", "tiktok.com"));
        assert!(host_matches("WWW.TikTok.com.", "tiktok.com"));
        assert!(!host_matches("nottiktok.com", "tiktok.com"));
        assert!(!host_matches("tiktok.com.evil.io", "tiktok.com"));
    }

    #[test]
    fn test_media_filename() {
        assert_eq!(media_filename(Some("123"), "video/mp4"), "tiktok_123.mp4");
        assert_eq!(
            media_filename(Some("9"), "video/webm; charset=binary"),
            "tiktok_9.webm"
        );
        assert_eq!(media_filename(None, "application/octet-stream"), "tiktok_video.mp4");
        assert_eq!(media_filename(Some(""), "audio/mpeg"), "tiktok_video.mp3");
    }

    #[test]
    fn test_sanitize_filename() {
        // 测试非法字符与空白
        assert_eq!(sanitize_filename("a\\b/c:d e.mp4"), "a_b_c_d_e.mp4");
        // 测试非 ASCII 字符被剔除
        assert_eq!(sanitize_filename("视频_1.mp4"), "_1.mp4");
        // 测试空输入
        assert_eq!(sanitize_filename("  "), "tiktok_video.mp4");
        assert!(sanitize_filename(&"x".repeat(500)).len() <= constants::MAX_FILENAME_BYTES);
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdefghijklmnop", 10), "abcdefg...");
    }
}
