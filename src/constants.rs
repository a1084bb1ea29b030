// src/constants.rs

pub const UI_WIDTH: usize = 88;
pub const LOG_TRUNCATE_LENGTH: usize = 120;
pub const MAX_FILENAME_BYTES: usize = 200;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_FILENAME_STEM: &str = "tiktok_video";
pub const DEFAULT_MEDIA_EXTENSION: &str = "mp4";
pub const DEFAULT_MEDIA_CONTENT_TYPE: &str = "video/mp4";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

pub mod env {
    pub const BIND: &str = "TT_DL_BIND";
    pub const PORT: &str = "TT_DL_PORT";
}

pub mod link {
    pub const DEFAULT_ALLOWED_HOSTS: &[&str] = &["tiktok.com"];
}

pub mod services {
    pub const TIKWM: &str = "tikwm";
    pub const COBALT: &str = "cobalt";
    pub const TIKMATE: &str = "tikmate";
    pub const SSSTIK: &str = "ssstik";

    pub const COBALT_QUALITY: &str = "720";
}

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>TikTok 无水印下载</title>
  <style>
    body { font-family: system-ui, sans-serif; max-width: 36rem; margin: 4rem auto; padding: 0 1rem; }
    form { display: flex; gap: .5rem; }
    input[type=text] { flex: 1; padding: .6rem; }
    button { padding: .6rem 1.2rem; }
  </style>
</head>
<body>
  <h1>TikTok 无水印下载</h1>
  <form method="post" action="/api/download">
    <input type="text" name="url" placeholder="https://vm.tiktok.com/..." required>
    <button type="submit">下载</button>
  </form>
</body>
</html>
"#;
