// tests/normalizer_test.rs

mod common;

use tt_dl::normalizer::LinkNormalizer;

#[tokio::test]
async fn test_short_link_is_followed_to_canonical_video_page() {
    let mut server = mockito::Server::new_async().await;
    let server_url = server.url();

    let short = server
        .mock("GET", "/ZMabc123/")
        .with_status(301)
        .with_header(
            "location",
            &format!("{}/@someone/video/7234567890123456789?_r=1&u_code=abc", server_url),
        )
        .create_async()
        .await;
    let page = server
        .mock("GET", mockito::Matcher::Regex("^/@someone/video/".to_string()))
        .with_status(200)
        .with_body("<html></html>")
        .create_async()
        .await;

    let config = common::config_with(Vec::new());
    let client = common::client_for(&config);
    let link = LinkNormalizer::new(&client)
        .normalize(&format!("看看这个视频 {}/ZMabc123/ 复制此链接", server_url))
        .await
        .unwrap();

    short.assert_async().await;
    page.assert_async().await;
    assert_eq!(
        link.url.as_str(),
        format!("{}/@someone/video/7234567890123456789", server_url)
    );
    assert_eq!(link.video_id.as_deref(), Some("7234567890123456789"));
}

#[tokio::test]
async fn test_redirect_to_foreign_host_keeps_original_link() {
    let mut server = mockito::Server::new_async().await;
    let server_url = server.url();
    let port = server_url.rsplit(':').next().unwrap().to_string();

    let _short = server
        .mock("GET", "/t/xyz")
        .with_status(302)
        .with_header("location", &format!("http://localhost:{}/landing", port))
        .create_async()
        .await;
    let _landing = server
        .mock("GET", "/landing")
        .with_status(200)
        .create_async()
        .await;

    let config = common::config_with(Vec::new());
    let client = common::client_for(&config);
    let link = LinkNormalizer::new(&client)
        .normalize(&format!("{}/t/xyz", server_url))
        .await
        .unwrap();

    assert_eq!(link.url.as_str(), format!("{}/t/xyz", server_url));
    assert_eq!(link.video_id, None);
}

#[tokio::test]
async fn test_unreachable_short_link_is_kept_as_is() {
    let config = common::config_with(Vec::new());
    let client = common::client_for(&config);
    // 端口 1 上没有服务，重定向解析失败
    let link = LinkNormalizer::new(&client)
        .normalize("http://127.0.0.1:1/t/abc")
        .await
        .unwrap();
    assert_eq!(link.url.as_str(), "http://127.0.0.1:1/t/abc");
    assert_eq!(link.video_id, None);
}
