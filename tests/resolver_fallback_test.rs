// tests/resolver_fallback_test.rs

mod common;

use mockito::Matcher;
use tt_dl::{
    downloader::WatermarkFreeResolver,
    error::AppError,
    models::{AttemptStatus, NormalizedLink},
};
use url::Url;

fn link() -> NormalizedLink {
    let url = Url::parse("https://www.tiktok.com/@someone/video/7234567890123456789").unwrap();
    NormalizedLink {
        original: url.to_string(),
        url,
        video_id: Some("7234567890123456789".to_string()),
    }
}

#[tokio::test]
async fn test_resolver_falls_through_to_first_working_service() {
    let mut server = mockito::Server::new_async().await;
    let server_url = server.url();

    let broken = server
        .mock("GET", Matcher::Regex("^/broken".to_string()))
        .with_status(500)
        .create_async()
        .await;
    let empty = server
        .mock("GET", Matcher::Regex("^/empty".to_string()))
        .with_status(200)
        .with_body("<html>nothing here</html>")
        .create_async()
        .await;
    let good = server
        .mock("GET", Matcher::Regex("^/good".to_string()))
        .with_status(200)
        .with_body(r#"{"data":{"play":"https://cdn.example.com/good.mp4"}}"#)
        .create_async()
        .await;
    // 排在成功服务之后的服务不应被调用
    let never = server
        .mock("GET", Matcher::Regex("^/never".to_string()))
        .expect(0)
        .create_async()
        .await;

    let mut config = common::config_with(vec![
        common::json_service("broken", &server_url, "/broken"),
        common::json_service("empty", &server_url, "/empty"),
        common::json_service("good", &server_url, "/good"),
        common::json_service("never", &server_url, "/never"),
    ]);
    let mut disabled = common::json_service("disabled", &server_url, "/never");
    disabled.enabled = false;
    config.services.insert(0, disabled);

    let client = common::client_for(&config);
    let resolver = WatermarkFreeResolver::from_config(&config).unwrap();
    let names: Vec<_> = resolver.services().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["broken", "empty", "good", "never"]);

    let media = resolver.resolve(&link(), &client).await.unwrap();
    assert_eq!(media.service, "good");
    assert_eq!(media.media_url.as_str(), "https://cdn.example.com/good.mp4");
    assert_eq!(media.video_id.as_deref(), Some("7234567890123456789"));

    broken.assert_async().await;
    empty.assert_async().await;
    good.assert_async().await;
    never.assert_async().await;
}

#[tokio::test]
async fn test_resolver_reports_every_attempt_when_all_fail() {
    let mut server = mockito::Server::new_async().await;
    let server_url = server.url();

    let _broken = server
        .mock("GET", Matcher::Regex("^/broken".to_string()))
        .with_status(502)
        .create_async()
        .await;
    let _limited = server
        .mock("GET", Matcher::Regex("^/limited".to_string()))
        .with_status(429)
        .create_async()
        .await;
    let _empty = server
        .mock("GET", Matcher::Regex("^/empty".to_string()))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let config = common::config_with(vec![
        common::json_service("broken", &server_url, "/broken"),
        common::json_service("limited", &server_url, "/limited"),
        common::json_service("empty", &server_url, "/empty"),
    ]);
    let client = common::client_for(&config);
    let resolver = WatermarkFreeResolver::from_config(&config).unwrap();

    let err = resolver.resolve(&link(), &client).await.unwrap_err();
    let AppError::AllServicesFailed(attempts) = err else {
        panic!("expected AllServicesFailed, got {:?}", err);
    };
    let summary: Vec<_> = attempts
        .iter()
        .map(|a| (a.service.as_str(), a.status))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("broken", AttemptStatus::HttpError),
            ("limited", AttemptStatus::RateLimited),
            ("empty", AttemptStatus::NoMatch),
        ]
    );
}

#[test]
fn test_resolver_rejects_duplicate_service_names() {
    let config = common::config_with(vec![
        common::json_service("same", "http://127.0.0.1:1", "/a"),
        common::json_service("same", "http://127.0.0.1:1", "/b"),
    ]);
    assert!(matches!(
        WatermarkFreeResolver::from_config(&config),
        Err(AppError::Config(msg)) if msg.contains("same")
    ));
}

#[test]
fn test_resolver_requires_at_least_one_enabled_service() {
    let mut service = common::json_service("only", "http://127.0.0.1:1", "/x");
    service.enabled = false;
    let config = common::config_with(vec![service]);
    assert!(matches!(
        WatermarkFreeResolver::from_config(&config),
        Err(AppError::Config(_))
    ));
}
