// tests/cobalt_extractor_test.rs

mod common;

use mockito::Matcher;
use serde_json::json;
use tt_dl::{
    error::AppError,
    extractor::{MediaExtractor, cobalt::CobaltExtractor},
};
use url::Url;

const VIDEO: &str = "https://www.tiktok.com/@someone/video/7234567890123456789";

#[tokio::test]
async fn test_cobalt_redirect_and_picker_responses() {
    let mut server = mockito::Server::new_async().await;
    let server_url = server.url();

    let redirect = server
        .mock("POST", "/redirect")
        .match_header("accept", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "url": VIDEO,
            "vQuality": "720",
            "isNoWatermark": true,
        })))
        .with_status(200)
        .with_body(r#"{"status":"redirect","url":"https://cdn.example.com/no_wm.mp4"}"#)
        .create_async()
        .await;
    let picker = server
        .mock("POST", "/picker")
        .with_status(200)
        .with_body(r#"{"status":"picker","picker":[{"type":"photo"},{"url":"https://cdn.example.com/1.jpg"}]}"#)
        .create_async()
        .await;

    let redirect_service = common::cobalt_service("cobalt", &server_url, "/redirect");
    let picker_service = common::cobalt_service("cobalt-picker", &server_url, "/picker");
    let config = common::config_with(vec![redirect_service.clone(), picker_service.clone()]);
    let client = common::client_for(&config);
    let video = Url::parse(VIDEO).unwrap();

    let media = CobaltExtractor::new(redirect_service)
        .extract_media_url(&video, &client)
        .await
        .unwrap();
    assert_eq!(media.as_str(), "https://cdn.example.com/no_wm.mp4");

    let media = CobaltExtractor::new(picker_service)
        .extract_media_url(&video, &client)
        .await
        .unwrap();
    assert_eq!(media.as_str(), "https://cdn.example.com/1.jpg");

    redirect.assert_async().await;
    picker.assert_async().await;
}

#[tokio::test]
async fn test_cobalt_error_and_garbage_responses() {
    let mut server = mockito::Server::new_async().await;
    let server_url = server.url();

    let _error = server
        .mock("POST", "/error")
        .with_status(400)
        .with_body(r#"{"status":"error","text":"i couldn't process your request"}"#)
        .create_async()
        .await;
    let _garbage = server
        .mock("POST", "/garbage")
        .with_status(503)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let error_service = common::cobalt_service("cobalt", &server_url, "/error");
    let garbage_service = common::cobalt_service("cobalt", &server_url, "/garbage");
    let config = common::config_with(vec![error_service.clone()]);
    let client = common::client_for(&config);
    let video = Url::parse(VIDEO).unwrap();

    let err = CobaltExtractor::new(error_service)
        .extract_media_url(&video, &client)
        .await
        .unwrap_err();
    assert!(
        matches!(err, AppError::ServiceError { ref message, .. } if message.contains("couldn't process")),
        "unexpected error: {:?}",
        err
    );

    let err = CobaltExtractor::new(garbage_service)
        .extract_media_url(&video, &client)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UpstreamStatus { status, .. } if status.as_u16() == 503));
}
