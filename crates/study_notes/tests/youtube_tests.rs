use serde_json::json;
use study_notes::{
    yt::{transcript::YouTubeTranscripts, TranscriptProvider, VideoId},
    TranscriptError,
};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn watch_page(server: &MockServer) -> String {
    include_str!("fixtures/watch.html").replace("{{BASE_URL}}", &server.uri())
}

fn timed_text() -> serde_json::Value {
    json!({
        "wireMagic": "pb3",
        "events": [
            {"tStartMs": 0, "dDurationMs": 1500, "id": 1, "wpWinPosId": 1},
            {"tStartMs": 1500, "dDurationMs": 2000, "segs": [{"utf8": "intro"}]},
            {"tStartMs": 3500, "dDurationMs": 2000, "segs": [{"utf8": "to"}, {"utf8": " graphs"}]},
            {"tStartMs": 5500, "segs": [{"utf8": "\n"}]}
        ]
    })
}

async fn mount_watch_page(server: &MockServer, body: String) {
    Mock::given(method("GET"))
        .and(path("/watch"))
        .and(query_param("v", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

fn provider(server: &MockServer) -> YouTubeTranscripts {
    YouTubeTranscripts::new(reqwest::Client::new()).with_base_url(server.uri())
}

fn video_id() -> VideoId {
    VideoId::extract("https://www.youtube.com/watch?v=abc123").unwrap()
}

#[tokio::test]
async fn test_fetches_manual_track_in_preferred_language() {
    let server = MockServer::start().await;
    mount_watch_page(&server, watch_page(&server)).await;

    Mock::given(method("GET"))
        .and(path("/api/timedtext"))
        .and(query_param("lang", "en"))
        .and(query_param("fmt", "json3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(timed_text()))
        .expect(1)
        .mount(&server)
        .await;

    let fragments = provider(&server)
        .fetch_transcript(&video_id())
        .await
        .expect("Failed to fetch transcript");

    let texts: Vec<&str> = fragments.iter().map(|f| f.text.as_str()).collect();
    assert_eq!(texts, vec!["intro", "to graphs"]);
    assert_eq!(fragments[0].start, 1.5);
    assert_eq!(fragments[1].duration, 2.0);
}

#[tokio::test]
async fn test_honours_configured_language() {
    let server = MockServer::start().await;
    mount_watch_page(&server, watch_page(&server)).await;

    Mock::given(method("GET"))
        .and(path("/api/timedtext"))
        .and(query_param("lang", "de"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "events": [{"tStartMs": 0, "dDurationMs": 900, "segs": [{"utf8": "Einleitung"}]}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fragments = provider(&server)
        .with_language("de")
        .fetch_transcript(&video_id())
        .await
        .unwrap();

    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].text, "Einleitung");
}

#[tokio::test]
async fn test_unplayable_video_is_unavailable() {
    let server = MockServer::start().await;
    let page = r#"<script>var ytInitialPlayerResponse = {"playabilityStatus":{"status":"LOGIN_REQUIRED","reason":"Sign in to confirm your age"}};</script>"#;
    mount_watch_page(&server, page.to_string()).await;

    let err = provider(&server)
        .fetch_transcript(&video_id())
        .await
        .unwrap_err();

    match err {
        TranscriptError::Unavailable(reason) => assert_eq!(reason, "Sign in to confirm your age"),
        other => panic!("Expected Unavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_page_without_player_response_fails_to_parse() {
    let server = MockServer::start().await;
    mount_watch_page(&server, "<html><body>consent wall</body></html>".into()).await;

    let err = provider(&server)
        .fetch_transcript(&video_id())
        .await
        .unwrap_err();

    assert!(matches!(err, TranscriptError::Parse(_)));
}

#[tokio::test]
async fn test_empty_timed_text_means_no_captions() {
    let server = MockServer::start().await;
    mount_watch_page(&server, watch_page(&server)).await;

    Mock::given(method("GET"))
        .and(path("/api/timedtext"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"events": []})))
        .mount(&server)
        .await;

    let err = provider(&server)
        .fetch_transcript(&video_id())
        .await
        .unwrap_err();

    assert!(matches!(err, TranscriptError::NoCaptions(id) if id == "abc123"));
}

#[tokio::test]
async fn test_watch_page_http_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/watch"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = provider(&server)
        .fetch_transcript(&video_id())
        .await
        .unwrap_err();

    assert!(matches!(err, TranscriptError::Request(_)));
}
