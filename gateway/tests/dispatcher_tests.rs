//! Provider response dispatch against a mock upstream.

mod fixtures;

use bytes::Bytes;
use fixtures::*;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue};
use tts_pcm_gateway::core::tts::{
    ProviderReply, RawHttpResponse, ReplyErrorCause, ResponseDispatcher, TTSError,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn json_response(body: String) -> RawHttpResponse {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    RawHttpResponse::new(200, headers, body)
}

/// Mock servers listen on 127.0.0.1.
fn local_dispatcher() -> ResponseDispatcher {
    ResponseDispatcher::new(reqwest::Client::new()).with_localhost_allowed(true)
}

#[tokio::test]
async fn test_audio_pointer_is_resolved_to_inline_audio() {
    let server = MockServer::start().await;
    let wav = create_wav_file(&generate_sine_wave(240, 1, 24000, 440.0, 0.5), 1, 24000);

    Mock::given(method("GET"))
        .and(path("/y.wav"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(wav.clone())
                .insert_header("content-type", "audio/wav"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = local_dispatcher();
    let reply = dispatcher
        .dispatch(json_response(format!(
            r#"{{"audioUrl": "{}/y.wav"}}"#,
            server.uri()
        )))
        .await
        .unwrap();

    assert_eq!(
        reply,
        ProviderReply::InlineAudio {
            bytes: Bytes::from(wav),
            content_type: "audio/wav".to_string(),
        }
    );
}

#[tokio::test]
async fn test_pointer_download_failure_is_hard_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone.wav"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = local_dispatcher();
    let err = dispatcher
        .dispatch(json_response(format!(
            r#"{{"audioUrl": "{}/gone.wav"}}"#,
            server.uri()
        )))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        TTSError::UpstreamHttpError {
            status: 404,
            body: "not found".to_string()
        }
    );
}

#[tokio::test]
async fn test_empty_pointer_download_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/empty.wav"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let dispatcher = local_dispatcher();
    let err = dispatcher
        .fetch_pointer(&format!("{}/empty.wav", server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err, TTSError::EmptyUpstreamResponse);
}

#[tokio::test]
async fn test_upstream_500_is_classified_once_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tts"))
        .respond_with(ResponseTemplate::new(500).set_body_string("rate limited"))
        .expect(1)
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/tts", server.uri()))
        .send()
        .await
        .unwrap();
    let raw = RawHttpResponse::from_reqwest(response).await.unwrap();

    let reply = ResponseDispatcher::new(client).dispatch(raw).await.unwrap();
    assert_eq!(
        reply,
        ProviderReply::Error {
            status: 500,
            body: "rate limited".to_string(),
            cause: ReplyErrorCause::HttpStatus,
        }
    );
    // MockServer verifies `expect(1)` on drop
}

#[tokio::test]
async fn test_binary_audio_labelled_text_plain_is_inline() {
    let server = MockServer::start().await;
    let wav = create_wav_file(&generate_sine_wave(100, 1, 16000, 440.0, 0.5), 1, 16000);
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(wav.clone())
                .insert_header("content-type", "text/plain; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let response = client.post(server.uri()).send().await.unwrap();
    let raw = RawHttpResponse::from_reqwest(response).await.unwrap();

    match ResponseDispatcher::classify(&raw) {
        ProviderReply::InlineAudio { bytes, .. } => assert_eq!(bytes.as_ref(), wav.as_slice()),
        other => panic!("expected inline audio, got {other:?}"),
    }
}

#[tokio::test]
async fn test_loopback_pointer_is_refused_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/y.wav"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8; 16]))
        .expect(0)
        .mount(&server)
        .await;

    let err = ResponseDispatcher::new(reqwest::Client::new())
        .dispatch(json_response(format!(
            r#"{{"audioUrl": "{}/y.wav"}}"#,
            server.uri()
        )))
        .await
        .unwrap_err();

    assert!(matches!(err, TTSError::InvalidPointerUrl(_)));
}

#[tokio::test]
async fn test_link_local_pointer_is_refused_even_in_local_mode() {
    let err = local_dispatcher()
        .dispatch(json_response(
            r#"{"audioUrl": "http://169.254.169.254/latest/meta-data/"}"#.to_string(),
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, TTSError::InvalidPointerUrl(_)));
}
