//! Pipeline behavior against an OpenAI-compatible server mocked with mockito.

mod common;

use std::time::{Duration, Instant};

use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

use meeting_rag::{AnswerMode, Config, FallbackEmbedder, RagService, Segment};

use common::{meeting_one, setup_test_logging, threshold};

const DIMENSION: usize = 8;

fn config_for(server: &ServerGuard, api_key: Option<&str>) -> Config {
    let mut config = Config::default();
    config.provider.base_url = server.url();
    config.provider.api_key = api_key.map(String::from);
    config.provider.timeout_secs = 5;
    config.provider.embed_delay_ms = 0;
    config.store.dimension = DIMENSION;
    config
}

fn unit_vector() -> Vec<f32> {
    let mut v = vec![0.0; DIMENSION];
    v[0] = 1.0;
    v
}

fn embedding_body(vector: &[f32]) -> String {
    json!({ "data": [{ "embedding": vector, "index": 0 }] }).to_string()
}

fn chat_body(content: &str) -> String {
    json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] }).to_string()
}

#[tokio::test]
async fn test_remote_embeddings_and_generation() {
    setup_test_logging();
    let mut server = Server::new_async().await;
    let embeddings = server
        .mock("POST", "/embeddings")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(json!({ "dimensions": DIMENSION })))
        .with_status(200)
        .with_body(embedding_body(&unit_vector()))
        .expect(4)
        .create_async()
        .await;
    let chat = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex("黑马项目讨论了1。5B模型".to_string()))
        .with_status(200)
        .with_body(chat_body("黑马项目讨论了 1.5B 模型 [00:12]。"))
        .expect(1)
        .create_async()
        .await;

    let service = RagService::from_config(&config_for(&server, Some("sk-test"))).unwrap();
    assert!(service.is_configured());

    let report = service.add_segments("m1", &meeting_one()).await;
    assert_eq!(report.chunks_indexed, 3);

    let result = service.query("黑马项目讨论了什么？", Some("m1")).await;
    assert_eq!(result.mode, AnswerMode::Generated);
    assert_eq!(result.answer, "黑马项目讨论了 1.5B 模型 [00:12]。");
    assert_eq!(result.sources.len(), 3);
    assert!((result.confidence - 1.0).abs() < f32::EPSILON);

    embeddings.assert_async().await;
    chat.assert_async().await;
}

#[tokio::test]
async fn test_failing_embeddings_fall_back_locally() {
    let mut server = Server::new_async().await;
    let embeddings = server
        .mock("POST", "/embeddings")
        .with_status(500)
        .with_body("internal error")
        .expect_at_least(1)
        .create_async()
        .await;

    let service = RagService::from_config(&config_for(&server, Some("sk-test"))).unwrap();
    let report = service.add_segments("m1", &meeting_one()).await;

    assert_eq!(report.chunks_indexed, 3);
    assert_eq!(report.chunks_failed, 0);

    let fallback = FallbackEmbedder::new(DIMENSION);
    let records = service.records_for_meeting("m1").await;
    assert_eq!(records[0].vector, fallback.embed("黑马项目讨论了15B模型"));

    embeddings.assert_async().await;
}

#[tokio::test]
async fn test_wrong_dimension_from_provider_falls_back() {
    let mut server = Server::new_async().await;
    let _embeddings = server
        .mock("POST", "/embeddings")
        .with_status(200)
        .with_body(embedding_body(&[1.0, 0.0]))
        .create_async()
        .await;

    let service = RagService::from_config(&config_for(&server, Some("sk-test"))).unwrap();
    let report = service.add_segments("m1", &meeting_one()).await;

    assert_eq!(report.chunks_indexed, 3);
    assert!(service
        .export()
        .await
        .iter()
        .all(|r| r.vector.len() == DIMENSION));
}

#[tokio::test]
async fn test_failing_generation_uses_extractive_answer() {
    let mut server = Server::new_async().await;
    let _embeddings = server
        .mock("POST", "/embeddings")
        .with_status(200)
        .with_body(embedding_body(&unit_vector()))
        .create_async()
        .await;
    let chat = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error": "Incorrect API key provided: sk-test"}"#)
        .expect(1)
        .create_async()
        .await;

    let service = RagService::from_config(&config_for(&server, Some("sk-test"))).unwrap();
    service.add_segments("m1", &meeting_one()).await;

    let result = service.query("黑马项目", None).await;
    assert_eq!(result.mode, AnswerMode::Extractive);
    assert!(result.answer.contains("1. [00:12] 张三: 黑马项目讨论了1。5B模型"));
    assert!(result.confidence > 0.0);

    chat.assert_async().await;
}

#[tokio::test]
async fn test_unconfigured_service_never_calls_provider() {
    let mut server = Server::new_async().await;
    let embeddings = server
        .mock("POST", "/embeddings")
        .expect(0)
        .create_async()
        .await;
    let chat = server
        .mock("POST", "/chat/completions")
        .expect(0)
        .create_async()
        .await;

    let service = RagService::from_config(&config_for(&server, None)).unwrap();
    service.set_credential("");
    assert!(!service.is_configured());

    service.add_segments("m1", &meeting_one()).await;
    service.update_config(&threshold(0.0)).await.unwrap();
    let result = service.query("黑马项目", Some("m1")).await;
    assert_eq!(result.mode, AnswerMode::Extractive);

    embeddings.assert_async().await;
    chat.assert_async().await;
}

#[tokio::test]
async fn test_set_credential_switches_to_remote() {
    let mut server = Server::new_async().await;
    let embeddings = server
        .mock("POST", "/embeddings")
        .match_header("authorization", "Bearer sk-live")
        .with_status(200)
        .with_body(embedding_body(&unit_vector()))
        .expect(1)
        .create_async()
        .await;

    let service = RagService::from_config(&config_for(&server, None)).unwrap();
    service.set_credential("");
    service
        .add_segments("m1", &[Segment::new(0, 1.0, "A", "offline indexed utterance")])
        .await;

    service.set_credential("sk-live");
    assert!(service.is_configured());
    service
        .add_segments("m1", &[Segment::new(1, 2.0, "A", "remote indexed utterance")])
        .await;

    let records = service.records_for_meeting("m1").await;
    assert_ne!(records[0].vector, unit_vector());
    assert_eq!(records[1].vector, unit_vector());

    embeddings.assert_async().await;
}

#[tokio::test]
async fn test_delay_between_remote_embedding_calls() {
    let mut server = Server::new_async().await;
    let _embeddings = server
        .mock("POST", "/embeddings")
        .with_status(200)
        .with_body(embedding_body(&unit_vector()))
        .create_async()
        .await;

    let mut config = config_for(&server, Some("sk-test"));
    config.provider.embed_delay_ms = 60;
    let service = RagService::from_config(&config).unwrap();

    let start = Instant::now();
    service.add_segments("m1", &meeting_one()).await;

    // Three calls, two pauses
    assert!(start.elapsed() >= Duration::from_millis(120));
}
