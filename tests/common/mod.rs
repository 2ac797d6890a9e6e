//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

#![allow(dead_code)]

use meeting_rag::{Config, RagConfigUpdate, RagService, Segment};
use tempfile::TempDir;

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Segments of the "m1" meeting used by the retrieval scenarios
pub fn meeting_one() -> Vec<Segment> {
    vec![
        Segment::new(0, 12.0, "张三", "黑马项目讨论了1.5B模型"),
        Segment::new(1, 47.5, "李四", "我们下周去公司团建吃火锅"),
        Segment::new(2, 95.0, "张三", "黑马项目的上线时间定在下周五"),
    ]
}

/// Segments of the "m2" meeting used by the retrieval scenarios
pub fn meeting_two() -> Vec<Segment> {
    vec![
        Segment::new(0, 5.0, "王五", "黑马项目讨论了7B模型"),
        Segment::new(1, 30.0, "赵六", "Quarterly budget review for the platform team"),
    ]
}

/// Set only the similarity threshold
pub fn threshold(similarity_threshold: f32) -> RagConfigUpdate {
    RagConfigUpdate {
        similarity_threshold: Some(similarity_threshold),
        ..Default::default()
    }
}

/// Offline service with both scenario meetings indexed and the given threshold
pub async fn indexed_offline_service(similarity_threshold: f32) -> RagService {
    let service = RagService::offline(&Config::default());
    service.add_segments("m1", &meeting_one()).await;
    service.add_segments("m2", &meeting_two()).await;
    service
        .update_config(&threshold(similarity_threshold))
        .await
        .expect("valid threshold");
    service
}
