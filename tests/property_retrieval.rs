//! Property tests over the full offline pipeline.

mod common;

use std::collections::HashSet;

use meeting_rag::{Config, RagService, Segment};
use proptest::prelude::*;

use common::threshold;

fn utterance_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z黑马项目模型预算会议上线 ]{10,60}").expect("Valid regex")
}

fn segments_strategy() -> impl Strategy<Value = Vec<Segment>> {
    prop::collection::vec(utterance_strategy(), 1..15).prop_map(|texts| {
        texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| Segment::new(i, i as f64 * 7.5, "A", text))
            .collect()
    })
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Retrieval is non-increasing, unique per segment and above threshold
    #[test]
    fn proptest_retrieval_ordering(
        segments in segments_strategy(),
        question in utterance_strategy(),
        min_similarity in 0.0f32..0.9,
        boost in any::<bool>(),
    ) {
        let rt = runtime();
        let evidence = rt.block_on(async {
            let service = RagService::offline(&Config::default());
            service.add_segments("m1", &segments).await;
            service.add_segments("m2", &segments).await;
            service.update_config(&threshold(min_similarity)).await.unwrap();
            service.retrieve(&question, boost.then_some("m1")).await
        });

        prop_assert!(evidence.len() <= Config::default().rag.retrieval_limit);
        for pair in evidence.windows(2) {
            prop_assert!(pair[0].similarity >= pair[1].similarity);
        }
        let mut seen = HashSet::new();
        for item in &evidence {
            prop_assert!(seen.insert(item.record.segment_id.clone()));
            prop_assert!(item.similarity >= min_similarity - 1e-6);
        }
    }

    /// Segments whose text trims to at least ten characters are all indexed
    #[test]
    fn proptest_count_covers_valid_segments(segments in segments_strategy()) {
        let valid = segments
            .iter()
            .filter(|s| s.text.trim().chars().count() >= 10)
            .count();

        let rt = runtime();
        let count = rt.block_on(async {
            let service = RagService::offline(&Config::default());
            service.add_segments("m1", &segments).await;
            service.vector_count().await
        });

        prop_assert!(count >= valid);
    }
}
