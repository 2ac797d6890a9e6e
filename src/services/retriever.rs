//! Retrieval policy applied to raw nearest-neighbor candidates.
//!
//! Candidates come back from the index in descending cosine order. The policy
//! runs in one pass: threshold, current-meeting boost, re-sort, dedup.

use std::collections::HashSet;

use crate::domain::models::EvidenceItem;

/// Multiplier applied to candidates from the meeting the user is looking at.
pub const BOOST_FACTOR: f32 = 1.2;

/// Drop candidates whose similarity is below `threshold`.
pub fn apply_threshold(candidates: Vec<EvidenceItem>, threshold: f32) -> Vec<EvidenceItem> {
    candidates
        .into_iter()
        .filter(|item| item.similarity >= threshold)
        .collect()
}

/// Scale similarity of records from `meeting_id` by [`BOOST_FACTOR`] and
/// restore descending order. The boosted value is a ranking key and may
/// exceed 1.0.
pub fn boost_current_meeting(
    mut evidence: Vec<EvidenceItem>,
    meeting_id: &str,
) -> Vec<EvidenceItem> {
    for item in &mut evidence {
        if item.record.meeting_id == meeting_id {
            item.similarity *= BOOST_FACTOR;
        }
    }
    evidence.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    evidence
}

/// Keep the first occurrence of each segment id. Input must already be in
/// descending order, so the kept item is the best-scoring one.
pub fn dedup_by_segment(evidence: Vec<EvidenceItem>) -> Vec<EvidenceItem> {
    let mut seen = HashSet::new();
    evidence
        .into_iter()
        .filter(|item| seen.insert(item.record.segment_id.clone()))
        .collect()
}

/// Full retrieval policy over raw index results.
pub fn rank_evidence(
    candidates: Vec<EvidenceItem>,
    threshold: f32,
    current_meeting_id: Option<&str>,
) -> Vec<EvidenceItem> {
    let mut evidence = apply_threshold(candidates, threshold);
    if let Some(meeting_id) = current_meeting_id {
        evidence = boost_current_meeting(evidence, meeting_id);
    } else {
        evidence.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    }
    dedup_by_segment(evidence)
}
