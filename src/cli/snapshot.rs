//! JSON snapshot of the vector store, used by the CLI between runs.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::models::EmbeddingRecord;

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub dimension: usize,
    pub records: Vec<EmbeddingRecord>,
}

impl Snapshot {
    pub fn new(dimension: usize, records: Vec<EmbeddingRecord>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            dimension,
            records,
        }
    }
}

/// Load a snapshot. A missing file is an empty store.
pub fn load_snapshot(path: &Path, dimension: usize) -> Result<Snapshot> {
    if !path.exists() {
        return Ok(Snapshot::new(dimension, Vec::new()));
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;

    if snapshot.version != SNAPSHOT_VERSION {
        bail!(
            "Unsupported snapshot version {} in {} (expected {SNAPSHOT_VERSION})",
            snapshot.version,
            path.display()
        );
    }
    if snapshot.dimension != dimension {
        bail!(
            "Snapshot {} holds {}-dimensional vectors but the store is configured for {dimension}. \
             Run `meeting-rag clear` or restore the previous store.dimension",
            path.display(),
            snapshot.dimension
        );
    }

    Ok(snapshot)
}

/// Write a snapshot, creating parent directories as needed.
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let json = serde_json::to_string(snapshot).context("Failed to serialize snapshot")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(index: usize) -> EmbeddingRecord {
        EmbeddingRecord {
            vector: vec![0.6, 0.8],
            segment_id: EmbeddingRecord::segment_id_for("m1", index),
            meeting_id: "m1".to_string(),
            speaker: "A".to_string(),
            timestamp_seconds: 1.5,
            text: "hello there".to_string(),
            chunk_index: Some(1),
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let snapshot = load_snapshot(&dir.path().join("none.json"), 2).unwrap();
        assert!(snapshot.records.is_empty());
        assert_eq!(snapshot.dimension, 2);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/dir/index.json");
        let snapshot = Snapshot::new(2, vec![record(0), record(1)]);

        save_snapshot(&path, &snapshot).unwrap();
        assert_eq!(load_snapshot(&path, 2).unwrap(), snapshot);
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.json");
        save_snapshot(&path, &Snapshot::new(2, vec![record(0)])).unwrap();

        let err = load_snapshot(&path, 384).unwrap_err();
        assert!(err.to_string().contains("384"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(load_snapshot(&path, 2).is_err());
    }
}
