use anyhow::Result;
use serde::Serialize;
use tracing::warn;

use super::CliContext;
use crate::cli::output::{output, CommandOutput};
use crate::cli::snapshot::{load_snapshot, save_snapshot, Snapshot};

#[derive(Debug, Serialize)]
pub struct ClearOutput {
    pub removed: usize,
    pub snapshot: String,
}

impl CommandOutput for ClearOutput {
    fn to_human(&self) -> String {
        format!("Removed {} vector(s) from {}", self.removed, self.snapshot)
    }
}

/// Replace the snapshot with an empty one. An unreadable or mismatched
/// snapshot is discarded rather than reported, so `clear` always recovers.
pub fn execute(ctx: &CliContext) -> Result<()> {
    let dimension = ctx.config.store.dimension;
    let removed = match load_snapshot(&ctx.snapshot, dimension) {
        Ok(snapshot) => snapshot.records.len(),
        Err(err) => {
            warn!(error = %err, "discarding unreadable snapshot");
            0
        }
    };

    save_snapshot(&ctx.snapshot, &Snapshot::new(dimension, Vec::new()))?;

    output(
        &ClearOutput {
            removed,
            snapshot: ctx.snapshot.display().to_string(),
        },
        ctx.json,
    );
    Ok(())
}
