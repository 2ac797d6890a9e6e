use anyhow::{Context, Result};
use serde::Serialize;

use super::CliContext;
use crate::cli::output::progress::{create_spinner, ProgressBarExt};
use crate::cli::output::{output, CommandOutput};
use crate::cli::types::IndexArgs;
use crate::domain::models::{IndexingReport, Segment};

#[derive(Debug, Serialize)]
pub struct IndexOutput {
    pub meeting_id: String,
    #[serde(flatten)]
    pub report: IndexingReport,
    pub vector_count: usize,
    pub snapshot: String,
}

impl CommandOutput for IndexOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "Indexed meeting '{}': {} segment(s), {} chunk(s) stored",
            self.meeting_id, self.report.segments, self.report.chunks_indexed
        )];
        if self.report.chunks_skipped > 0 {
            lines.push(format!("  {} short chunk(s) skipped", self.report.chunks_skipped));
        }
        if self.report.chunks_failed > 0 {
            lines.push(format!("  {} chunk(s) failed", self.report.chunks_failed));
        }
        lines.push(format!("Store now holds {} vector(s) in {}", self.vector_count, self.snapshot));
        lines.join("\n")
    }
}

pub async fn execute(args: IndexArgs, ctx: &CliContext) -> Result<()> {
    let content = std::fs::read_to_string(&args.segments)
        .with_context(|| format!("Failed to read {}", args.segments.display()))?;
    let segments: Vec<Segment> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of segments", args.segments.display()))?;

    let service = ctx.open_service().await?;

    let spinner = create_spinner(
        format!("Indexing {} segment(s) for '{}'", segments.len(), args.meeting),
        ctx.json,
    );
    let report = service.add_segments(&args.meeting, &segments).await;
    spinner.finish_success(format!("{} chunk(s) indexed", report.chunks_indexed));

    ctx.save(&service).await?;

    let out = IndexOutput {
        meeting_id: args.meeting,
        report,
        vector_count: service.vector_count().await,
        snapshot: ctx.snapshot.display().to_string(),
    };
    output(&out, ctx.json);
    Ok(())
}
