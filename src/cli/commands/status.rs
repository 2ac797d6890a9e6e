use anyhow::Result;
use serde::Serialize;

use super::CliContext;
use crate::cli::output::table::TableFormatter;
use crate::cli::output::{output, CommandOutput};

#[derive(Debug, Serialize)]
pub struct MeetingCount {
    pub meeting_id: String,
    pub records: usize,
}

#[derive(Debug, Serialize)]
pub struct StatusOutput {
    pub vector_count: usize,
    pub configured: bool,
    pub base_url: String,
    pub dimension: usize,
    pub snapshot: String,
    pub meetings: Vec<MeetingCount>,
}

impl CommandOutput for StatusOutput {
    fn to_human(&self) -> String {
        let provider = if self.configured {
            format!("configured ({})", self.base_url)
        } else {
            "not configured, using local fallbacks".to_string()
        };
        let mut lines = vec![
            format!("Vectors:   {} ({} dimensions)", self.vector_count, self.dimension),
            format!("Provider:  {provider}"),
            format!("Snapshot:  {}", self.snapshot),
        ];
        if !self.meetings.is_empty() {
            let stats: Vec<(String, usize)> = self
                .meetings
                .iter()
                .map(|m| (m.meeting_id.clone(), m.records))
                .collect();
            lines.push(String::new());
            lines.push(TableFormatter::new().format_meeting_stats(&stats));
        }
        lines.join("\n")
    }
}

pub async fn execute(ctx: &CliContext) -> Result<()> {
    let service = ctx.open_service().await?;

    let out = StatusOutput {
        vector_count: service.vector_count().await,
        configured: service.is_configured(),
        base_url: ctx.config.provider.base_url.clone(),
        dimension: ctx.config.store.dimension,
        snapshot: ctx.snapshot.display().to_string(),
        meetings: service
            .meeting_stats()
            .await
            .into_iter()
            .map(|(meeting_id, records)| MeetingCount { meeting_id, records })
            .collect(),
    };
    output(&out, ctx.json);
    Ok(())
}
