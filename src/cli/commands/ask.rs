use anyhow::{Context, Result};
use serde::Serialize;

use super::CliContext;
use crate::cli::output::table::TableFormatter;
use crate::cli::output::{output, CommandOutput};
use crate::cli::types::AskArgs;
use crate::domain::models::{RagConfigUpdate, RagResult};

#[derive(Debug, Serialize)]
pub struct AskOutput {
    pub question: String,
    #[serde(flatten)]
    pub result: RagResult,
}

impl CommandOutput for AskOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.result.answer.clone(), String::new()];
        lines.push(format!(
            "Confidence: {:.2} ({})",
            self.result.confidence, self.result.mode
        ));
        if self.result.context_truncated {
            lines.push("Note: some evidence did not fit in the context window".to_string());
        }
        if !self.result.sources.is_empty() {
            lines.push(String::new());
            lines.push(TableFormatter::new().format_sources(&self.result.sources));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: AskArgs, ctx: &CliContext) -> Result<()> {
    let service = ctx.open_service().await?;

    if args.threshold.is_some() || args.limit.is_some() {
        service
            .update_config(&RagConfigUpdate {
                similarity_threshold: args.threshold,
                retrieval_limit: args.limit,
                ..Default::default()
            })
            .await
            .context("Invalid retrieval options")?;
    }

    let result = service.query(&args.question, args.meeting.as_deref()).await;
    output(
        &AskOutput {
            question: args.question,
            result,
        },
        ctx.json,
    );
    Ok(())
}
