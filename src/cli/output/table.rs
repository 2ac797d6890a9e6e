//! Table output for answer sources and store statistics using comfy-table.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use super::truncate;
use crate::domain::models::SourceRef;
use crate::services::answerer::format_timestamp;

/// Widest source text shown in a table cell
const SOURCE_TEXT_WIDTH: usize = 60;

/// Table formatter for CLI output
pub struct TableFormatter {
    use_colors: bool,
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
        }
    }

    pub const fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Ranked sources of an answer
    pub fn format_sources(&self, sources: &[SourceRef]) -> String {
        let mut table = create_base_table();
        table.set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Meeting").add_attribute(Attribute::Bold),
            Cell::new("Time").add_attribute(Attribute::Bold),
            Cell::new("Speaker").add_attribute(Attribute::Bold),
            Cell::new("Score").add_attribute(Attribute::Bold),
            Cell::new("Text").add_attribute(Attribute::Bold),
        ]);

        for (i, source) in sources.iter().enumerate() {
            let score = format!("{:.3}", source.similarity);
            let score_cell = if self.use_colors {
                Cell::new(score).fg(score_color(source.similarity))
            } else {
                Cell::new(score)
            };

            table.add_row(vec![
                Cell::new(i + 1),
                Cell::new(&source.meeting_id),
                Cell::new(format_timestamp(source.timestamp_seconds)),
                Cell::new(&source.speaker),
                score_cell,
                Cell::new(truncate(&source.text, SOURCE_TEXT_WIDTH)),
            ]);
        }

        table.to_string()
    }

    /// Per-meeting record counts
    pub fn format_meeting_stats(&self, stats: &[(String, usize)]) -> String {
        let mut table = create_base_table();
        table.set_header(vec![
            Cell::new("Meeting").add_attribute(Attribute::Bold),
            Cell::new("Records").add_attribute(Attribute::Bold),
        ]);
        for (meeting_id, count) in stats {
            table.add_row(vec![Cell::new(meeting_id), Cell::new(count)]);
        }
        table.to_string()
    }
}

fn create_base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn score_color(score: f32) -> Color {
    if score >= 0.85 {
        Color::Green
    } else if score >= 0.6 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn supports_color() -> bool {
    // Respect NO_COLOR environment variable
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    true
}
