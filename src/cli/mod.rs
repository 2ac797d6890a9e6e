//! Command-line interface
//!
//! Thin layer over [`RagService`](crate::services::RagService): each command
//! loads the JSON snapshot, runs one operation, and writes the snapshot back
//! when the store changed.

pub mod commands;
pub mod output;
pub mod snapshot;
pub mod types;

use anyhow::Result;

pub use commands::CliContext;
pub use types::{Cli, Commands};

/// Run the parsed command.
pub async fn run(command: Commands, ctx: &CliContext) -> Result<()> {
    match command {
        Commands::Index(args) => commands::index::execute(args, ctx).await,
        Commands::Ask(args) => commands::ask::execute(args, ctx).await,
        Commands::Status => commands::status::execute(ctx).await,
        Commands::Clear => commands::clear::execute(ctx),
    }
}

/// Print an error chain and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let chain: Vec<String> = err.chain().map(ToString::to_string).collect();
        let body = serde_json::json!({ "error": err.to_string(), "causes": chain });
        eprintln!("{body}");
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
