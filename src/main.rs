//! meeting-rag CLI entry point.

use anyhow::Result;
use clap::Parser;

use meeting_rag::cli::{handle_error, run, Cli, CliContext};
use meeting_rag::infrastructure::config::ConfigLoader;
use meeting_rag::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = try_main(cli).await {
        handle_error(err, json);
    }
}

async fn try_main(cli: Cli) -> Result<()> {
    let config = match cli.config {
        Some(ref path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    let _logger = LoggerImpl::init(&LogConfig::from(&config.logging))?;

    let ctx = CliContext {
        config,
        snapshot: cli.snapshot,
        json: cli.json,
    };
    run(cli.command, &ctx).await
}
