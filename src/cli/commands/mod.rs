//! CLI command implementations.

pub mod ask;
pub mod clear;
pub mod index;
pub mod status;

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::cli::snapshot::{load_snapshot, save_snapshot, Snapshot};
use crate::domain::models::Config;
use crate::services::RagService;

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct CliContext {
    pub config: Config,
    pub snapshot: PathBuf,
    pub json: bool,
}

impl CliContext {
    /// Build the service and load the snapshot into it.
    pub async fn open_service(&self) -> Result<RagService> {
        let service = RagService::from_config(&self.config).context("Failed to create providers")?;
        let snapshot = load_snapshot(&self.snapshot, self.config.store.dimension)?;
        service
            .import(snapshot.records)
            .await
            .context("Snapshot records do not match the configured dimension")?;
        Ok(service)
    }

    /// Persist the service's records to the snapshot file.
    pub async fn save(&self, service: &RagService) -> Result<()> {
        let snapshot = Snapshot::new(self.config.store.dimension, service.export().await);
        save_snapshot(&self.snapshot, &snapshot)
    }
}
