use std::path::PathBuf;

use clap::Args;

use common::prelude::{MetadataVisibility, PaginationMode};
use evade_node::state::{AppState, StateError};
use evade_node::{spawn_service, ServiceConfig};

#[derive(Args, Debug, Clone)]
pub struct Daemon {
    /// Override API server port (default from config)
    #[arg(long)]
    pub api_port: Option<u16>,

    /// Override the node name (default from config)
    #[arg(long)]
    pub node_name: Option<String>,

    /// Override metadata visibility (default from config)
    #[arg(long)]
    pub metadata_visibility: Option<MetadataVisibility>,

    /// Let a pool's master key read its messages too
    #[arg(long)]
    pub master_reads_messages: bool,

    /// Override the pagination shape (default from config)
    #[arg(long)]
    pub pagination: Option<PaginationMode>,

    /// Directory for log files (logs to stdout only if not set)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Default log level, refined by RUST_LOG
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,
}

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("state error: {0}")]
    StateError(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Daemon {
    type Error = DaemonError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;

        let mut app_config = state.config.clone();
        if let Some(name) = &self.node_name {
            app_config.node_name = name.clone();
        }
        if let Some(visibility) = self.metadata_visibility {
            app_config.metadata_visibility = visibility;
        }
        if let Some(pagination) = self.pagination {
            app_config.pagination = pagination;
        }
        app_config.master_reads_messages |= self.master_reads_messages;

        let config = ServiceConfig {
            node: app_config.node_settings(),
            api_port: self.api_port.unwrap_or(app_config.api_port),
            sqlite_path: Some(state.db_path),
            log_level: self.log_level,
            log_dir: self.log_dir.clone().or(app_config.log_dir),
        };

        spawn_service(&config).await;
        Ok("daemon ended".to_string())
    }
}
