use clap::Args;

use common::prelude::{MetadataVisibility, PaginationMode};
use evade_node::state::{AppConfig, AppState, StateError, DEFAULT_API_PORT};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Name the node reports about itself
    #[arg(long)]
    pub node_name: Option<String>,

    /// API server port
    #[arg(long, default_value_t = DEFAULT_API_PORT)]
    pub api_port: u16,

    /// Who may read pool metadata without a key
    #[arg(long, default_value_t = MetadataVisibility::default())]
    pub metadata_visibility: MetadataVisibility,

    /// Let a pool's master key read its messages too
    #[arg(long)]
    pub master_reads_messages: bool,

    /// Pagination shape of the list endpoints
    #[arg(long, default_value_t = PaginationMode::default())]
    pub pagination: PaginationMode,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            node_name: self.node_name.clone().unwrap_or(defaults.node_name),
            api_port: self.api_port,
            log_dir: None,
            metadata_visibility: self.metadata_visibility,
            master_reads_messages: self.master_reads_messages,
            pagination: self.pagination,
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        Ok(format!(
            "Initialized evade directory at: {}\n\
             - Database: {}\n\
             - Config: {}\n\
             - Node name: {}\n\
             - API port: {}",
            state.evade_dir.display(),
            state.db_path.display(),
            state.config_path.display(),
            state.config.node_name,
            state.config.api_port,
        ))
    }
}
