use url::Url;

use common::prelude::{KeyVerifier, Node, NodeSettings};

use crate::database::{Database, DatabaseSetupError};
use crate::ServiceConfig;

/// Everything a request handler needs, cheap to clone
#[derive(Debug, Clone)]
pub struct State {
    node: Node<Database>,
    database: Database,
}

impl State {
    pub async fn from_config(config: &ServiceConfig) -> Result<Self, StateSetupError> {
        let sqlite_database_url = match &config.sqlite_path {
            Some(path) => {
                // check that the path exists
                if !path.exists() {
                    return Err(StateSetupError::DatabasePathDoesNotExist);
                }
                Url::parse(&format!("sqlite://{}", path.display()))
                    .map_err(|_| StateSetupError::InvalidDatabaseUrl)?
            }
            None => {
                Url::parse("sqlite::memory:").map_err(|_| StateSetupError::InvalidDatabaseUrl)?
            }
        };
        tracing::info!(url = %sqlite_database_url, "connecting to database");
        let database = Database::connect(&sqlite_database_url).await?;

        Ok(Self::new(config.node.clone(), database, KeyVerifier::new()))
    }

    pub fn new(settings: NodeSettings, database: Database, verifier: KeyVerifier) -> Self {
        let node = Node::with_verifier(settings, database.clone(), verifier);
        Self { node, database }
    }

    pub fn node(&self) -> &Node<Database> {
        &self.node
    }

    pub fn database(&self) -> &Database {
        &self.database
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("failed to setup the database: {0}")]
    DatabaseSetupError(#[from] DatabaseSetupError),
    #[error("database path does not exist")]
    DatabasePathDoesNotExist,
    #[error("invalid database url")]
    InvalidDatabaseUrl,
}
