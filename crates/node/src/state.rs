use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use common::prelude::{AccessPolicy, MetadataVisibility, NodeSettings, PaginationMode};

pub const APP_NAME: &str = "evade";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DB_FILE_NAME: &str = "db.sqlite";
pub const DEFAULT_API_PORT: u16 = 5084;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Name the node reports about itself
    #[serde(default = "default_node_name")]
    pub node_name: String,
    /// Port for the API HTTP server
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Directory for log files (logs to stdout only if not set)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    /// Who may read pool metadata without a key
    #[serde(default)]
    pub metadata_visibility: MetadataVisibility,
    /// Whether a pool's master key also grants reading its messages
    #[serde(default)]
    pub master_reads_messages: bool,
    /// Pagination shape of both list operations
    #[serde(default)]
    pub pagination: PaginationMode,
}

fn default_node_name() -> String {
    NodeSettings::default().name
}

fn default_api_port() -> u16 {
    DEFAULT_API_PORT
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_name: default_node_name(),
            api_port: default_api_port(),
            log_dir: None,
            metadata_visibility: MetadataVisibility::default(),
            master_reads_messages: false,
            pagination: PaginationMode::default(),
        }
    }
}

impl AppConfig {
    pub fn node_settings(&self) -> NodeSettings {
        NodeSettings {
            name: self.node_name.clone(),
            access: AccessPolicy {
                metadata: self.metadata_visibility,
                master_reads_messages: self.master_reads_messages,
            },
            pagination: self.pagination,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the evade directory (~/.evade)
    pub evade_dir: PathBuf,
    /// Path to the SQLite database
    pub db_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the evade directory path (custom or default ~/.evade)
    pub fn evade_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new evade state directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let evade_dir = Self::evade_dir(custom_path)?;

        if evade_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&evade_dir)?;

        let config = config.unwrap_or_default();
        let config_path = evade_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        // Create empty database (the daemon runs migrations on start)
        let db_path = evade_dir.join(DB_FILE_NAME);
        fs::write(&db_path, "")?;

        Ok(Self {
            evade_dir,
            db_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the evade directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let evade_dir = Self::evade_dir(custom_path)?;

        if !evade_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let db_path = evade_dir.join(DB_FILE_NAME);
        let config_path = evade_dir.join(CONFIG_FILE_NAME);

        if !db_path.exists() {
            return Err(StateError::MissingFile(DB_FILE_NAME.to_string()));
        }
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            evade_dir,
            db_path,
            config_path,
            config,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("evade directory not initialized. Run 'evade init' first")]
    NotInitialized,

    #[error("evade directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("evade");

        let config = AppConfig {
            node_name: "relay".into(),
            metadata_visibility: MetadataVisibility::KeyPresence,
            ..Default::default()
        };
        let created = AppState::init(Some(path.clone()), Some(config.clone())).unwrap();
        assert!(created.db_path.exists());

        let loaded = AppState::load(Some(path.clone())).unwrap();
        assert_eq!(loaded.config, config);
        assert_eq!(loaded.config.node_settings().name, "relay");

        assert!(matches!(
            AppState::init(Some(path), None),
            Err(StateError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_load_uninitialized() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            AppState::load(Some(dir.path().join("missing"))),
            Err(StateError::NotInitialized)
        ));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = toml::from_str("api_port = 7000\npagination = \"limit_offset\"\n").unwrap();
        assert_eq!(config.api_port, 7000);
        assert_eq!(config.pagination, PaginationMode::LimitOffset);
        assert_eq!(config.node_name, "evade-node");
        assert!(!config.master_reads_messages);
    }
}
