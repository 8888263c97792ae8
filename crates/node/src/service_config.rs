use std::path::PathBuf;

use common::prelude::NodeSettings;

#[derive(Debug, Clone)]
pub struct Config {
    // node configuration
    /// name, access policy and pagination mode the node runs with
    pub node: NodeSettings,

    // http server configuration
    /// Port for the API HTTP server
    pub api_port: u16,

    // data store configuration
    /// a path to a sqlite database, if not set then an
    ///  in-memory database will be used
    pub sqlite_path: Option<PathBuf>,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}
