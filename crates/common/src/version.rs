use serde::{Deserialize, Serialize};

/// Compile-time facts about the running binary, collected by `build.rs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    pub build_profile: String,
    pub build_features: Vec<String>,
    pub build_timestamp: String,
    pub rust_version: String,
    pub version: String,
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "evade {} ({} build, {}, built {})",
            self.version, self.build_profile, self.rust_version, self.build_timestamp
        )
    }
}

pub fn build_info() -> BuildInfo {
    let build_features = env!("BUILD_FEATURES")
        .split(',')
        .filter(|f| !f.is_empty())
        .map(String::from)
        .collect();

    BuildInfo {
        build_profile: env!("BUILD_PROFILE").to_string(),
        build_features,
        build_timestamp: env!("BUILD_TIMESTAMP").to_string(),
        rust_version: env!("RUST_VERSION").to_string(),
        version: env!("REPO_VERSION").to_string(),
    }
}

/// Short version string reported by the node itself
pub fn node_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
