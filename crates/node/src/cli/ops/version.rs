use clap::Args;

use common::prelude::build_info;

#[derive(Args, Debug, Clone)]
pub struct Version;

#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    #[error("Version operation failed: {0}")]
    Failed(String),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Version {
    type Error = VersionError;
    type Output = String;

    async fn execute(&self, _ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        Ok(build_info().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use url::Url;

    use crate::cli::op::{Op, OpContext};

    #[tokio::test]
    async fn test_version_reports_build_info() {
        let remote = Url::parse("http://localhost:5084").unwrap();
        let ctx = OpContext::new(remote, None).unwrap();

        let output = Version.execute(&ctx).await.unwrap();
        assert_eq!(output, build_info().to_string());
        assert!(output.starts_with("evade "));
    }
}
