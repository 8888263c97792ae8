pub mod daemon;
pub mod init;
pub mod node;
pub mod pool;
pub mod signature;
pub mod version;

pub use daemon::Daemon;
pub use init::Init;
pub use node::Node;
pub use pool::Pool;
pub use signature::Signature;
pub use version::Version;

use serde::Serialize;

use evade_node::http_server::api::client::{ApiError, ApiRequest};

use crate::cli::op::OpContext;

/// Failure of an op that is a single API call
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("failed to render response: {0}")]
    Render(#[from] serde_json::Error),
}

/// Send `request` and print the response as indented JSON
pub async fn call_pretty<R>(ctx: &OpContext, request: R) -> Result<String, RequestError>
where
    R: ApiRequest + Send,
    R::Response: Serialize + Send,
{
    let mut client = ctx.client.clone();
    let response = client.call(request).await?;
    Ok(serde_json::to_string_pretty(&response)?)
}
