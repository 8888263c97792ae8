use axum::extract::{Json, Path, State};
use reqwest::{Client, RequestBuilder, Url};

use common::prelude::{PoolInfo, PresentedKeys};

use crate::http_server::api::client::{endpoint, with_keys, ApiError, ApiRequest};
use crate::http_server::api::v0::{HandlerError, KeyHeaders};
use crate::ServiceState;

#[derive(Debug, Clone, clap::Args)]
pub struct DeletePoolRequest {
    /// Pool id or tag
    pub identifier: String,
    #[arg(long)]
    pub master_key: String,
}

/// Deletes the pool with every message in it; responds with what was deleted
pub async fn handler(
    State(state): State<ServiceState>,
    Path(identifier): Path<String>,
    KeyHeaders(keys): KeyHeaders,
) -> Result<Json<PoolInfo>, HandlerError> {
    let deleted = state
        .node()
        .delete_pool(&identifier, keys.master.as_deref())
        .await?;
    Ok(Json(deleted))
}

impl ApiRequest for DeletePoolRequest {
    type Response = PoolInfo;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["api", "v0", "pool", &self.identifier])?;
        Ok(with_keys(
            client.delete(url),
            &PresentedKeys::master(self.master_key),
        ))
    }
}
