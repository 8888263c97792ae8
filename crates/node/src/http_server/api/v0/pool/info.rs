use axum::extract::{Json, Path, State};
use reqwest::{Client, RequestBuilder, Url};

use common::prelude::{PoolInfo, PresentedKeys};

use crate::http_server::api::client::{endpoint, with_keys, ApiError, ApiRequest};
use crate::http_server::api::v0::{HandlerError, KeyHeaders};
use crate::ServiceState;

#[derive(Debug, Clone, clap::Args)]
pub struct PoolInfoRequest {
    /// Pool id or tag
    pub identifier: String,
    #[arg(long)]
    pub master_key: Option<String>,
    #[arg(long)]
    pub writer_key: Option<String>,
    #[arg(long)]
    pub reader_key: Option<String>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path(identifier): Path<String>,
    KeyHeaders(keys): KeyHeaders,
) -> Result<Json<PoolInfo>, HandlerError> {
    Ok(Json(state.node().pool_info(&identifier, &keys).await?))
}

impl ApiRequest for PoolInfoRequest {
    type Response = PoolInfo;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["api", "v0", "pool", &self.identifier])?;
        let keys = PresentedKeys {
            master: self.master_key,
            writer: self.writer_key,
            reader: self.reader_key,
        };
        Ok(with_keys(client.get(url), &keys))
    }
}
