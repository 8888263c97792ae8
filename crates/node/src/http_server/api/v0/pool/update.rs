use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use reqwest::{Client, RequestBuilder, Url};

use common::prelude::{PoolInfo, PoolUpdate};

use crate::http_server::api::client::{endpoint, ApiError, ApiRequest};
use crate::http_server::api::v0::HandlerError;
use crate::ServiceState;

#[derive(Debug, Clone, clap::Args)]
pub struct UpdatePoolRequest {
    /// Pool id or tag
    pub identifier: String,
    /// Current master key
    #[arg(long)]
    pub master_key: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub new_master_key: Option<String>,
    #[arg(long)]
    pub new_writer_key: Option<String>,
    #[arg(long)]
    pub new_reader_key: Option<String>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path(identifier): Path<String>,
    update: Result<Json<PoolUpdate>, JsonRejection>,
) -> Result<Json<PoolInfo>, HandlerError> {
    let Json(update) = update?;
    Ok(Json(state.node().update_pool(&identifier, update).await?))
}

impl ApiRequest for UpdatePoolRequest {
    type Response = PoolInfo;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["api", "v0", "pool", &self.identifier])?;
        let update = PoolUpdate {
            master_key: self.master_key,
            description: self.description,
            new_master_key: self.new_master_key,
            new_writer_key: self.new_writer_key,
            new_reader_key: self.new_reader_key,
        };
        Ok(client.patch(url).json(&update))
    }
}
