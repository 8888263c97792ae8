use axum::extract::State;
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::NodeInfo;

use super::HandlerError;
use crate::http_server::api::client::{endpoint, ApiError, ApiRequest};
use crate::ServiceState;

#[derive(Debug, Clone, Default, Serialize, Deserialize, clap::Args)]
pub struct NodeInfoRequest {}

pub async fn handler(State(state): State<ServiceState>) -> Result<Json<NodeInfo>, HandlerError> {
    Ok(Json(state.node().node_info().await?))
}

impl ApiRequest for NodeInfoRequest {
    type Response = NodeInfo;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["api", "v0", "node"])?;
        Ok(client.get(url))
    }
}
