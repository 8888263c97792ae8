use axum::extract::rejection::QueryRejection;
use axum::extract::{Json, Query, State};
use reqwest::{Client, RequestBuilder, Url};

use common::prelude::{PageParams, PoolList};

use super::PageArgs;
use crate::http_server::api::client::{endpoint, ApiError, ApiRequest};
use crate::http_server::api::v0::HandlerError;
use crate::ServiceState;

#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListPoolsRequest {
    #[command(flatten)]
    pub page: PageArgs,
}

pub async fn handler(
    State(state): State<ServiceState>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<PoolList>, HandlerError> {
    let Query(params) = params?;
    Ok(Json(state.node().list_pools(&params).await?))
}

impl ApiRequest for ListPoolsRequest {
    type Response = PoolList;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["api", "v0", "pool", "list"])?;
        Ok(client.get(url).query(&PageParams::from(self.page)))
    }
}
