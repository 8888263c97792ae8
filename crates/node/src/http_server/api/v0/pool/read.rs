use axum::extract::rejection::QueryRejection;
use axum::extract::{Json, Path, Query, State};
use reqwest::{Client, RequestBuilder, Url};

use common::prelude::{MessageList, PageParams, PresentedKeys};

use super::PageArgs;
use crate::http_server::api::client::{endpoint, with_keys, ApiError, ApiRequest};
use crate::http_server::api::v0::{HandlerError, KeyHeaders};
use crate::ServiceState;

#[derive(Debug, Clone, clap::Args)]
pub struct ReadMessagesRequest {
    /// Pool id or tag
    pub identifier: String,
    #[command(flatten)]
    pub page: PageArgs,
    #[arg(long)]
    pub reader_key: Option<String>,
    /// Accepted only on nodes that let the master key read messages
    #[arg(long)]
    pub master_key: Option<String>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path(identifier): Path<String>,
    params: Result<Query<PageParams>, QueryRejection>,
    KeyHeaders(keys): KeyHeaders,
) -> Result<Json<MessageList>, HandlerError> {
    let Query(params) = params?;
    let messages = state
        .node()
        .read_messages(&identifier, &params, &keys)
        .await?;
    Ok(Json(messages))
}

impl ApiRequest for ReadMessagesRequest {
    type Response = MessageList;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["api", "v0", "pool", &self.identifier, "read"])?;
        let keys = PresentedKeys {
            master: self.master_key,
            reader: self.reader_key,
            ..Default::default()
        };
        let request = client.get(url).query(&PageParams::from(self.page));
        Ok(with_keys(request, &keys))
    }
}
