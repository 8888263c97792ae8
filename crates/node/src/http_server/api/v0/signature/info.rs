use axum::extract::{Json, Path, State};
use reqwest::{Client, RequestBuilder, Url};

use common::prelude::SignatureInfo;

use crate::http_server::api::client::{endpoint, ApiError, ApiRequest};
use crate::http_server::api::v0::HandlerError;
use crate::ServiceState;

#[derive(Debug, Clone, clap::Args)]
pub struct SignatureInfoRequest {
    pub id: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path(id): Path<String>,
) -> Result<Json<SignatureInfo>, HandlerError> {
    Ok(Json(state.node().signature_info(&id).await?))
}

impl ApiRequest for SignatureInfoRequest {
    type Response = SignatureInfo;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["api", "v0", "signature", &self.id])?;
        Ok(client.get(url))
    }
}
