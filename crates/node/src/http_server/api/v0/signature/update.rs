use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use reqwest::{Client, RequestBuilder, Url};

use common::prelude::{SignatureInfo, SignatureUpdate};

use crate::http_server::api::client::{endpoint, ApiError, ApiRequest};
use crate::http_server::api::v0::HandlerError;
use crate::ServiceState;

#[derive(Debug, Clone, clap::Args)]
pub struct UpdateSignatureRequest {
    pub id: String,
    /// Current signature key
    #[arg(long)]
    pub key: String,
    #[arg(long)]
    pub new_key: Option<String>,
    #[arg(long)]
    pub value: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path(id): Path<String>,
    update: Result<Json<SignatureUpdate>, JsonRejection>,
) -> Result<Json<SignatureInfo>, HandlerError> {
    let Json(update) = update?;
    Ok(Json(state.node().update_signature(&id, update).await?))
}

impl ApiRequest for UpdateSignatureRequest {
    type Response = SignatureInfo;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["api", "v0", "signature", &self.id])?;
        let update = SignatureUpdate {
            key: self.key,
            new_key: self.new_key,
            value: self.value,
            description: self.description,
        };
        Ok(client.patch(url).json(&update))
    }
}
