use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};

use common::prelude::{SignatureDraft, SignatureInfo};

use crate::http_server::api::client::{endpoint, ApiError, ApiRequest};
use crate::http_server::api::v0::HandlerError;
use crate::ServiceState;

#[derive(Debug, Clone, clap::Args)]
pub struct CreateSignatureRequest {
    /// Name shown next to signed pools and messages
    #[arg(long)]
    pub value: String,
    /// Secret proving ownership from now on
    #[arg(long)]
    pub key: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub hide_creation_date: bool,
}

pub async fn handler(
    State(state): State<ServiceState>,
    draft: Result<Json<SignatureDraft>, JsonRejection>,
) -> Result<Response, HandlerError> {
    let Json(draft) = draft?;
    let info = state.node().create_signature(draft).await?;
    Ok((http::StatusCode::CREATED, Json(info)).into_response())
}

impl ApiRequest for CreateSignatureRequest {
    type Response = SignatureInfo;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["api", "v0", "signature", "new"])?;
        let draft = SignatureDraft {
            value: self.value,
            key: self.key,
            description: self.description,
            hide_creation_date: self.hide_creation_date,
        };
        Ok(client.post(url).json(&draft))
    }
}
