use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};

use common::prelude::{MessageDraft, MessageKind, MessageView};

use super::SignatureArgs;
use crate::http_server::api::client::{endpoint, ApiError, ApiRequest};
use crate::http_server::api::v0::HandlerError;
use crate::ServiceState;

#[derive(Debug, Clone, clap::Args)]
pub struct WriteMessageRequest {
    /// Pool id or tag
    pub identifier: String,
    /// plaintext or encrypted
    #[arg(long = "type", default_value = "plaintext")]
    pub message_type: MessageKind,
    /// Body of a plaintext message
    #[arg(long, conflicts_with_all = ["ciphertext", "nonce", "tag"])]
    pub text: Option<String>,
    /// Base64 ciphertext of an encrypted message
    #[arg(long)]
    pub ciphertext: Option<String>,
    /// Base64 nonce of an encrypted message
    #[arg(long)]
    pub nonce: Option<String>,
    /// Base64 authentication tag of an encrypted message
    #[arg(long)]
    pub tag: Option<String>,
    #[arg(long)]
    pub writer_key: Option<String>,
    #[command(flatten)]
    pub signature: SignatureArgs,
    /// Do not record when the message was written
    #[arg(long)]
    pub hide_date: bool,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path((identifier, message_type)): Path<(String, String)>,
    draft: Result<Json<MessageDraft>, JsonRejection>,
) -> Result<Response, HandlerError> {
    let Json(draft) = draft?;
    let kind = message_type
        .parse::<MessageKind>()
        .map_err(HandlerError::BadRequest)?;
    let message = state.node().write_message(&identifier, kind, draft).await?;
    Ok((http::StatusCode::CREATED, Json(message)).into_response())
}

impl ApiRequest for WriteMessageRequest {
    type Response = MessageView;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(
            base_url,
            &[
                "api",
                "v0",
                "pool",
                &self.identifier,
                "write",
                self.message_type.as_str(),
            ],
        )?;
        // encrypted fields are already base64, as the wire format expects
        let body = serde_json::json!({
            "text": self.text,
            "ciphertext": self.ciphertext,
            "nonce": self.nonce,
            "tag": self.tag,
            "writer_key": self.writer_key,
            "signature": self.signature.claim(),
            "hide_date": self.hide_date,
        });
        Ok(client.post(url).json(&body))
    }
}
