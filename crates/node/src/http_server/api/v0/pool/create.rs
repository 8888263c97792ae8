use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};

use common::prelude::{PoolDraft, PoolInfo, PoolType};

use super::SignatureArgs;
use crate::http_server::api::client::{endpoint, ApiError, ApiRequest};
use crate::http_server::api::v0::HandlerError;
use crate::ServiceState;

#[derive(Debug, Clone, clap::Args)]
pub struct CreatePoolRequest {
    /// wall, channel, chat or mailbox
    pub pool_type: PoolType,
    /// Human-readable identifier, unique on this node
    #[arg(long)]
    pub tag: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// List the pool and open its metadata to everyone
    #[arg(long)]
    pub public: bool,
    /// Only for chat pools: messages must be encrypted
    #[arg(long)]
    pub encrypted: bool,
    #[arg(long)]
    pub master_key: String,
    #[arg(long)]
    pub writer_key: Option<String>,
    #[arg(long)]
    pub reader_key: Option<String>,
    #[command(flatten)]
    pub signature: SignatureArgs,
    #[arg(long)]
    pub hide_creation_date: bool,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path(pool_type): Path<String>,
    draft: Result<Json<PoolDraft>, JsonRejection>,
) -> Result<Response, HandlerError> {
    let Json(draft) = draft?;
    let pool_type = pool_type
        .parse::<PoolType>()
        .map_err(HandlerError::BadRequest)?;
    let info = state.node().create_pool(pool_type, draft).await?;
    Ok((http::StatusCode::CREATED, Json(info)).into_response())
}

impl ApiRequest for CreatePoolRequest {
    type Response = PoolInfo;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(base_url, &["api", "v0", "pool", "new", self.pool_type.as_str()])?;
        let draft = PoolDraft {
            tag: self.tag,
            description: self.description,
            public: self.public,
            encrypted: self.encrypted,
            master_key: self.master_key,
            writer_key: self.writer_key,
            reader_key: self.reader_key,
            creator_signature: self.signature.claim(),
            hide_creation_date: self.hide_creation_date,
        };
        Ok(client.post(url).json(&draft))
    }
}
