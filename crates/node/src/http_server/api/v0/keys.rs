use async_trait::async_trait;
use axum::extract::FromRequestParts;
use http::request::Parts;
use http::HeaderMap;

use common::prelude::PresentedKeys;

use super::HandlerError;
use crate::http_server::{MASTER_KEY_HEADER, READER_KEY_HEADER, WRITER_KEY_HEADER};

/// Pool keys presented through the `x-*-key` headers
pub struct KeyHeaders(pub PresentedKeys);

fn header(headers: &HeaderMap, name: &'static str) -> Result<Option<String>, HandlerError> {
    match headers.get(name) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .map(|v| Some(v.to_string()))
            .map_err(|_| HandlerError::BadRequest(format!("`{}` must be valid text", name))),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for KeyHeaders
where
    S: Send + Sync,
{
    type Rejection = HandlerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(KeyHeaders(PresentedKeys {
            master: header(&parts.headers, MASTER_KEY_HEADER)?,
            writer: header(&parts.headers, WRITER_KEY_HEADER)?,
            reader: header(&parts.headers, READER_KEY_HEADER)?,
        }))
    }
}
