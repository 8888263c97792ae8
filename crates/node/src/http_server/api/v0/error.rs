use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::{Deserialize, Serialize};

use common::prelude::NodeError;

/// Body of every non-2xx API response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error_message: String,
}

/// Failure of any v0 handler
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Node(#[from] NodeError),
    /// The request could not be read into an operation's input
    #[error("{0}")]
    BadRequest(String),
}

impl HandlerError {
    fn status(&self) -> StatusCode {
        match self {
            HandlerError::Node(NodeError::NotFound(_)) => StatusCode::NOT_FOUND,
            HandlerError::Node(NodeError::Conflict(_)) => StatusCode::CONFLICT,
            HandlerError::Node(NodeError::AccessDenied(_)) => StatusCode::FORBIDDEN,
            HandlerError::Node(NodeError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            HandlerError::Node(NodeError::Internal(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            HandlerError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<JsonRejection> for HandlerError {
    fn from(rejection: JsonRejection) -> Self {
        HandlerError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for HandlerError {
    fn from(rejection: QueryRejection) -> Self {
        HandlerError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            HandlerError::Node(e) => e.public_message(),
            HandlerError::BadRequest(msg) => msg.clone(),
        };
        tracing::debug!(status = %status, "request failed: {}", error_message);
        (status, Json(ErrorBody { error_message })).into_response()
    }
}
