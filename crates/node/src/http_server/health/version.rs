use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::Serialize;

use common::prelude::build_info;
use common::version::BuildInfo;

use crate::ServiceState;

#[derive(Debug, Serialize)]
struct VersionResponse {
    node: String,
    #[serde(flatten)]
    build: BuildInfo,
}

pub async fn handler(State(state): State<ServiceState>) -> Response {
    let response = VersionResponse {
        node: state.node().settings().name.clone(),
        build: build_info(),
    };
    (StatusCode::OK, Json(response)).into_response()
}
