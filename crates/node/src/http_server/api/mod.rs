use axum::Router;
use http::header::{ACCEPT, CONTENT_TYPE, ORIGIN};
use http::{HeaderName, Method};
use tower_http::cors::{Any, CorsLayer};

pub mod client;
pub mod v0;

use super::{MASTER_KEY_HEADER, READER_KEY_HEADER, WRITER_KEY_HEADER};
use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    let cors_layer = CorsLayer::new()
        .allow_methods(vec![Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(vec![
            ACCEPT,
            CONTENT_TYPE,
            ORIGIN,
            HeaderName::from_static(MASTER_KEY_HEADER),
            HeaderName::from_static(WRITER_KEY_HEADER),
            HeaderName::from_static(READER_KEY_HEADER),
        ])
        .allow_origin(Any)
        .allow_credentials(false);

    Router::new()
        .nest("/v0", v0::router(state.clone()))
        .with_state(state)
        .layer(cors_layer)
}
