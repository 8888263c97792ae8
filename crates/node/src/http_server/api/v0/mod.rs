use axum::routing::get;
use axum::Router;

mod error;
mod keys;
pub mod node;
pub mod pool;
pub mod signature;

pub use error::{ErrorBody, HandlerError};
pub use keys::KeyHeaders;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/node", get(node::handler))
        .nest("/pool", pool::router(state.clone()))
        .nest("/signature", signature::router(state.clone()))
        .with_state(state)
}
