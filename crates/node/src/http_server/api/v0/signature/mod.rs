use axum::routing::{get, post};
use axum::Router;

use crate::ServiceState;

pub mod create;
pub mod info;
pub mod update;

pub use create::CreateSignatureRequest;
pub use info::SignatureInfoRequest;
pub use update::UpdateSignatureRequest;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/new", post(create::handler))
        .route("/:id", get(info::handler).patch(update::handler))
        .with_state(state)
}
