use axum::routing::{get, post};
use axum::Router;

use common::prelude::{PageParams, SignatureClaim};

use crate::ServiceState;

pub mod create;
pub mod delete;
pub mod info;
pub mod list;
pub mod read;
pub mod update;
pub mod write;

pub use create::CreatePoolRequest;
pub use delete::DeletePoolRequest;
pub use info::PoolInfoRequest;
pub use list::ListPoolsRequest;
pub use read::ReadMessagesRequest;
pub use update::UpdatePoolRequest;
pub use write::WriteMessageRequest;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/new/:pool_type", post(create::handler))
        .route("/list", get(list::handler))
        .route(
            "/:identifier",
            get(info::handler)
                .patch(update::handler)
                .delete(delete::handler),
        )
        .route("/:identifier/read", get(read::handler))
        .route("/:identifier/write/:message_type", post(write::handler))
        .with_state(state)
}

/// Pagination flags shared by the list commands
#[derive(Debug, Clone, Copy, Default, clap::Args)]
pub struct PageArgs {
    /// Return the first N entries
    #[arg(long, conflicts_with = "last")]
    pub first: Option<i64>,
    /// Return the last N entries
    #[arg(long)]
    pub last: Option<i64>,
    /// Page size (limit/offset nodes)
    #[arg(long)]
    pub limit: Option<i64>,
    /// Entries to skip (limit/offset nodes)
    #[arg(long)]
    pub offset: Option<i64>,
}

impl From<PageArgs> for PageParams {
    fn from(args: PageArgs) -> Self {
        PageParams {
            first: args.first,
            last: args.last,
            limit: args.limit,
            offset: args.offset,
        }
    }
}

/// Optional signature to attach, as a pair of flags
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SignatureArgs {
    /// Id of the signature to sign with
    #[arg(long, requires = "signature_key")]
    pub signature_id: Option<String>,
    /// Key of that signature
    #[arg(long, requires = "signature_id")]
    pub signature_key: Option<String>,
}

impl SignatureArgs {
    pub fn claim(&self) -> Option<SignatureClaim> {
        match (&self.signature_id, &self.signature_key) {
            (Some(id), Some(key)) => Some(SignatureClaim {
                id: id.clone(),
                key: key.clone(),
            }),
            _ => None,
        }
    }
}
