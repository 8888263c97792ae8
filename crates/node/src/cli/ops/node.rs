use clap::{Args, Subcommand};

use evade_node::http_server::api::v0::node::NodeInfoRequest;

use super::{call_pretty, RequestError};
use crate::cli::op::{Op, OpContext};

#[async_trait::async_trait]
impl Op for NodeInfoRequest {
    type Error = RequestError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        call_pretty(ctx, self.clone()).await
    }
}

crate::command_enum! {
    (Info, NodeInfoRequest),
}

// Rename the generated Command to NodeCommand for clarity
pub type NodeCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Node {
    #[command(subcommand)]
    pub command: NodeCommand,
}

#[async_trait::async_trait]
impl Op for Node {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}
