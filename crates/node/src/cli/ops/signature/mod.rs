use clap::{Args, Subcommand};

use evade_node::http_server::api::v0::signature::{
    CreateSignatureRequest, SignatureInfoRequest, UpdateSignatureRequest,
};

use super::{call_pretty, RequestError};
use crate::cli::op::{Op, OpContext};

crate::command_enum! {
    (Create, CreateSignatureRequest),
    (Info, SignatureInfoRequest),
    (Update, UpdateSignatureRequest),
}

// Rename the generated Command to SignatureCommand for clarity
pub type SignatureCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Signature {
    #[command(subcommand)]
    pub command: SignatureCommand,
}

#[async_trait::async_trait]
impl Op for Signature {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

#[async_trait::async_trait]
impl Op for CreateSignatureRequest {
    type Error = RequestError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        call_pretty(ctx, self.clone()).await
    }
}

#[async_trait::async_trait]
impl Op for SignatureInfoRequest {
    type Error = RequestError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        call_pretty(ctx, self.clone()).await
    }
}

#[async_trait::async_trait]
impl Op for UpdateSignatureRequest {
    type Error = RequestError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        call_pretty(ctx, self.clone()).await
    }
}
